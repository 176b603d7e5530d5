use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use mint_domain::Address;

#[derive(Parser, Debug)]
#[command(name = "mintflow", author, version, about = "Run ordered contract call sequences", arg_required_else_help(true))]
pub struct Cli {
    /// Output format for operation results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a JSON plan file against the in-process ledger.
    Run {
        /// The plan file.
        #[arg(short, long)]
        plan: PathBuf,
    },
    /// Run one of the built-in scripts (legoot, metacore, nft-factory, deploy).
    Script {
        name: String,
        /// Contract address override, as `name=0x...`. Repeatable.
        #[arg(long = "address", value_parser = parse_address_override)]
        addresses: Vec<(String, Address)>,
    },
    /// List the network presets.
    Networks,
    /// Print a built-in script as a plan file.
    Show {
        name: String,
        #[arg(long = "address", value_parser = parse_address_override)]
        addresses: Vec<(String, Address)>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn parse_address_override(raw: &str) -> Result<(String, Address), String> {
    let (name, addr) = raw.split_once('=')
                          .ok_or_else(|| format!("expected name=0x..., got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing contract name in `{raw}`"));
    }
    let address = Address::parse(addr).map_err(|e| e.to_string())?;
    Ok((name.to_string(), address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_script_with_overrides() {
        let cli = Cli::try_parse_from(["mintflow",
                                       "--format",
                                       "json",
                                       "script",
                                       "legoot",
                                       "--address",
                                       "legoot=0x819766088b2e8Bd418071F89607BaB722fD0A606"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Script { name, addresses } => {
                assert_eq!(name, "legoot");
                assert_eq!(addresses[0].0, "legoot");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn override_needs_name_and_valid_address() {
        assert!(parse_address_override("0x819766088b2e8Bd418071F89607BaB722fD0A606").is_err());
        assert!(parse_address_override("=0x819766088b2e8Bd418071F89607BaB722fD0A606").is_err());
        assert!(parse_address_override("legoot=0x12").is_err());
    }
}

//! Ejecución de los subcomandos.
//!
//! Las secuencias corren contra el `NftSimulator` en proceso. Un cliente
//! JSON-RPC real se inyectaría aquí implementando `ChainClient`.
use log::info;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use mint_adapters::{BuiltinScript, MnemonicSigner, NftSimulator, PlanSpec, ScriptAddresses};
use mint_core::{ChainClient, ContractRegistry, JsonLinesReporter, LogReporter, OperationResult, Sequence, Sequencer,
                SignerHandle, SignerProvider};
use mint_domain::Address;
use mintflow::network::PRESETS;
use mintflow::AppConfig;

use crate::args::{Cli, Command, OutputFormat};
use crate::error::CliError;

pub async fn execute(cli: Cli) -> Result<(), CliError> {
    let format = cli.format;
    match cli.command {
        Command::Networks => write_networks(format, &mut std::io::stdout().lock()),
        Command::Show { name, addresses } => {
            let script: BuiltinScript = name.parse()?;
            let plan = script.plan(&script_addresses(script, &BTreeMap::new(), &addresses))?;
            println!("{}", plan.to_json_pretty()?);
            Ok(())
        }
        Command::Script { name, addresses } => {
            let cfg = AppConfig::from_env()?;
            let script: BuiltinScript = name.parse()?;
            let plan = script.plan(&script_addresses(script, &cfg.addresses, &addresses))?;
            let (registry, sequence) = plan.build(None, cfg.network.artifact_key().as_deref())?;
            info!("script {script}: {}", script.description());
            run_on_simulator(&registry, &sequence, &cfg, format).await
        }
        Command::Run { plan } => {
            let cfg = AppConfig::from_env()?;
            let spec = PlanSpec::load(&plan)?;
            let (registry, sequence) = spec.build(plan.parent().filter(|p| !p.as_os_str().is_empty()).or(Some(Path::new("."))),
                                                  cfg.network.artifact_key().as_deref())?;
            info!("plan {}: {} operation(s) over {} contract(s)", plan.display(), sequence.len(), registry.len());
            run_on_simulator(&registry, &sequence, &cfg, format).await
        }
    }
}

/// Direcciones de un script: las de testnet, luego las de configuración
/// (`MINTFLOW_ADDRESS_*`), luego las de la línea de comandos.
pub fn script_addresses(script: BuiltinScript,
                        configured: &BTreeMap<String, Address>,
                        overrides: &[(String, Address)])
                        -> ScriptAddresses {
    let mut addrs = script.default_addresses();
    for (name, a) in configured.iter().chain(overrides.iter().map(|(n, a)| (n, a))) {
        addrs.set(name, a.clone());
    }
    addrs
}

async fn run_on_simulator(registry: &ContractRegistry,
                          sequence: &Sequence,
                          cfg: &AppConfig,
                          format: OutputFormat)
                          -> Result<(), CliError> {
    let signer = MnemonicSigner::from_file(&cfg.secret_path, cfg.caller.clone()).map_err(CliError::Signer)?;
    info!("network {} ({}), simulated locally", cfg.network.name, cfg.rpc_url);
    let results = execute_sequence(NftSimulator::for_registry(registry),
                                   sequence,
                                   signer.handle(),
                                   cfg.gas_limit,
                                   cfg.network.gas,
                                   format).await?;
    if format == OutputFormat::Text {
        println!("completed {} operation(s)", results.len());
    }
    Ok(())
}

/// Ejecuta la secuencia con el reporter que corresponde al formato: líneas de
/// log en texto, un objeto JSON por línea en stdout en json. `network_gas`
/// sólo aplica a contratos sin límite propio.
pub async fn execute_sequence<C: ChainClient>(chain: C,
                                              sequence: &Sequence,
                                              signer: SignerHandle,
                                              gas_limit: Option<u64>,
                                              network_gas: Option<u64>,
                                              format: OutputFormat)
                                              -> Result<Vec<OperationResult>, CliError> {
    let builder = Sequencer::builder(chain, signer).gas_limit(gas_limit).default_gas_limit(network_gas);
    let builder = match format {
        OutputFormat::Text => builder.reporter(LogReporter),
        OutputFormat::Json => builder.reporter(JsonLinesReporter::new(std::io::stdout())),
    };
    let mut sequencer = builder.build();
    Ok(sequencer.run(sequence).await?)
}

pub fn write_networks(format: OutputFormat, out: &mut impl Write) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &PRESETS).map_err(std::io::Error::from)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for p in PRESETS.iter() {
                let id = p.network_id.map_or_else(|| "*".to_string(), |id| id.to_string());
                let gas = p.gas.map_or_else(|| "-".to_string(), |g| g.to_string());
                writeln!(out, "{:<12} {:>6} {:>9}  {}", p.name, id, gas, p.rpc_url)?;
            }
        }
    }
    Ok(())
}

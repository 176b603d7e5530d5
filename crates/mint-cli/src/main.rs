use clap::Parser;
use log::error;
use std::process::ExitCode;

use mint_cli::{commands, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    mintflow::config::init_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match commands::execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

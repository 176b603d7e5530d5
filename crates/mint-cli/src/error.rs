use thiserror::Error;

use mint_adapters::AdapterError;
use mint_core::SequenceAbort;
use mintflow::AppError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration: {0}")]
    Config(#[from] AppError),
    #[error("signer: {0}")]
    Signer(AdapterError),
    #[error("plan: {0}")]
    Plan(#[from] AdapterError),
    #[error(transparent)]
    Aborted(#[from] SequenceAbort),
    #[error("output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// 2 = uso/configuración, 3 = plan, 4 = secuencia abortada.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) | CliError::Signer(_) => 2,
            CliError::Plan(_) => 3,
            CliError::Aborted(_) => 4,
            CliError::Output(_) => 1,
        }
    }
}

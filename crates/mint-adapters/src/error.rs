use thiserror::Error;

use mint_core::SequenceError;
use mint_domain::DomainError;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("io error on {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("artifact `{contract}` has no deployment for network {network}")]
    NotDeployed { contract: String, network: String },

    #[error("invalid secret phrase: {0}")]
    InvalidSecret(String),

    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    #[error("unknown script `{0}`")]
    UnknownScript(String),
}

impl AdapterError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        AdapterError::Io { path: path.as_ref().display().to_string(),
                           source }
    }
}

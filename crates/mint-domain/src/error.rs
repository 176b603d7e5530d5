use thiserror::Error;

/// Error del dominio: validación estructural de direcciones y ABIs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid abi type: {0}")]
    InvalidType(String),

    #[error("invalid abi: {0}")]
    InvalidAbi(String),

    #[error("invalid function signature: {0}")]
    InvalidSignature(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}

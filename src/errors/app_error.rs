use thiserror::Error;

use mint_domain::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Variable de entorno no definida: {0}")]
    MissingVar(String),
    #[error("Valor inválido en {name}: {reason}")]
    InvalidVar { name: String, reason: String },
    #[error("Red desconocida: {0}")]
    UnknownNetwork(String),
    #[error("Error de dominio: {0}")]
    Domain(#[from] DomainError),
}

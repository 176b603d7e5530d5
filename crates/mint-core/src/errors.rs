//! Errores del core.
//!
//! `SequenceError` se guarda dentro de `OperationFailed`, por eso es
//! `Clone + Serialize`. `ChainError` se propaga tal cual envuelto en
//! `RemoteCall` junto con la identidad de la operación.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallo reportado por el cliente de cadena. El core no lo interpreta.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum ChainError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("transaction reverted: {0}")]
    Reverted(String),
    #[error("rejected by node: {0}")]
    Rejected(String),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum SequenceError {
    #[error("unknown contract `{name}`")]
    UnknownContract { name: String },

    #[error("contract `{name}` already registered")]
    DuplicateName { name: String },

    #[error("contract `{contract}` has no function `{function}` taking {arity} argument(s)")]
    UnknownFunction { contract: String, function: String, arity: usize },

    #[error("operation #{index}: invalid dependency: {reason}")]
    InvalidDependency { index: usize, reason: String },

    #[error("operation #{index} ({label}): dependency on #{depends_on} produced no usable value")]
    DependencyUnresolved { index: usize, label: String, depends_on: usize },

    #[error("operation #{index} ({label}): argument {position} does not match `{expected}`")]
    ArgumentMismatch { index: usize, label: String, position: usize, expected: String },

    #[error("operation #{index} ({label}): {function} on `{contract}` failed: {source}")]
    RemoteCall { index: usize, label: String, contract: String, function: String, source: ChainError },

    #[error("sequence cancelled before operation #{next_index}")]
    Cancelled { next_index: usize },

    #[error("internal: {0}")]
    Internal(String),
}

impl SequenceError {
    /// Índice de la operación a la que se atribuye el error, si aplica.
    pub fn operation_index(&self) -> Option<usize> {
        match self {
            SequenceError::InvalidDependency { index, .. }
            | SequenceError::DependencyUnresolved { index, .. }
            | SequenceError::ArgumentMismatch { index, .. }
            | SequenceError::RemoteCall { index, .. } => Some(*index),
            SequenceError::Cancelled { next_index } => Some(*next_index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_call_message_names_operation() {
        let err = SequenceError::RemoteCall { index: 6,
                                              label: "approve".into(),
                                              contract: "legoot".into(),
                                              function: "approve(address,uint256)".into(),
                                              source: ChainError::Reverted("not owner".into()) };
        assert_eq!(err.to_string(),
                   "operation #6 (approve): approve(address,uint256) on `legoot` failed: transaction reverted: not owner");
        assert_eq!(err.operation_index(), Some(6));
        assert_eq!(SequenceError::UnknownContract { name: "x".into() }.operation_index(), None);
    }
}

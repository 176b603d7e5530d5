use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::chain::Receipt;
use crate::errors::SequenceError;

use super::definition::OperationMode;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// Para lecturas, el valor devuelto; para escrituras, el recibo en JSON.
    Success { value: Value },
    Failure { error: SequenceError },
}

/// Salida cruda del cliente de cadena.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RawOutput {
    Receipt(Receipt),
    Value(Value),
}

/// Resultado inmutable de una operación.
#[derive(Debug, Clone, Serialize)]
pub struct OperationResult {
    pub index: usize,
    pub label: String,
    pub contract: String,
    pub function: String,
    pub mode: OperationMode,
    /// Argumentos efectivamente enviados (tras sustituir marcadores).
    pub args: Vec<Value>,
    pub outcome: Outcome,
    pub raw: Option<RawOutput>,
    pub fingerprint: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Success { value } => Some(value),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&SequenceError> {
        match &self.outcome {
            Outcome::Failure { error } => Some(error),
            Outcome::Success { .. } => None,
        }
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        match &self.raw {
            Some(RawOutput::Receipt(r)) => Some(r),
            _ => None,
        }
    }
}

// Línea legible al estilo "claim Legoot result: ...", "tokenURI: ...".
impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.outcome, &self.raw) {
            (Outcome::Failure { error }, _) => write!(f, "#{} {} failed: {}", self.index, self.label, error),
            (Outcome::Success { .. }, Some(RawOutput::Receipt(r))) => {
                write!(f,
                       "#{} {} result: tx {} (block {}, gas {})",
                       self.index, self.label, r.transaction_hash, r.block_number, r.gas_used)
            }
            (Outcome::Success { value }, _) => match value {
                Value::String(s) => write!(f, "#{} {}: {}", self.index, self.label, s),
                other => write!(f, "#{} {}: {}", self.index, self.label, other),
            },
        }
    }
}

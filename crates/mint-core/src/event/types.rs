//! Tipos de evento de una ejecución (`run`) y estructura `SequenceEvent`.
//!
//! Cada `Sequencer::run` emite eventos append-only a un `EventStore`. Con
//! ellos el `RunRepository` reconstruye el estado de cada operación sin
//! mirar estructuras mutables del engine.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SequenceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SequenceEventKind {
    /// Primer evento de un `run_id`: fija la definición ejecutada.
    SequenceInitialized { definition_hash: String, operation_count: usize },
    /// La operación se va a enviar. No implica éxito.
    OperationStarted { index: usize, label: String },
    /// Escritura aceptada y finalizada: recibo disponible.
    OperationSubmitted { index: usize, label: String, transaction_hash: String },
    OperationFinished { index: usize, label: String, fingerprint: String },
    /// Error terminal. La secuencia no continúa (abort-on-failure).
    OperationFailed {
        index: usize,
        label: String,
        error: SequenceError,
        fingerprint: String,
    },
    /// Cancelación observada entre operaciones; `next_index` nunca se envió.
    SequenceCancelled { next_index: usize },
    /// Cierre con fingerprint agregado (hash de los fingerprints en orden).
    SequenceCompleted { sequence_fingerprint: String },
}

impl SequenceEventKind {
    /// Código de una letra, útil para asserts compactos.
    pub fn short_code(&self) -> &'static str {
        match self {
            SequenceEventKind::SequenceInitialized { .. } => "I",
            SequenceEventKind::OperationStarted { .. } => "S",
            SequenceEventKind::OperationSubmitted { .. } => "T",
            SequenceEventKind::OperationFinished { .. } => "F",
            SequenceEventKind::OperationFailed { .. } => "X",
            SequenceEventKind::SequenceCancelled { .. } => "K",
            SequenceEventKind::SequenceCompleted { .. } => "C",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceEvent {
    pub seq: u64, // asignado por el store (orden append)
    pub run_id: Uuid,
    pub kind: SequenceEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprint)
}

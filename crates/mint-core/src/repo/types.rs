//! Replay de una ejecución: consume los eventos en orden y reconstruye el
//! estado de cada operación (`RunInstance`). No guarda valores completos,
//! sólo fingerprints y hashes de transacción.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::event::{SequenceEvent, SequenceEventKind};
use crate::operation::{OperationStatus, Sequence};

#[derive(Debug, Clone)]
pub struct RunInstance {
    pub run_id: Uuid,
    pub slots: Vec<OperationSlot>,
    /// Primera operación `Pending` (o `len` si no queda ninguna).
    pub cursor: usize,
    pub completed: bool,
    pub cancelled: bool,
    pub failed_at: Option<usize>,
}

/// Estado de una operación en la instancia.
#[derive(Debug, Clone)]
pub struct OperationSlot {
    pub label: String,
    pub status: OperationStatus,
    pub fingerprint: Option<String>,
    pub transaction_hash: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Trait para reconstruir (`replay`) el estado de una ejecución.
pub trait RunRepository {
    fn load(&self, run_id: Uuid, events: &[SequenceEvent], sequence: &Sequence) -> RunInstance;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryRunRepository;

impl InMemoryRunRepository {
    pub fn new() -> Self {
        Self
    }
}

impl RunRepository for InMemoryRunRepository {
    fn load(&self, run_id: Uuid, events: &[SequenceEvent], sequence: &Sequence) -> RunInstance {
        let mut slots: Vec<OperationSlot> = sequence.operations()
                                                    .iter()
                                                    .map(|op| OperationSlot { label: op.label().to_string(),
                                                                              status: OperationStatus::Pending,
                                                                              fingerprint: None,
                                                                              transaction_hash: None,
                                                                              started_at: None,
                                                                              finished_at: None })
                                                    .collect();
        let mut completed = false;
        let mut cancelled = false;
        let mut failed_at = None;
        for ev in events.iter().filter(|e| e.run_id == run_id) {
            match &ev.kind {
                SequenceEventKind::SequenceInitialized { .. } => {}
                SequenceEventKind::OperationStarted { index, .. } => {
                    if let Some(slot) = slots.get_mut(*index) {
                        slot.status = OperationStatus::Running;
                        slot.started_at = Some(ev.ts);
                    }
                }
                SequenceEventKind::OperationSubmitted { index, transaction_hash, .. } => {
                    if let Some(slot) = slots.get_mut(*index) {
                        slot.transaction_hash = Some(transaction_hash.clone());
                    }
                }
                SequenceEventKind::OperationFinished { index, fingerprint, .. } => {
                    if let Some(slot) = slots.get_mut(*index) {
                        slot.status = OperationStatus::Finished;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                }
                SequenceEventKind::OperationFailed { index, fingerprint, .. } => {
                    if let Some(slot) = slots.get_mut(*index) {
                        slot.status = OperationStatus::Failed;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                    failed_at = Some(*index);
                }
                SequenceEventKind::SequenceCancelled { .. } => cancelled = true,
                SequenceEventKind::SequenceCompleted { .. } => completed = true,
            }
        }
        let cursor = slots.iter()
                          .position(|s| s.status == OperationStatus::Pending)
                          .unwrap_or(slots.len());
        RunInstance { run_id,
                      slots,
                      cursor,
                      completed,
                      cancelled,
                      failed_at }
    }
}

use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use super::{SequenceEvent, SequenceEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, run_id: Uuid, kind: SequenceEventKind) -> SequenceEvent;
    /// Lista eventos de una ejecución (orden ascendente por seq).
    fn list(&self, run_id: Uuid) -> Vec<SequenceEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: HashMap<Uuid, Vec<SequenceEvent>>,
}

impl InMemoryEventStore {
    pub fn runs(&self) -> Vec<Uuid> {
        self.inner.keys().copied().collect()
    }
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, run_id: Uuid, kind: SequenceEventKind) -> SequenceEvent {
        let events = self.inner.entry(run_id).or_default();
        let ev = SequenceEvent { seq: events.len() as u64,
                                 run_id,
                                 kind,
                                 ts: Utc::now() };
        events.push(ev.clone());
        ev
    }

    fn list(&self, run_id: Uuid) -> Vec<SequenceEvent> {
        self.inner.get(&run_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_per_run() {
        let mut store = InMemoryEventStore::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let e0 = store.append_kind(a, SequenceEventKind::SequenceCancelled { next_index: 0 });
        let e1 = store.append_kind(a, SequenceEventKind::SequenceCancelled { next_index: 0 });
        let f0 = store.append_kind(b, SequenceEventKind::SequenceCancelled { next_index: 0 });
        assert_eq!((e0.seq, e1.seq, f0.seq), (0, 1, 0));
        assert_eq!(store.list(a).len(), 2);
        assert!(store.list(Uuid::new_v4()).is_empty());
        assert_eq!(store.runs().len(), 2);
    }
}

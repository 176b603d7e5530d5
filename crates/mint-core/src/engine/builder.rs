//! Builder para `Sequencer`.
//!
//! Cliente de cadena y firmante son obligatorios; reporters, token de
//! cancelación, override de gas y gas por defecto de la red son opcionales. `build()` usa stores en
//! memoria y `build_with_stores` permite inyectar otros.

use crate::chain::{ChainClient, SignerHandle};
use crate::engine::cancel::CancellationToken;
use crate::engine::core::Sequencer;
use crate::event::{EventStore, InMemoryEventStore};
use crate::repo::{InMemoryRunRepository, RunRepository};
use crate::reporter::Reporter;

pub struct SequencerBuilder<C: ChainClient> {
    chain: C,
    signer: SignerHandle,
    reporters: Vec<Box<dyn Reporter>>,
    cancel: Option<CancellationToken>,
    gas_limit: Option<u64>,
    default_gas_limit: Option<u64>,
}

impl<C: ChainClient> SequencerBuilder<C> {
    pub fn new(chain: C, signer: SignerHandle) -> Self {
        Self { chain,
               signer,
               reporters: Vec::new(),
               cancel: None,
               gas_limit: None,
               default_gas_limit: None }
    }

    /// Añade un reporter. Se invocan en el orden en que se añadieron.
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }

    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Límite de gas para todas las escrituras; tiene prioridad sobre el del
    /// descriptor del contrato.
    pub fn gas_limit(mut self, gas_limit: Option<u64>) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Límite de gas para contratos que no declaran el suyo (el `gas` del
    /// preset de red).
    pub fn default_gas_limit(mut self, gas_limit: Option<u64>) -> Self {
        self.default_gas_limit = gas_limit;
        self
    }

    pub fn build(self) -> Sequencer<C, InMemoryEventStore, InMemoryRunRepository> {
        self.build_with_stores(InMemoryEventStore::default(), InMemoryRunRepository::new())
    }

    pub fn build_with_stores<E: EventStore, R: RunRepository>(self, event_store: E, repository: R) -> Sequencer<C, E, R> {
        Sequencer { chain: self.chain,
                    signer: self.signer,
                    event_store,
                    repository,
                    reporters: self.reporters,
                    cancel: self.cancel,
                    gas_limit: self.gas_limit,
                    default_gas_limit: self.default_gas_limit,
                    last_run_id: None }
    }
}

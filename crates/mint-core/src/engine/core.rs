//! Implementación del `Sequencer`.

use chrono::Utc;
use log::{debug, info, warn};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::chain::{ChainClient, SendOptions, SignerHandle};
use crate::constants::RUNNER_VERSION;
use crate::engine::builder::SequencerBuilder;
use crate::engine::cancel::CancellationToken;
use crate::engine::resolve::resolve_args;
use crate::errors::SequenceError;
use crate::event::{EventStore, InMemoryEventStore, SequenceEvent, SequenceEventKind};
use crate::hashing::hash_value;
use crate::operation::{Operation, OperationMode, OperationResult, Outcome, RawOutput, Sequence};
use crate::repo::{InMemoryRunRepository, RunInstance, RunRepository};
use crate::reporter::Reporter;

/// Resultado de una secuencia abortada.
///
/// `results` contiene exactamente las operaciones completadas antes del
/// fallo, en orden. `failed` es el resultado de la operación que falló
/// (`None` si la secuencia se canceló entre operaciones).
#[derive(Debug, Error)]
#[error("sequence aborted after {} completed operation(s): {error}", .results.len())]
pub struct SequenceAbort {
    pub run_id: Uuid,
    pub results: Vec<OperationResult>,
    pub failed: Option<OperationResult>,
    pub error: SequenceError,
}

/// Ejecutor estrictamente secuencial.
///
/// Cada operación espera a que la anterior termine (escrituras: recibo
/// finalizado). Nunca hay dos operaciones en vuelo y el primer fallo detiene
/// la secuencia sin enviar nada más.
pub struct Sequencer<C, E = InMemoryEventStore, R = InMemoryRunRepository>
    where C: ChainClient,
          E: EventStore,
          R: RunRepository
{
    pub(crate) chain: C,
    pub(crate) signer: SignerHandle,
    pub(crate) event_store: E,
    pub(crate) repository: R,
    pub(crate) reporters: Vec<Box<dyn Reporter>>,
    pub(crate) cancel: Option<CancellationToken>,
    pub(crate) gas_limit: Option<u64>,
    pub(crate) default_gas_limit: Option<u64>,
    pub(crate) last_run_id: Option<Uuid>,
}

impl<C: ChainClient> Sequencer<C, InMemoryEventStore, InMemoryRunRepository> {
    /// Builder con stores en memoria.
    #[inline]
    pub fn builder(chain: C, signer: SignerHandle) -> SequencerBuilder<C> {
        SequencerBuilder::new(chain, signer)
    }
}

impl<C, E, R> Sequencer<C, E, R>
    where C: ChainClient,
          E: EventStore,
          R: RunRepository
{
    /// Ejecuta la secuencia completa bajo un `run_id` nuevo.
    pub async fn run(&mut self, sequence: &Sequence) -> Result<Vec<OperationResult>, SequenceAbort> {
        let run_id = Uuid::new_v4();
        self.last_run_id = Some(run_id);
        self.event_store
            .append_kind(run_id,
                         SequenceEventKind::SequenceInitialized { definition_hash: sequence.definition_hash().to_string(),
                                                                  operation_count: sequence.len() });
        info!("run {run_id}: {} operation(s) as {}", sequence.len(), self.signer.address());

        let mut results: Vec<OperationResult> = Vec::with_capacity(sequence.len());
        for (index, op) in sequence.operations().iter().enumerate() {
            if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                warn!("run {run_id}: cancelled before operation #{index}");
                self.event_store
                    .append_kind(run_id, SequenceEventKind::SequenceCancelled { next_index: index });
                return Err(SequenceAbort { run_id,
                                           results,
                                           failed: None,
                                           error: SequenceError::Cancelled { next_index: index } });
            }

            self.event_store.append_kind(run_id,
                                         SequenceEventKind::OperationStarted { index,
                                                                               label: op.label().to_string() });
            let started_at = Utc::now();
            let args = resolve_args(index, op, &results);
            let outcome = match &args {
                Ok(args) => self.execute(run_id, index, op, args).await,
                Err(e) => Err(e.clone()),
            };
            let args = args.unwrap_or_default();

            match outcome {
                Ok((value, raw)) => {
                    let fingerprint = self.fingerprint(sequence, index, op, &args, &value);
                    self.event_store.append_kind(run_id,
                                                 SequenceEventKind::OperationFinished { index,
                                                                                        label: op.label().to_string(),
                                                                                        fingerprint: fingerprint.clone() });
                    let result = OperationResult { index,
                                                   label: op.label().to_string(),
                                                   contract: op.contract_name().to_string(),
                                                   function: op.function().signature(),
                                                   mode: op.mode(),
                                                   args,
                                                   outcome: Outcome::Success { value },
                                                   raw: Some(raw),
                                                   fingerprint,
                                                   started_at,
                                                   finished_at: Utc::now() };
                    self.dispatch(&result);
                    results.push(result);
                }
                Err(error) => {
                    let fingerprint = self.fingerprint(sequence, index, op, &args, &json!({ "error": error }));
                    self.event_store.append_kind(run_id,
                                                 SequenceEventKind::OperationFailed { index,
                                                                                      label: op.label().to_string(),
                                                                                      error: error.clone(),
                                                                                      fingerprint: fingerprint.clone() });
                    let result = OperationResult { index,
                                                   label: op.label().to_string(),
                                                   contract: op.contract_name().to_string(),
                                                   function: op.function().signature(),
                                                   mode: op.mode(),
                                                   args,
                                                   outcome: Outcome::Failure { error: error.clone() },
                                                   raw: None,
                                                   fingerprint,
                                                   started_at,
                                                   finished_at: Utc::now() };
                    self.dispatch(&result);
                    return Err(SequenceAbort { run_id,
                                               results,
                                               failed: Some(result),
                                               error });
                }
            }
        }

        let fingerprints: Vec<&str> = results.iter().map(|r| r.fingerprint.as_str()).collect();
        let sequence_fingerprint = hash_value(&json!({
                                                  "engine_version": RUNNER_VERSION,
                                                  "definition_hash": sequence.definition_hash(),
                                                  "operation_fingerprints": fingerprints,
                                              }));
        self.event_store
            .append_kind(run_id, SequenceEventKind::SequenceCompleted { sequence_fingerprint });
        info!("run {run_id}: completed {} operation(s)", results.len());
        Ok(results)
    }

    async fn execute(&mut self,
                     run_id: Uuid,
                     index: usize,
                     op: &Operation,
                     args: &[Value])
                     -> Result<(Value, RawOutput), SequenceError> {
        let function = op.function();
        for (position, (arg, ty)) in args.iter().zip(function.inputs.iter()).enumerate() {
            if !ty.accepts(arg) {
                return Err(SequenceError::ArgumentMismatch { index,
                                                             label: op.label().to_string(),
                                                             position,
                                                             expected: ty.canonical() });
            }
        }
        if OperationMode::from(function.mutability) != op.mode() {
            warn!("operation #{index} ({}): {} is declared {:?} but runs as {}",
                  op.label(),
                  function.signature(),
                  function.mutability,
                  op.mode());
        }

        let target = op.target();
        let remote = |source| SequenceError::RemoteCall { index,
                                                          label: op.label().to_string(),
                                                          contract: target.name().to_string(),
                                                          function: function.signature(),
                                                          source };
        debug!("operation #{index} ({}): {} {} on {}", op.label(), op.mode(), function.signature(), target);
        match op.mode() {
            OperationMode::Read => {
                let value = self.chain.call(target.address(), function, args).await.map_err(remote)?;
                Ok((value.clone(), RawOutput::Value(value)))
            }
            OperationMode::Write => {
                // override > límite del contrato > gas por defecto de la red
                let options = SendOptions { gas_limit: self.gas_limit.or(target.gas_limit()).or(self.default_gas_limit) };
                let receipt = self.chain
                                  .send(target.address(), function, args, &self.signer, &options)
                                  .await
                                  .map_err(remote)?;
                // Minada aunque haya revertido: el hash queda registrado.
                self.event_store
                    .append_kind(run_id,
                                 SequenceEventKind::OperationSubmitted { index,
                                                                         label: op.label().to_string(),
                                                                         transaction_hash: receipt.transaction_hash.clone() });
                if !receipt.status {
                    let reason = format!("status 0 in transaction {}", receipt.transaction_hash);
                    return Err(remote(crate::errors::ChainError::Reverted(reason)));
                }
                let value = serde_json::to_value(&receipt).map_err(|e| SequenceError::Internal(e.to_string()))?;
                Ok((value, RawOutput::Receipt(receipt)))
            }
        }
    }

    fn fingerprint(&self, sequence: &Sequence, index: usize, op: &Operation, args: &[Value], output: &Value) -> String {
        hash_value(&json!({
                       "engine_version": RUNNER_VERSION,
                       "definition_hash": sequence.definition_hash(),
                       "index": index,
                       "function": op.function().signature(),
                       "address": op.target().address().as_str(),
                       "args": args,
                       "output_hash": hash_value(output),
                   }))
    }

    // Un reporter que falla no altera la secuencia.
    fn dispatch(&mut self, result: &OperationResult) {
        for reporter in self.reporters.iter_mut() {
            if let Err(e) = reporter.report(result) {
                warn!("reporter failed on operation #{}: {e}", result.index);
            }
        }
    }

    /// Eventos de una ejecución.
    pub fn events(&self, run_id: Uuid) -> Vec<SequenceEvent> {
        self.event_store.list(run_id)
    }

    pub fn last_run_id(&self) -> Option<Uuid> {
        self.last_run_id
    }

    /// Reconstruye el estado de una ejecución desde sus eventos.
    pub fn instance(&self, run_id: Uuid, sequence: &Sequence) -> RunInstance {
        let events = self.event_store.list(run_id);
        self.repository.load(run_id, &events, sequence)
    }

    /// Fingerprint agregado de una ejecución completada.
    pub fn sequence_fingerprint(&self, run_id: Uuid) -> Option<String> {
        self.event_store.list(run_id).iter().rev().find_map(|e| match &e.kind {
                                                          SequenceEventKind::SequenceCompleted { sequence_fingerprint } => {
                                                              Some(sequence_fingerprint.clone())
                                                          }
                                                          _ => None,
                                                      })
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    pub fn signer(&self) -> &SignerHandle {
        &self.signer
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }
}

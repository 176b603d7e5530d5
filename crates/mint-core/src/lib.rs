//! mint-core: secuenciador lineal de operaciones on-chain.
//!
//! Toma una lista ordenada de llamadas (lectura o escritura) contra contratos
//! ya desplegados y las ejecuta estrictamente en orden, esperando el recibo
//! de cada escritura antes de continuar. El primer fallo aborta la secuencia.
pub mod chain;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod operation;
pub mod registry;
pub mod repo;
pub mod reporter;

pub use chain::{CallKind, CallRecord, ChainClient, Receipt, RecordingChainClient, SendOptions, SignerHandle, SignerProvider};
pub use engine::{CancellationToken, SequenceAbort, Sequencer, SequencerBuilder};
pub use errors::{ChainError, SequenceError};
pub use event::{EventStore, InMemoryEventStore, SequenceEvent, SequenceEventKind};
pub use operation::{Arg, Operation, OperationMode, OperationResult, OperationStatus, Outcome, RawOutput, Sequence};
pub use registry::ContractRegistry;
pub use repo::{InMemoryRunRepository, OperationSlot, RunInstance, RunRepository};
pub use reporter::{CollectingReporter, JsonLinesReporter, LogReporter, ReportError, Reporter};

#[cfg(test)]
mod tests {
    use super::*;
    use mint_domain::{Address, ContractAbi};
    use serde_json::json;

    fn registry() -> ContractRegistry {
        let mut reg = ContractRegistry::new();
        let abi = ContractAbi::from_human(&["claim(uint256)", "tokenURI(uint256) view returns (string)"]).unwrap();
        reg.register("legoot",
                      Address::parse("0x819766088b2e8Bd418071F89607BaB722fD0A606").unwrap(),
                      abi)
           .unwrap();
        reg
    }

    #[tokio::test]
    async fn claim_then_token_uri_emits_linear_events() {
        let reg = registry();
        let ops = vec![Operation::write(&reg, "legoot", "claim", vec![Arg::lit(1)]).unwrap(),
                       Operation::read(&reg, "legoot", "tokenURI", vec![Arg::lit(1)]).unwrap()];
        let seq = Sequence::new(ops).unwrap();

        let chain = RecordingChainClient::new().on("tokenURI", |_| Ok(json!("data:application/json;base64,e30=")));
        let signer = SignerHandle::new(Address::zero(), "test");
        let mut sequencer = Sequencer::builder(chain, signer).build();

        let results = sequencer.run(&seq).await.expect("sequence should complete");
        assert_eq!(results.len(), 2);

        let run_id = sequencer.last_run_id().unwrap();
        let variants: Vec<&str> = sequencer.events(run_id)
                                           .iter()
                                           .map(|e| e.kind.short_code())
                                           .collect();
        assert_eq!(variants, vec!["I", "S", "T", "F", "S", "F", "C"]);
    }
}

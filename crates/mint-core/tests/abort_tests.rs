use mint_core::{Arg, CancellationToken, ChainError, ContractRegistry, Operation, RecordingChainClient, Sequence, SequenceError,
                Sequencer, SignerHandle};
use mint_domain::{Address, ContractAbi};
use serde_json::json;
use std::sync::Arc;

const LEGOOT: &str = "0x819766088b2e8Bd418071F89607BaB722fD0A606";
const METACORE: &str = "0x2d3f6E4B0bB8C0a5b4D8cB9f5E77E1D0aB3C4f21";

fn registry() -> ContractRegistry {
    let mut reg = ContractRegistry::new();
    let legoot = ContractAbi::from_human(&["function claim(uint256)",
                                           "function tokenURI(uint256) view returns (string)",
                                           "function approve(address,uint256)"]).unwrap();
    let metacore = ContractAbi::from_human(&["function claim(string)",
                                             "function combine(uint256,address,uint256)",
                                             "function tokenURI(uint256) view returns (string)"]).unwrap();
    reg.register("legoot", Address::parse(LEGOOT).unwrap(), legoot).unwrap();
    reg.register("metacore", Address::parse(METACORE).unwrap(), metacore).unwrap();
    reg
}

// claim metacore, claim legoot 10, approve, combine, tokenURI
fn metacore_sequence(reg: &ContractRegistry) -> Sequence {
    Sequence::new(vec![Operation::write(reg, "metacore", "claim", vec![Arg::lit("DRepublic")]).unwrap(),
                       Operation::write(reg, "legoot", "claim", vec![Arg::lit(10)]).unwrap(),
                       Operation::write(reg, "legoot", "approve", vec![Arg::lit(METACORE), Arg::lit(10)]).unwrap(),
                       Operation::write(reg, "metacore", "combine", vec![Arg::lit(1), Arg::lit(LEGOOT), Arg::lit(10)]).unwrap(),
                       Operation::read(reg, "metacore", "tokenURI", vec![Arg::lit(1)]).unwrap()]).unwrap()
}

fn signer() -> SignerHandle {
    SignerHandle::new(Address::zero(), "test")
}

#[tokio::test]
async fn rejected_approve_stops_before_combine() {
    let reg = registry();
    let seq = metacore_sequence(&reg);
    let chain = Arc::new(RecordingChainClient::new().fail_on("approve", ChainError::Reverted("not owner".into())));
    let mut sequencer = Sequencer::builder(chain.clone(), signer()).build();

    let abort = sequencer.run(&seq).await.unwrap_err();

    assert_eq!(abort.results.len(), 2);
    assert!(abort.results.iter().all(|r| r.is_success()));
    let failed = abort.failed.as_ref().unwrap();
    assert_eq!(failed.index, 2);
    assert_eq!(failed.function, "approve(address,uint256)");
    assert_eq!(abort.error,
               SequenceError::RemoteCall { index: 2,
                                           label: "legoot.approve".into(),
                                           contract: "legoot".into(),
                                           function: "approve(address,uint256)".into(),
                                           source: ChainError::Reverted("not owner".into()) });
    assert_eq!(chain.call_names(), vec!["claim", "claim", "approve"]);
}

#[tokio::test]
async fn failure_at_each_position_yields_exactly_the_prefix() {
    let reg = registry();
    let seq = metacore_sequence(&reg);
    let names = ["claim", "claim", "approve", "combine", "tokenURI"];
    // "claim" aparece dos veces; sólo se prueban las funciones únicas.
    for (i, name) in names.iter().enumerate().skip(2) {
        let chain = Arc::new(RecordingChainClient::new().fail_on(name, ChainError::Transport("connection reset".into())));
        let mut sequencer = Sequencer::builder(chain.clone(), signer()).build();
        let abort = sequencer.run(&seq).await.unwrap_err();
        assert_eq!(abort.results.len(), i, "failing {name}");
        assert_eq!(abort.error.operation_index(), Some(i));
        assert_eq!(chain.calls().len(), i + 1, "nothing after {name} may be sent");
    }
}

#[tokio::test]
async fn failed_run_events_end_with_the_failure() {
    let reg = registry();
    let seq = metacore_sequence(&reg);
    let chain = RecordingChainClient::new().fail_on("approve", ChainError::Reverted("not owner".into()));
    let mut sequencer = Sequencer::builder(chain, signer()).build();
    let abort = sequencer.run(&seq).await.unwrap_err();

    let codes: Vec<&str> = sequencer.events(abort.run_id).iter().map(|e| e.kind.short_code()).collect();
    assert_eq!(codes, vec!["I", "S", "T", "F", "S", "T", "F", "S", "X"]);
    assert!(sequencer.sequence_fingerprint(abort.run_id).is_none());
}

#[tokio::test]
async fn cancellation_is_observed_between_operations() {
    let reg = registry();
    let seq = metacore_sequence(&reg);
    let token = CancellationToken::new();
    let trigger = token.clone();
    // El token se activa durante el segundo envío; la operación en vuelo termina.
    let chain = Arc::new(RecordingChainClient::new().on("claim", move |r| {
                                                        if r.args[0] == json!(10) {
                                                            trigger.cancel();
                                                        }
                                                        Ok(serde_json::Value::Null)
                                                    }));
    let mut sequencer = Sequencer::builder(chain.clone(), signer()).cancel_token(token).build();

    let abort = sequencer.run(&seq).await.unwrap_err();

    assert_eq!(abort.results.len(), 2);
    assert!(abort.failed.is_none());
    assert_eq!(abort.error, SequenceError::Cancelled { next_index: 2 });
    assert_eq!(chain.call_names(), vec!["claim", "claim"]);
    let last = sequencer.events(abort.run_id).last().map(|e| e.kind.short_code());
    assert_eq!(last, Some("K"));
}

#[tokio::test]
async fn abort_message_counts_completed_operations() {
    let reg = registry();
    let seq = metacore_sequence(&reg);
    let chain = RecordingChainClient::new().fail_on("combine", ChainError::Rejected("insufficient funds".into()));
    let mut sequencer = Sequencer::builder(chain, signer()).build();
    let abort = sequencer.run(&seq).await.unwrap_err();
    assert_eq!(abort.to_string(),
               "sequence aborted after 3 completed operation(s): operation #3 (metacore.combine): \
                combine(uint256,address,uint256) on `metacore` failed: rejected by node: insufficient funds");
}

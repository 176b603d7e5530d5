use mint_adapters::{AdapterError, BuiltinScript, NftSimulator};
use mint_cli::commands::{execute_sequence, script_addresses, write_networks};
use mint_cli::{CliError, OutputFormat};
use mint_core::{ChainError, SequenceError, SignerHandle};
use mint_domain::Address;
use std::collections::BTreeMap;

fn caller() -> SignerHandle {
    SignerHandle::new(Address::parse("0xA5225cBEE5052100Ec2D2D94aA6d258558073757").unwrap(), "k")
}

#[test]
fn overrides_win_over_config_and_defaults() {
    let script = BuiltinScript::Metacore;
    let from_config = Address::parse("0x1111111111111111111111111111111111111111").unwrap();
    let from_cli = Address::parse("0x2222222222222222222222222222222222222222").unwrap();
    let mut configured = BTreeMap::new();
    configured.insert("legoot".to_string(), from_config.clone());
    configured.insert("metacore".to_string(), from_config.clone());

    let addrs = script_addresses(script, &configured, &[("metacore".to_string(), from_cli.clone())]);
    assert_eq!(addrs.get("legoot"), Some(&from_config));
    assert_eq!(addrs.get("metacore"), Some(&from_cli));

    let defaults = script_addresses(script, &BTreeMap::new(), &[]);
    assert_eq!(defaults, script.default_addresses());
}

#[test]
fn networks_listing_has_every_preset() {
    let mut out = Vec::new();
    write_networks(OutputFormat::Text, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    for name in ["development", "rinkeby", "matic", "mumbai", "bsclive", "bsctest"] {
        assert!(text.contains(name), "{name}");
    }

    let mut out = Vec::new();
    write_networks(OutputFormat::Json, &mut out).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 6);
    assert_eq!(v[1]["network_id"], 4);
}

#[tokio::test]
async fn script_run_succeeds_and_rerun_maps_to_exit_code_4() {
    let script = BuiltinScript::Legoot;
    let addrs = script.default_addresses();
    let (registry, seq) = script.plan(&addrs).unwrap().build(None, None).unwrap();
    let sim = std::sync::Arc::new(NftSimulator::for_registry(&registry));

    let results = execute_sequence(sim.clone(), &seq, caller(), None, None, OutputFormat::Text).await.unwrap();
    assert_eq!(results.len(), seq.len());

    let err = execute_sequence(sim, &seq, caller(), None, None, OutputFormat::Text).await.unwrap_err();
    assert_eq!(err.exit_code(), 4);
    match err {
        CliError::Aborted(abort) => assert!(matches!(abort.error,
                                                     SequenceError::RemoteCall { source: ChainError::Reverted(_), .. })),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn network_gas_is_used_only_when_the_contract_sets_none() {
    let script = BuiltinScript::Legoot;
    let mut plan = script.plan(&script.default_addresses()).unwrap();
    let (registry, seq) = plan.build(None, None).unwrap();
    let results = execute_sequence(NftSimulator::for_registry(&registry), &seq, caller(), None, Some(30_000), OutputFormat::Text).await
                                                                                                                 .unwrap();
    assert_eq!(results.len(), seq.len());

    plan.contracts[0].gas_limit = None;
    let (registry, seq) = plan.build(None, None).unwrap();
    let err = execute_sequence(NftSimulator::for_registry(&registry), &seq, caller(), None, Some(30_000), OutputFormat::Text).await
                                                                                                             .unwrap_err();
    match err {
        CliError::Aborted(abort) => {
            assert!(abort.results.is_empty());
            assert!(matches!(abort.error, SequenceError::RemoteCall { source: ChainError::Reverted(ref m), .. } if m.starts_with("out of gas")));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn gas_override_below_need_aborts_first_write() {
    let script = BuiltinScript::NftFactory;
    let (registry, seq) = script.plan(&script.default_addresses()).unwrap().build(None, None).unwrap();
    let err = execute_sequence(NftSimulator::for_registry(&registry), &seq, caller(), Some(50_000), None, OutputFormat::Text).await
                                                                                                               .unwrap_err();
    match err {
        CliError::Aborted(abort) => {
            // attributes() es una lectura; mintBatch es la primera escritura
            assert_eq!(abort.results.len(), 1);
            assert_eq!(abort.error.operation_index(), Some(1));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn exit_codes_follow_error_kind() {
    assert_eq!(CliError::from(mintflow::AppError::MissingVar("X".into())).exit_code(), 2);
    assert_eq!(CliError::Signer(AdapterError::InvalidSecret("x".into())).exit_code(), 2);
    assert_eq!(CliError::from(AdapterError::UnknownScript("x".into())).exit_code(), 3);
}

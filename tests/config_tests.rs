use mintflow::{AppConfig, AppError};

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

const CALLER: &str = "0xA5225cBEE5052100Ec2D2D94aA6d258558073757";

#[test]
fn minimal_config_uses_preset_and_defaults() {
    let cfg = AppConfig::from_vars(vars(&[("MINTFLOW_NETWORK", "bsctest"), ("MINTFLOW_CALLER", CALLER)])).unwrap();
    assert_eq!(cfg.network.name, "bsctest");
    assert_eq!(cfg.rpc_url, "https://data-seed-prebsc-1-s1.binance.org:8545/");
    assert_eq!(cfg.secret_path.to_str(), Some(".secret"));
    assert_eq!(cfg.caller.as_str(), CALLER.to_ascii_lowercase());
    assert_eq!(cfg.gas_limit, None);
    assert!(cfg.addresses.is_empty());
}

#[test]
fn network_is_required() {
    let err = AppConfig::from_vars(vars(&[("MINTFLOW_CALLER", CALLER)])).unwrap_err();
    assert!(matches!(err, AppError::MissingVar(ref v) if v == "MINTFLOW_NETWORK"));
    let err = AppConfig::from_vars(vars(&[("MINTFLOW_NETWORK", "  "), ("MINTFLOW_CALLER", CALLER)])).unwrap_err();
    assert!(matches!(err, AppError::MissingVar(_)));
}

#[test]
fn infura_key_is_substituted() {
    let cfg = AppConfig::from_vars(vars(&[("MINTFLOW_NETWORK", "mumbai"),
                                          ("MINTFLOW_CALLER", CALLER),
                                          ("INFURA_API_KEY", "k3y")])).unwrap();
    assert_eq!(cfg.rpc_url, "https://polygon-mumbai.infura.io/v3/k3y");

    let err = AppConfig::from_vars(vars(&[("MINTFLOW_NETWORK", "mumbai"), ("MINTFLOW_CALLER", CALLER)])).unwrap_err();
    assert!(matches!(err, AppError::MissingVar(ref v) if v == "INFURA_API_KEY"));
}

#[test]
fn explicit_rpc_url_wins_over_preset() {
    let cfg = AppConfig::from_vars(vars(&[("MINTFLOW_NETWORK", "rinkeby"),
                                          ("MINTFLOW_CALLER", CALLER),
                                          ("MINTFLOW_RPC_URL", "http://127.0.0.1:7545")])).unwrap();
    assert_eq!(cfg.rpc_url, "http://127.0.0.1:7545");
}

#[test]
fn gas_limit_and_addresses_are_parsed() {
    let cfg = AppConfig::from_vars(vars(&[("MINTFLOW_NETWORK", "development"),
                                          ("MINTFLOW_CALLER", CALLER),
                                          ("MINTFLOW_GAS_LIMIT", "6000000"),
                                          ("MINTFLOW_ADDRESS_LEGOOT", "0x819766088b2e8Bd418071F89607BaB722fD0A606")])).unwrap();
    assert_eq!(cfg.gas_limit, Some(6_000_000));
    assert_eq!(cfg.addresses["legoot"].as_str(), "0x819766088b2e8bd418071f89607bab722fd0a606");

    let err = AppConfig::from_vars(vars(&[("MINTFLOW_NETWORK", "development"),
                                          ("MINTFLOW_CALLER", CALLER),
                                          ("MINTFLOW_GAS_LIMIT", "lots")])).unwrap_err();
    assert!(matches!(err, AppError::InvalidVar { .. }));
}

#[test]
fn bad_caller_is_a_domain_error() {
    let err = AppConfig::from_vars(vars(&[("MINTFLOW_NETWORK", "development"), ("MINTFLOW_CALLER", "0x123")])).unwrap_err();
    assert!(matches!(err, AppError::Domain(_)));
}

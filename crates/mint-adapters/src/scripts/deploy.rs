//! Migración inicial: NFTFactory, DRepublic, NFTBlindBox y NFTIncubator.
//!
//! Cada despliegue pasa por el contrato `deployer`, que emite un log
//! `ContractDeployed` con `contractAddress`. BlindBox recibe las direcciones
//! de la factory y del token; Incubator las de la factory y de BlindBox.
use serde_json::json;

use crate::error::AdapterError;
use crate::plan::{prior_placeholder, prior_placeholder_from, OperationSpec, PlanSpec};

use super::ScriptAddresses;

pub const REQUIRED_CONTRACTS: &[&str] = &["deployer"];
pub(crate) const DEFAULT_ADDRESSES: &[(&str, &str)] = &[("deployer", "0x000000000000000000000000000000000000dE91")];

/// Límite de gas con el que se desplegó DRepublic.
pub const GAS_LIMIT: u64 = 5_000_000;
pub const DEPLOYED_ADDRESS: &str = "/logs/0/contractAddress";

pub const FACTORY_NAME: &str = "DRepublic NFT";
pub const FACTORY_SYMBOL: &str = "DRPC";
pub const FACTORY_BASE_URI: &str = "https://www.cradles.io/dragontar/";
pub const TOKEN_NAME: &str = "Wrapped ETH";
pub const TOKEN_SYMBOL: &str = "WETH";
pub const TOKEN_SUPPLY: &str = "100000000000000000000000000";

pub const ABI: &[&str] = &["function deployNFTFactory(string name, string symbol, string baseURI) returns (address)",
                           "function deployDRepublic(string name, string symbol, uint256 initialSupply) returns (address)",
                           "function deployNFTBlindBox(address factory, address token) returns (address)",
                           "function deployNFTIncubator(address factory, address blindBox) returns (address)"];

pub fn plan(addresses: &ScriptAddresses) -> Result<PlanSpec, AdapterError> {
    Ok(PlanSpec { contracts: vec![super::contract(addresses, "deployer", ABI, GAS_LIMIT)?],
                  operations: vec![OperationSpec::new("deployer",
                                                      "deployNFTFactory",
                                                      vec![json!(FACTORY_NAME), json!(FACTORY_SYMBOL), json!(FACTORY_BASE_URI)])
                                       .labeled("deploy NFTFactory"),
                                   OperationSpec::new("deployer",
                                                      "deployDRepublic",
                                                      vec![json!(TOKEN_NAME), json!(TOKEN_SYMBOL), json!(TOKEN_SUPPLY)])
                                       .labeled("deploy DRepublic"),
                                   OperationSpec::new("deployer",
                                                      "deployNFTBlindBox",
                                                      vec![prior_placeholder_from(0, DEPLOYED_ADDRESS),
                                                           prior_placeholder_from(1, DEPLOYED_ADDRESS)])
                                       .labeled("deploy NFTBlindBox"),
                                   OperationSpec::new("deployer",
                                                      "deployNFTIncubator",
                                                      vec![prior_placeholder_from(0, DEPLOYED_ADDRESS),
                                                           prior_placeholder(Some(DEPLOYED_ADDRESS))])
                                       .labeled("deploy NFTIncubator")
                                       .depends_on(2)] })
}

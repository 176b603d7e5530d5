//! Metacore: un Metacore absorbe dos Legoots y luego los suelta.
use serde_json::json;

use crate::error::AdapterError;
use crate::plan::{OperationSpec, PlanSpec};

use super::ScriptAddresses;

pub const REQUIRED_CONTRACTS: &[&str] = &["metacore", "legoot"];
pub(crate) const DEFAULT_ADDRESSES: &[(&str, &str)] = &[("metacore", "0x782f03cef839083c5db38f2ccb4de15d212db70a"),
                                                         ("legoot", "0x0927C6A8A35b1A62531fEB8D5eFbEF23a09F39a1")];

pub const GAS_LIMIT: u64 = 5_500_000;
pub const METACORE_ID: u64 = 1;
pub const LEGOOT_IDS: [u64; 2] = [10, 11];
pub const CLAIM_NAME: &str = "DRepublic";

pub const ABI: &[&str] = &["function claim(string name)",
                           "function tokenURI(uint256 tokenId) view returns (string)",
                           "function ownerOf(uint256 tokenId) view returns (address)",
                           "function combine(uint256 tokenId, address collection, uint256 subId)",
                           "function separateOne(uint256 tokenId, uint256 subId)",
                           "function separate(uint256 tokenId)"];

pub fn plan(addresses: &ScriptAddresses) -> Result<PlanSpec, AdapterError> {
    let metacore = super::contract(addresses, "metacore", ABI, GAS_LIMIT)?;
    let legoot = super::contract(addresses, "legoot", super::legoot::ABI, GAS_LIMIT)?;
    let metacore_addr = json!(metacore.address);
    let legoot_addr = json!(legoot.address);
    let [first, second] = LEGOOT_IDS;
    let meta_uri = || OperationSpec::new("metacore", "tokenURI", vec![json!(METACORE_ID)]).labeled("tokenURI Metacore");

    Ok(PlanSpec { contracts: vec![metacore, legoot],
                  operations: vec![OperationSpec::new("metacore", "claim", vec![json!(CLAIM_NAME)]).labeled("claim Metacore"),
                                   meta_uri(),
                                   OperationSpec::new("legoot", "claim", vec![json!(first)]).labeled("claim Legoot"),
                                   OperationSpec::new("legoot", "tokenURI", vec![json!(first)]).labeled("tokenURI Legoot"),
                                   OperationSpec::new("legoot", "claim", vec![json!(second)]).labeled("claim Legoot2"),
                                   OperationSpec::new("legoot", "tokenURI", vec![json!(second)]).labeled("tokenURI Legoot2"),
                                   OperationSpec::new("legoot", "approve", vec![metacore_addr.clone(), json!(first)])
                                       .labeled("approve Legoot to Metacore contract"),
                                   OperationSpec::new("metacore", "combine", vec![json!(METACORE_ID), legoot_addr.clone(), json!(first)])
                                       .labeled("combine"),
                                   meta_uri(),
                                   OperationSpec::new("legoot", "approve", vec![metacore_addr, json!(second)])
                                       .labeled("approve Legoot2 to Metacore contract"),
                                   OperationSpec::new("metacore", "combine", vec![json!(METACORE_ID), legoot_addr, json!(second)])
                                       .labeled("combine Legoot2"),
                                   meta_uri(),
                                   OperationSpec::new("metacore", "separateOne", vec![json!(METACORE_ID), json!(first)])
                                       .labeled("separateOne"),
                                   meta_uri(),
                                   OperationSpec::new("metacore", "separate", vec![json!(METACORE_ID)]).labeled("separateAll"),
                                   meta_uri()] })
}

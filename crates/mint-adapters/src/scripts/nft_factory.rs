//! NFT factory: acuña los atributos ERC-3664 y crea un NFT con ellos.
use serde_json::{json, Value};

use crate::error::AdapterError;
use crate::plan::{OperationSpec, PlanSpec};

use super::ScriptAddresses;

pub const REQUIRED_CONTRACTS: &[&str] = &["nft_factory", "generic_attr"];
pub(crate) const DEFAULT_ADDRESSES: &[(&str, &str)] = &[("nft_factory", "0xF99e00ebF5FCE2f5045bf5B9f6cd5714A91B9d07"),
                                                         ("generic_attr", "0x3826eE4F3bdF0C727c328d792039141c7535c26D")];

pub const GAS_LIMIT: u64 = 5_500_000;
/// Tipo de atributo bajo el que la factory registró el contrato genérico.
pub const GENERIC_ATTRIBUTE_TYPE: u64 = 2;
pub const ATTRIBUTES: [(u64, &str); 10] = [(1, "bg"),
                                           (2, "body"),
                                           (3, "dress"),
                                           (4, "neck"),
                                           (5, "eyes"),
                                           (6, "tooth"),
                                           (7, "mouth"),
                                           (8, "decorates"),
                                           (9, "hat"),
                                           (10, "rare")];
pub const RECIPIENT: &str = "0x0A559eD20fD86DC38A7aF82E7EdE91aE9b43b5f5";
pub const DNA: &str = "007005000000007001003000010";
pub const VALUES: [u64; 10] = [7, 5, 0, 0, 7, 1, 3, 0, 10, 10];

pub const FACTORY_ABI: &[&str] = &["function attributes(uint256 attrType) view returns (address)",
                                   "function registerAttribute(uint256 attrType, address attr)",
                                   "function createNFT(address recipient, string name, uint256[] attrIds, uint256[] values)"];

pub const GENERIC_ABI: &[&str] = &["function mintBatch(uint256[] attrIds, string[] names, string[] symbols, string[] uris)",
                                   "function grantRole(bytes32 role, address account)",
                                   "function balanceOf(uint256 tokenId, uint256 attrId) view returns (uint256)"];

pub fn plan(addresses: &ScriptAddresses) -> Result<PlanSpec, AdapterError> {
    let ids: Vec<Value> = ATTRIBUTES.iter().map(|(id, _)| json!(id)).collect();
    let names: Vec<Value> = ATTRIBUTES.iter().map(|(_, n)| json!(n)).collect();
    let uris: Vec<Value> = ATTRIBUTES.iter().map(|_| json!("")).collect();

    Ok(PlanSpec { contracts: vec![super::contract(addresses, "nft_factory", FACTORY_ABI, GAS_LIMIT)?,
                                  super::contract(addresses, "generic_attr", GENERIC_ABI, GAS_LIMIT)?],
                  operations: vec![OperationSpec::new("nft_factory", "attributes", vec![json!(GENERIC_ATTRIBUTE_TYPE)])
                                       .labeled("attributes"),
                                   OperationSpec::new("generic_attr",
                                                      "mintBatch",
                                                      vec![json!(ids), json!(names), json!(names), json!(uris)])
                                       .labeled("mintBatch"),
                                   OperationSpec::new("nft_factory",
                                                      "createNFT",
                                                      vec![json!(RECIPIENT), json!(DNA), json!(ids), json!(VALUES)])
                                       .labeled("createNFT")] })
}

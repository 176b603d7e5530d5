//! Legoot: reclamar, separar un item, separar todos y recombinar.
use serde_json::json;

use crate::error::AdapterError;
use crate::plan::{OperationSpec, PlanSpec};

use super::ScriptAddresses;

pub const REQUIRED_CONTRACTS: &[&str] = &["legoot"];
pub(crate) const DEFAULT_ADDRESSES: &[(&str, &str)] = &[("legoot", "0x819766088b2e8Bd418071F89607BaB722fD0A606")];

pub const GAS_LIMIT: u64 = 8_000_000;
pub const LOOT_ID: u64 = 1;
/// Items por Legoot; el primero de `id` es `8001 + (id - 1) * 8`.
pub const ITEMS_PER_LOOT: u64 = 8;
pub const FIRST_ITEM_ID: u64 = 8001;

pub const ABI: &[&str] = &["function claim(uint256 tokenId)",
                           "function tokenURI(uint256 tokenId) view returns (string)",
                           "function ownerOf(uint256 tokenId) view returns (address)",
                           "function approve(address to, uint256 tokenId)",
                           "function separateOne(uint256 tokenId, uint256 itemId)",
                           "function separate(uint256 tokenId)",
                           "function combine(uint256 tokenId, uint256[] itemIds)"];

pub fn first_item_of(loot_id: u64) -> u64 {
    FIRST_ITEM_ID + (loot_id - 1) * ITEMS_PER_LOOT
}

pub fn plan(addresses: &ScriptAddresses) -> Result<PlanSpec, AdapterError> {
    let item = first_item_of(LOOT_ID);
    let uri = || OperationSpec::new("legoot", "tokenURI", vec![json!(LOOT_ID)]);
    Ok(PlanSpec { contracts: vec![super::contract(addresses, "legoot", ABI, GAS_LIMIT)?],
                  operations: vec![OperationSpec::new("legoot", "claim", vec![json!(LOOT_ID)]).labeled("claim Legoot"),
                                   uri().labeled("tokenURI Legoot"),
                                   OperationSpec::new("legoot", "separateOne", vec![json!(LOOT_ID), json!(item)]).labeled("Legoot separateOne"),
                                   uri().labeled("tokenURI after separateOne"),
                                   OperationSpec::new("legoot", "separate", vec![json!(LOOT_ID)]).labeled("Legoot separateAll"),
                                   uri().labeled("tokenURI after separateAll"),
                                   OperationSpec::new("legoot", "combine", vec![json!(LOOT_ID), json!([item])]).labeled("combine"),
                                   uri().labeled("tokenURI after combine")] })
}

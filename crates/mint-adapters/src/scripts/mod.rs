//! Scripts integrados: cada uno es un `PlanSpec` sobre un registro cuyas
//! direcciones vienen de configuración (`ScriptAddresses`).
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use mint_domain::Address;

use crate::error::AdapterError;
use crate::plan::{ContractSpec, PlanSpec};

pub mod deploy;
pub mod legoot;
pub mod metacore;
pub mod nft_factory;

/// Nombre lógico -> dirección desplegada.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptAddresses {
    inner: BTreeMap<String, Address>,
}

impl ScriptAddresses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, address: Address) -> Self {
        self.inner.insert(name.to_string(), address);
        self
    }

    pub fn set(&mut self, name: &str, address: Address) {
        self.inner.insert(name.to_string(), address);
    }

    pub fn get(&self, name: &str) -> Option<&Address> {
        self.inner.get(name)
    }

    fn require(&self, name: &str) -> Result<&Address, AdapterError> {
        self.get(name)
            .ok_or_else(|| AdapterError::InvalidPlan(format!("no address configured for contract `{name}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScript {
    Legoot,
    Metacore,
    NftFactory,
    Deploy,
}

impl BuiltinScript {
    pub const ALL: [BuiltinScript; 4] = [BuiltinScript::Legoot,
                                         BuiltinScript::Metacore,
                                         BuiltinScript::NftFactory,
                                         BuiltinScript::Deploy];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinScript::Legoot => "legoot",
            BuiltinScript::Metacore => "metacore",
            BuiltinScript::NftFactory => "nft-factory",
            BuiltinScript::Deploy => "deploy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BuiltinScript::Legoot => "claim a Legoot, split off one item, split all, recombine",
            BuiltinScript::Metacore => "claim a Metacore, combine two Legoots into it, separate them again",
            BuiltinScript::NftFactory => "mint the ten ERC-3664 attributes and create one NFT carrying them",
            BuiltinScript::Deploy => "deploy NFTFactory, DRepublic, NFTBlindBox and NFTIncubator wired to each other",
        }
    }

    /// Contratos que el plan necesita en `ScriptAddresses`.
    pub fn required_contracts(&self) -> &'static [&'static str] {
        match self {
            BuiltinScript::Legoot => legoot::REQUIRED_CONTRACTS,
            BuiltinScript::Metacore => metacore::REQUIRED_CONTRACTS,
            BuiltinScript::NftFactory => nft_factory::REQUIRED_CONTRACTS,
            BuiltinScript::Deploy => deploy::REQUIRED_CONTRACTS,
        }
    }

    /// Direcciones de testnet con las que se ensayaron los scripts.
    pub fn default_addresses(&self) -> ScriptAddresses {
        match self {
            BuiltinScript::Legoot => addresses_from(legoot::DEFAULT_ADDRESSES),
            BuiltinScript::Metacore => addresses_from(metacore::DEFAULT_ADDRESSES),
            BuiltinScript::NftFactory => addresses_from(nft_factory::DEFAULT_ADDRESSES),
            BuiltinScript::Deploy => addresses_from(deploy::DEFAULT_ADDRESSES),
        }
    }

    pub fn plan(&self, addresses: &ScriptAddresses) -> Result<PlanSpec, AdapterError> {
        match self {
            BuiltinScript::Legoot => legoot::plan(addresses),
            BuiltinScript::Metacore => metacore::plan(addresses),
            BuiltinScript::NftFactory => nft_factory::plan(addresses),
            BuiltinScript::Deploy => deploy::plan(addresses),
        }
    }
}

impl fmt::Display for BuiltinScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuiltinScript {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter()
                 .copied()
                 .find(|b| b.name() == s || b.name().replace('-', "_") == s)
                 .ok_or_else(|| AdapterError::UnknownScript(s.to_string()))
    }
}

fn addresses_from(pairs: &[(&str, &str)]) -> ScriptAddresses {
    let mut out = ScriptAddresses::new();
    for (name, raw) in pairs {
        if let Ok(a) = Address::parse(raw) {
            out.set(name, a);
        }
    }
    out
}

pub(crate) fn contract(addresses: &ScriptAddresses, name: &str, abi: &[&str], gas_limit: u64) -> Result<ContractSpec, AdapterError> {
    Ok(ContractSpec { name: name.to_string(),
                      address: Some(addresses.require(name)?.to_string()),
                      abi: Some(Value::Array(abi.iter().map(|l| Value::String((*l).to_string())).collect())),
                      artifact: None,
                      gas_limit: Some(gas_limit) })
}

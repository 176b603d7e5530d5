use serde::Serialize;
use std::fmt;

use crate::{Address, ContractAbi};

/// Descriptor inmutable de un contrato desplegado: nombre lógico, dirección
/// y ABI publicado. La identidad es el nombre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractDescriptor {
    name: String,
    address: Address,
    abi: ContractAbi,
    /// Límite de gas por defecto para escrituras contra este contrato.
    gas_limit: Option<u64>,
}

impl ContractDescriptor {
    pub fn new(name: impl Into<String>, address: Address, abi: ContractAbi) -> Self {
        Self { name: name.into(),
               address,
               abi,
               gas_limit: None }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn address(&self) -> &Address { &self.address }
    pub fn abi(&self) -> &ContractAbi { &self.abi }
    pub fn gas_limit(&self) -> Option<u64> { self.gas_limit }
}

impl fmt::Display for ContractDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.address)
    }
}

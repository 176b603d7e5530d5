//! Registro de contratos: nombre lógico -> {dirección, ABI}.
//!
//! Se llena una vez al arrancar (desde configuración) y luego sólo se presta
//! por referencia compartida a quien construye operaciones. Las operaciones
//! guardan un `Arc<ContractDescriptor>`, así que el registro no necesita
//! vivir durante la ejecución.
use indexmap::IndexMap;
use std::sync::Arc;

use mint_domain::{Address, ContractAbi, ContractDescriptor};

use crate::errors::SequenceError;

#[derive(Debug, Default, Clone)]
pub struct ContractRegistry {
    contracts: IndexMap<String, Arc<ContractDescriptor>>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un contrato. Falla con `DuplicateName` si el nombre ya existe.
    pub fn register(&mut self, name: &str, address: Address, abi: ContractAbi) -> Result<Arc<ContractDescriptor>, SequenceError> {
        self.insert(ContractDescriptor::new(name, address, abi))
    }

    /// Variante que recibe el descriptor ya construido (p.ej. con gas_limit).
    pub fn insert(&mut self, descriptor: ContractDescriptor) -> Result<Arc<ContractDescriptor>, SequenceError> {
        if self.contracts.contains_key(descriptor.name()) {
            return Err(SequenceError::DuplicateName { name: descriptor.name().to_string() });
        }
        let name = descriptor.name().to_string();
        let shared = Arc::new(descriptor);
        self.contracts.insert(name, Arc::clone(&shared));
        Ok(shared)
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<ContractDescriptor>, SequenceError> {
        self.contracts
            .get(name)
            .cloned()
            .ok_or_else(|| SequenceError::UnknownContract { name: name.to_string() })
    }

    /// Atajo para argumentos de tipo `address` que apuntan a otro contrato
    /// registrado (p.ej. `approve(metacore, id)`).
    pub fn address_of(&self, name: &str) -> Result<Address, SequenceError> {
        self.resolve(name).map(|d| d.address().clone())
    }

    /// Nombres en orden de registro.
    pub fn names(&self) -> Vec<&str> {
        self.contracts.keys().map(|k| k.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.contracts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut reg = ContractRegistry::new();
        reg.register("legoot", addr("0x819766088b2e8Bd418071F89607BaB722fD0A606"), ContractAbi::default())
           .unwrap();
        let err = reg.register("legoot", addr("0x0927C6A8A35b1A62531fEB8D5eFbEF23a09F39a1"), ContractAbi::default())
                     .unwrap_err();
        assert_eq!(err, SequenceError::DuplicateName { name: "legoot".into() });
        // el primero sigue intacto
        assert_eq!(reg.address_of("legoot").unwrap(), addr("0x819766088b2e8Bd418071F89607BaB722fD0A606"));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let reg = ContractRegistry::new();
        assert_eq!(reg.resolve("metacore").unwrap_err(),
                   SequenceError::UnknownContract { name: "metacore".into() });
    }

    #[test]
    fn names_keep_registration_order() {
        let mut reg = ContractRegistry::new();
        reg.register("metacore", addr("0x782f03cef839083c5db38f2ccb4de15d212db70a"), ContractAbi::default())
           .unwrap();
        reg.register("legoot", addr("0x0927C6A8A35b1A62531fEB8D5eFbEF23a09F39a1"), ContractAbi::default())
           .unwrap();
        assert_eq!(reg.names(), vec!["metacore", "legoot"]);
        assert_eq!(reg.len(), 2);
    }
}

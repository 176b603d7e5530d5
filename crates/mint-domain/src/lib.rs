// mint-domain library entry point
//! Tipos de dominio compartidos: direcciones, firmas de funciones (ABI) y
//! descriptores de contratos. No conoce el motor ni el cliente de cadena.
pub mod abi;
pub mod address;
pub mod contract;
pub mod error;

pub use abi::{ContractAbi, FunctionSignature, Mutability, ParamType};
pub use address::Address;
pub use contract::ContractDescriptor;
pub use error::DomainError;

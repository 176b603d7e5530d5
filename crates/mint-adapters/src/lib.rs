//! mint-adapters: capa de adaptación entre el mundo exterior y `mint-core`.
//!
//! Este crate provee:
//! - Carga de artifacts de truffle (`build/contracts/*.json`) a descriptores.
//! - `MnemonicSigner`: lee el fichero de frase secreta y entrega un
//!   `SignerHandle` opaco al core.
//! - Planes declarativos en JSON (`PlanSpec`) que construyen registro +
//!   secuencia validados antes de ejecutar nada.
//! - Los scripts `legoot`, `metacore` y `nft-factory` como planes integrados.
//! - `NftSimulator`: ledger en proceso que implementa `ChainClient`.

pub mod artifact;
pub mod error;
pub mod plan;
pub mod scripts;
pub mod signer;
pub mod sim;

pub use artifact::TruffleArtifact;
pub use error::AdapterError;
pub use plan::{ContractSpec, OperationSpec, PlanSpec};
pub use scripts::{BuiltinScript, ScriptAddresses};
pub use signer::MnemonicSigner;
pub use sim::NftSimulator;

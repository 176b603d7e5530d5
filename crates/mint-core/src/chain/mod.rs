//! Frontera con el cliente de cadena y el firmante.
//!
//! El core no codifica llamadas ni firma transacciones: ambas cosas son
//! responsabilidad del `ChainClient` inyectado. El engine sólo entrega un
//! `SignerHandle` opaco (dirección + identificador de clave), nunca el
//! secreto.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use mint_domain::{Address, FunctionSignature};

use crate::errors::ChainError;

mod recording;

pub use recording::{CallKind, CallRecord, RecordingChainClient};

/// Recibo de una transacción aceptada y finalizada por la red.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: String,
    pub block_number: u64,
    /// `false` = la transacción se minó pero revirtió.
    pub status: bool,
    pub gas_used: u64,
    #[serde(default)]
    pub logs: Vec<Value>,
}

/// Opciones por envío. Hoy sólo el límite de gas del contrato/override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub gas_limit: Option<u64>,
}

/// Identidad de firma opaca.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SignerHandle {
    address: Address,
    key_id: String,
}

impl SignerHandle {
    pub fn new(address: Address, key_id: impl Into<String>) -> Self {
        Self { address,
               key_id: key_id.into() }
    }

    /// Cuenta emisora (`from`).
    pub fn address(&self) -> &Address { &self.address }
    pub fn key_id(&self) -> &str { &self.key_id }
}

/// Capacidad que produce una identidad de firma a partir de un secreto.
pub trait SignerProvider {
    fn handle(&self) -> SignerHandle;
}

/// Cliente de cadena (JSON-RPC o simulado).
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Lectura sin transacción.
    async fn call(&self, contract: &Address, function: &FunctionSignature, args: &[Value]) -> Result<Value, ChainError>;

    /// Envía una transacción firmada y espera su recibo finalizado.
    async fn send(&self,
                  contract: &Address,
                  function: &FunctionSignature,
                  args: &[Value],
                  signer: &SignerHandle,
                  options: &SendOptions)
                  -> Result<Receipt, ChainError>;
}

#[async_trait]
impl<T: ChainClient + ?Sized> ChainClient for Arc<T> {
    async fn call(&self, contract: &Address, function: &FunctionSignature, args: &[Value]) -> Result<Value, ChainError> {
        (**self).call(contract, function, args).await
    }

    async fn send(&self,
                  contract: &Address,
                  function: &FunctionSignature,
                  args: &[Value],
                  signer: &SignerHandle,
                  options: &SendOptions)
                  -> Result<Receipt, ChainError> {
        (**self).send(contract, function, args, signer, options).await
    }
}

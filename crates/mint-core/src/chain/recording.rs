//! `RecordingChainClient`: cliente en memoria que registra cada invocación
//! en orden y responde con handlers por nombre de función. Sirve para tests
//! y para ensayar una secuencia sin red.
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use mint_domain::{Address, FunctionSignature};

use super::{ChainClient, Receipt, SendOptions, SignerHandle};
use crate::errors::ChainError;
use crate::hashing::hash_value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Call,
    Send,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub kind: CallKind,
    pub contract: Address,
    pub function: String,
    pub signature: String,
    pub args: Vec<Value>,
    pub from: Option<Address>,
    pub gas_limit: Option<u64>,
}

type Handler = Box<dyn Fn(&CallRecord) -> Result<Value, ChainError> + Send + Sync>;

/// Sin handler, una lectura devuelve `null` y una escritura un recibo vacío.
/// Para escrituras, un handler que devuelve un valor no nulo lo deja como
/// único log del recibo.
pub struct RecordingChainClient {
    calls: Mutex<Vec<CallRecord>>,
    handlers: HashMap<String, Handler>,
    block: AtomicU64,
}

impl RecordingChainClient {
    pub fn new() -> Self {
        Self { calls: Mutex::new(Vec::new()),
               handlers: HashMap::new(),
               block: AtomicU64::new(1) }
    }

    pub fn on<F>(mut self, function: &str, handler: F) -> Self
        where F: Fn(&CallRecord) -> Result<Value, ChainError> + Send + Sync + 'static
    {
        self.handlers.insert(function.to_string(), Box::new(handler));
        self
    }

    pub fn fail_on(self, function: &str, error: ChainError) -> Self {
        self.on(function, move |_| Err(error.clone()))
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn call_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.function).collect()
    }

    fn record(&self, record: CallRecord) -> Result<Value, ChainError> {
        let reply = match self.handlers.get(&record.function) {
            Some(h) => h(&record),
            None => Ok(Value::Null),
        };
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).push(record);
        reply
    }
}

impl Default for RecordingChainClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for RecordingChainClient {
    async fn call(&self, contract: &Address, function: &FunctionSignature, args: &[Value]) -> Result<Value, ChainError> {
        self.record(CallRecord { kind: CallKind::Call,
                                 contract: contract.clone(),
                                 function: function.name.clone(),
                                 signature: function.signature(),
                                 args: args.to_vec(),
                                 from: None,
                                 gas_limit: None })
    }

    async fn send(&self,
                  contract: &Address,
                  function: &FunctionSignature,
                  args: &[Value],
                  signer: &SignerHandle,
                  options: &SendOptions)
                  -> Result<Receipt, ChainError> {
        let value = self.record(CallRecord { kind: CallKind::Send,
                                             contract: contract.clone(),
                                             function: function.name.clone(),
                                             signature: function.signature(),
                                             args: args.to_vec(),
                                             from: Some(signer.address().clone()),
                                             gas_limit: options.gas_limit })?;
        let block_number = self.block.fetch_add(1, Ordering::SeqCst);
        let transaction_hash = format!("0x{}",
                                       hash_value(&json!({
                                           "block": block_number,
                                           "contract": contract.as_str(),
                                           "signature": function.signature(),
                                           "args": args,
                                       })));
        let logs = if value.is_null() { Vec::new() } else { vec![value] };
        Ok(Receipt { transaction_hash,
                     block_number,
                     status: true,
                     gas_used: 21_000,
                     logs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mint_domain::Mutability;

    #[tokio::test]
    async fn records_in_order_and_builds_receipts() {
        let client = RecordingChainClient::new().on("claim", |r| Ok(json!({ "tokenId": r.args[0] })));
        let claim = FunctionSignature::new("claim", vec![mint_domain::ParamType::Uint(256)], vec![], Mutability::Write);
        let uri = FunctionSignature::new("tokenURI", vec![mint_domain::ParamType::Uint(256)], vec![], Mutability::Read);
        let signer = SignerHandle::new(Address::zero(), "k");

        let r1 = client.send(&Address::zero(), &claim, &[json!(7)], &signer, &SendOptions::default())
                       .await
                       .unwrap();
        let r2 = client.send(&Address::zero(), &claim, &[json!(8)], &signer, &SendOptions::default())
                       .await
                       .unwrap();
        let v = client.call(&Address::zero(), &uri, &[json!(7)]).await.unwrap();

        assert_eq!(r1.logs, vec![json!({"tokenId": 7})]);
        assert_eq!(r2.block_number, r1.block_number + 1);
        assert_ne!(r1.transaction_hash, r2.transaction_hash);
        assert_eq!(v, Value::Null);
        assert_eq!(client.call_names(), vec!["claim", "claim", "tokenURI"]);
        assert_eq!(client.calls()[0].from, Some(Address::zero()));
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

use mint_domain::{ContractDescriptor, FunctionSignature, Mutability};

use crate::errors::SequenceError;
use crate::registry::ContractRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    Read,
    Write,
}

impl From<Mutability> for OperationMode {
    fn from(m: Mutability) -> Self {
        match m {
            Mutability::Read => OperationMode::Read,
            Mutability::Write => OperationMode::Write,
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationMode::Read => f.write_str("read"),
            OperationMode::Write => f.write_str("write"),
        }
    }
}

/// Argumento de una operación.
///
/// `Prior` es un marcador que el engine sustituye por el valor de un
/// resultado anterior: el de `from` si se indica, si no el de `depends_on`
/// (completo, o el sub-valor en `pointer`, un JSON pointer). La sustitución
/// no convierte tipos. `List` permite marcadores dentro de un array, p. ej.
/// `combine(1, [<item del recibo anterior>])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Arg {
    Literal(Value),
    Prior {
        from: Option<usize>,
        pointer: Option<String>,
    },
    List(Vec<Arg>),
}

impl Arg {
    pub fn lit(v: impl Into<Value>) -> Self {
        Arg::Literal(v.into())
    }

    pub fn prior() -> Self {
        Arg::Prior { from: None, pointer: None }
    }

    pub fn prior_at(pointer: impl Into<String>) -> Self {
        Arg::Prior { from: None,
                     pointer: Some(pointer.into()) }
    }

    /// Sub-valor del resultado de la operación `index`, sin pasar por
    /// `depends_on`.
    pub fn prior_of(index: usize, pointer: impl Into<String>) -> Self {
        Arg::Prior { from: Some(index),
                     pointer: Some(pointer.into()) }
    }

    pub fn list(items: Vec<Arg>) -> Self {
        Arg::List(items)
    }

    pub fn has_placeholder(&self) -> bool {
        match self {
            Arg::Literal(_) => false,
            Arg::Prior { .. } => true,
            Arg::List(items) => items.iter().any(Arg::has_placeholder),
        }
    }

    /// Índice de origen de cada marcador (`None` = el de `depends_on`).
    pub fn sources(&self) -> Vec<Option<usize>> {
        match self {
            Arg::Literal(_) => Vec::new(),
            Arg::Prior { from, .. } => vec![*from],
            Arg::List(items) => items.iter().flat_map(Arg::sources).collect(),
        }
    }

    fn shape(&self) -> Value {
        match self {
            Arg::Literal(v) => v.clone(),
            Arg::Prior { from: None, pointer } => json!({ "$prior": pointer }),
            Arg::Prior { from: Some(i), pointer } => json!({ "$prior": pointer, "$from": i }),
            Arg::List(items) => Value::Array(items.iter().map(Arg::shape).collect()),
        }
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Literal(v)
    }
}

/// Llamada a una función de un contrato registrado.
#[derive(Debug, Clone)]
pub struct Operation {
    label: String,
    target: Arc<ContractDescriptor>,
    function: FunctionSignature,
    args: Vec<Arg>,
    mode: OperationMode,
    depends_on: Option<usize>,
}

impl Operation {
    /// Resuelve contrato y función (por nombre y aridad) en el registro.
    pub fn new(registry: &ContractRegistry,
               contract: &str,
               function: &str,
               args: Vec<Arg>,
               mode: OperationMode)
               -> Result<Self, SequenceError> {
        let target = registry.resolve(contract)?;
        Self::on(target, function, args, mode)
    }

    /// Igual que `new` pero con un descriptor ya resuelto.
    pub fn on(target: Arc<ContractDescriptor>, function: &str, args: Vec<Arg>, mode: OperationMode) -> Result<Self, SequenceError> {
        let signature = target.abi()
                              .resolve(function, args.len())
                              .cloned()
                              .ok_or_else(|| SequenceError::UnknownFunction { contract: target.name().to_string(),
                                                                               function: function.to_string(),
                                                                               arity: args.len() })?;
        Ok(Self { label: format!("{}.{}", target.name(), function),
                  target,
                  function: signature,
                  args,
                  mode,
                  depends_on: None })
    }

    pub fn read(registry: &ContractRegistry, contract: &str, function: &str, args: Vec<Arg>) -> Result<Self, SequenceError> {
        Self::new(registry, contract, function, args, OperationMode::Read)
    }

    pub fn write(registry: &ContractRegistry, contract: &str, function: &str, args: Vec<Arg>) -> Result<Self, SequenceError> {
        Self::new(registry, contract, function, args, OperationMode::Write)
    }

    /// Declara la dependencia sobre una operación anterior (índice en la
    /// secuencia). La secuencia valida que apunte hacia atrás.
    pub fn depends_on(mut self, index: usize) -> Self {
        self.depends_on = Some(index);
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str { &self.label }
    pub fn target(&self) -> &Arc<ContractDescriptor> { &self.target }
    pub fn contract_name(&self) -> &str { self.target.name() }
    pub fn function(&self) -> &FunctionSignature { &self.function }
    pub fn args(&self) -> &[Arg] { &self.args }
    pub fn mode(&self) -> OperationMode { self.mode }
    pub fn dependency(&self) -> Option<usize> { self.depends_on }

    pub fn has_placeholders(&self) -> bool {
        self.args.iter().any(Arg::has_placeholder)
    }

    /// Forma estable usada para el hash de definición de la secuencia.
    pub(crate) fn shape(&self) -> Value {
        let args: Vec<Value> = self.args.iter().map(Arg::shape).collect();
        json!({
            "label": self.label,
            "contract": self.target.name(),
            "address": self.target.address().as_str(),
            "function": self.function.signature(),
            "mode": self.mode,
            "args": args,
            "depends_on": self.depends_on,
        })
    }
}

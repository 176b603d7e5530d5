//! Planes declarativos en JSON.
//!
//! ```json
//! {
//!   "contracts": [
//!     { "name": "legoot", "address": "0x8197...", "gas_limit": 8000000,
//!       "abi": ["function claim(uint256)", "function tokenURI(uint256) view returns (string)"] }
//!   ],
//!   "operations": [
//!     { "contract": "legoot", "function": "claim", "args": [1] },
//!     { "contract": "legoot", "function": "tokenURI", "args": [{ "$prior": "/logs/0/tokenId" }], "depends_on": 0 }
//!   ]
//! }
//! ```
//!
//! Un marcador puede aparecer dentro de un array (`"args": [1, [{"$prior":
//! "/logs/0/tokenId"}]]`) y puede leer otra operación anterior con `"$from"`.
//!
//! `abi` acepta el JSON de Solidity o una lista de firmas legibles; en su
//! lugar puede darse `artifact` (ruta a un artifact de truffle, relativa al
//! fichero del plan). Construir el plan valida primero el registro y después
//! la secuencia: ninguna mala configuración llega a ejecutarse.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use mint_core::{Arg, ContractRegistry, Operation, OperationMode, Sequence};
use mint_domain::{Address, ContractAbi, ContractDescriptor};

use crate::artifact::TruffleArtifact;
use crate::error::AdapterError;

/// Clave del marcador de argumento dependiente.
pub const PRIOR_KEY: &str = "$prior";
/// Índice explícito de la operación que se lee (opcional).
pub const FROM_KEY: &str = "$from";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSpec {
    pub contracts: Vec<ContractSpec>,
    pub operations: Vec<OperationSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub contract: String,
    pub function: String,
    /// Sin `mode` se usa la mutabilidad declarada en el ABI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<OperationMode>,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<usize>,
}

impl OperationSpec {
    pub fn new(contract: &str, function: &str, args: Vec<Value>) -> Self {
        Self { label: None,
               contract: contract.to_string(),
               function: function.to_string(),
               mode: None,
               args,
               depends_on: None }
    }

    pub fn labeled(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn depends_on(mut self, index: usize) -> Self {
        self.depends_on = Some(index);
        self
    }
}

/// `{"$prior": null}` o `{"$prior": "/pointer"}`.
pub fn prior_placeholder(pointer: Option<&str>) -> Value {
    let mut m = Map::new();
    m.insert(PRIOR_KEY.to_string(), pointer.map_or(Value::Null, |p| Value::String(p.to_string())));
    Value::Object(m)
}

/// `{"$prior": "/pointer", "$from": index}`: lee el resultado `index` en vez
/// del de `depends_on`.
pub fn prior_placeholder_from(index: usize, pointer: &str) -> Value {
    let mut m = Map::new();
    m.insert(PRIOR_KEY.to_string(), Value::String(pointer.to_string()));
    m.insert(FROM_KEY.to_string(), Value::from(index));
    Value::Object(m)
}

fn is_placeholder(m: &Map<String, Value>) -> bool {
    m.contains_key(PRIOR_KEY) && m.keys().all(|k| k == PRIOR_KEY || k == FROM_KEY)
}

fn to_arg(value: &Value) -> Result<Arg, AdapterError> {
    match value {
        Value::Object(m) if is_placeholder(m) => {
            let pointer = match &m[PRIOR_KEY] {
                Value::Null => None,
                Value::String(p) => Some(p.clone()),
                other => {
                    return Err(AdapterError::InvalidPlan(format!("`{PRIOR_KEY}` must be null or a JSON pointer, got {other}")))
                }
            };
            let from = match m.get(FROM_KEY) {
                None => None,
                Some(v) => {
                    let i = v.as_u64()
                             .ok_or_else(|| AdapterError::InvalidPlan(format!("`{FROM_KEY}` must be an operation index, got {v}")))?;
                    Some(i as usize)
                }
            };
            Ok(Arg::Prior { from, pointer })
        }
        Value::Array(items) => {
            let args = items.iter().map(to_arg).collect::<Result<Vec<_>, _>>()?;
            if args.iter().any(Arg::has_placeholder) {
                Ok(Arg::List(args))
            } else {
                Ok(Arg::Literal(value.clone()))
            }
        }
        other => Ok(Arg::Literal(other.clone())),
    }
}

fn parse_abi(value: &Value) -> Result<ContractAbi, AdapterError> {
    match value.as_array() {
        Some(items) if !items.is_empty() && items.iter().all(Value::is_string) => {
            let lines: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            Ok(ContractAbi::from_human(&lines)?)
        }
        _ => Ok(ContractAbi::from_json(value)?),
    }
}

impl PlanSpec {
    pub fn from_json_str(src: &str) -> Result<Self, AdapterError> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AdapterError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|e| AdapterError::io(path, e))?;
        Self::from_json_str(&src)
    }

    pub fn to_json_pretty(&self) -> Result<String, AdapterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Construye el registro. `base_dir` resuelve rutas de artifacts
    /// relativas; `network_id` elige el despliegue si falta `address`.
    pub fn build_registry(&self, base_dir: Option<&Path>, network_id: Option<&str>) -> Result<ContractRegistry, AdapterError> {
        let mut registry = ContractRegistry::new();
        for spec in &self.contracts {
            let address = spec.address.as_deref().map(Address::parse).transpose()?;
            let descriptor = match (&spec.abi, &spec.artifact) {
                (Some(abi), None) => {
                    let address = address.ok_or_else(|| {
                                              AdapterError::InvalidPlan(format!("contract `{}` needs an address", spec.name))
                                          })?;
                    ContractDescriptor::new(spec.name.clone(), address, parse_abi(abi)?)
                }
                (None, Some(artifact)) => {
                    let path = match base_dir {
                        Some(dir) => dir.join(artifact),
                        None => PathBuf::from(artifact),
                    };
                    TruffleArtifact::load(path)?.descriptor(&spec.name, address, network_id)?
                }
                _ => {
                    return Err(AdapterError::InvalidPlan(format!("contract `{}` needs exactly one of `abi` or `artifact`",
                                                                 spec.name)))
                }
            };
            let descriptor = match spec.gas_limit {
                Some(g) => descriptor.with_gas_limit(g),
                None => descriptor,
            };
            registry.insert(descriptor)?;
        }
        Ok(registry)
    }

    pub fn build_sequence(&self, registry: &ContractRegistry) -> Result<Sequence, AdapterError> {
        let mut operations = Vec::with_capacity(self.operations.len());
        for spec in &self.operations {
            let args = spec.args.iter().map(to_arg).collect::<Result<Vec<_>, _>>()?;
            let target = registry.resolve(&spec.contract)?;
            let mode = match spec.mode {
                Some(m) => m,
                None => target.abi()
                              .resolve(&spec.function, args.len())
                              .map(|f| OperationMode::from(f.mutability))
                              .unwrap_or(OperationMode::Write),
            };
            let mut op = Operation::on(target, &spec.function, args, mode)?;
            if let Some(label) = &spec.label {
                op = op.labeled(label.clone());
            }
            if let Some(dep) = spec.depends_on {
                op = op.depends_on(dep);
            }
            operations.push(op);
        }
        Ok(Sequence::new(operations)?)
    }

    pub fn build(&self, base_dir: Option<&Path>, network_id: Option<&str>) -> Result<(ContractRegistry, Sequence), AdapterError> {
        let registry = self.build_registry(base_dir, network_id)?;
        let sequence = self.build_sequence(&registry)?;
        Ok((registry, sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mint_core::SequenceError;
    use serde_json::json;

    fn plan() -> Value {
        json!({
            "contracts": [{
                "name": "legoot",
                "address": "0x819766088b2e8Bd418071F89607BaB722fD0A606",
                "gas_limit": 8000000,
                "abi": ["function claim(uint256)", "function tokenURI(uint256) view returns (string)"]
            }],
            "operations": [
                { "label": "claim Legoot", "contract": "legoot", "function": "claim", "args": [1] },
                { "contract": "legoot", "function": "tokenURI", "args": [{ "$prior": "/logs/0/tokenId" }], "depends_on": 0 }
            ]
        })
    }

    #[test]
    fn builds_registry_and_sequence() {
        let spec: PlanSpec = serde_json::from_value(plan()).unwrap();
        let (reg, seq) = spec.build(None, None).unwrap();
        assert_eq!(reg.resolve("legoot").unwrap().gas_limit(), Some(8_000_000));
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.operations()[0].label(), "claim Legoot");
        assert_eq!(seq.operations()[0].mode(), OperationMode::Write);
        assert_eq!(seq.operations()[1].label(), "legoot.tokenURI");
        assert_eq!(seq.operations()[1].mode(), OperationMode::Read);
        assert_eq!(seq.operations()[1].args(), &[Arg::prior_at("/logs/0/tokenId")]);
    }

    #[test]
    fn unknown_contract_is_reported_before_running() {
        let mut v = plan();
        v["operations"][0]["contract"] = json!("metacore");
        let spec: PlanSpec = serde_json::from_value(v).unwrap();
        let err = spec.build(None, None).unwrap_err();
        assert!(matches!(err, AdapterError::Sequence(SequenceError::UnknownContract { .. })), "got {err:?}");
    }

    #[test]
    fn duplicate_contract_names_are_rejected() {
        let mut v = plan();
        let c = v["contracts"][0].clone();
        v["contracts"].as_array_mut().unwrap().push(c);
        let spec: PlanSpec = serde_json::from_value(v).unwrap();
        assert!(matches!(spec.build(None, None),
                         Err(AdapterError::Sequence(SequenceError::DuplicateName { .. }))));
    }

    #[test]
    fn bad_prior_marker_is_rejected() {
        let mut v = plan();
        v["operations"][1]["args"] = json!([{ "$prior": 3 }]);
        let spec: PlanSpec = serde_json::from_value(v).unwrap();
        assert!(matches!(spec.build(None, None), Err(AdapterError::InvalidPlan(_))));
    }

    #[test]
    fn contract_needs_abi_or_artifact() {
        let mut v = plan();
        v["contracts"][0].as_object_mut().unwrap().remove("abi");
        let spec: PlanSpec = serde_json::from_value(v).unwrap();
        assert!(matches!(spec.build(None, None), Err(AdapterError::InvalidPlan(_))));
    }

    #[test]
    fn placeholder_inside_array_argument_builds() {
        let mut v = plan();
        v["contracts"][0]["abi"].as_array_mut().unwrap().push(json!("function combine(uint256, uint256[])"));
        v["operations"][1] = json!({ "contract": "legoot", "function": "combine",
                                     "args": [1, [{ "$prior": "/logs/0/tokenId" }]], "depends_on": 0 });
        let spec: PlanSpec = serde_json::from_value(v).unwrap();
        let (_, seq) = spec.build(None, None).unwrap();
        assert_eq!(seq.operations()[1].args(),
                   &[Arg::lit(1), Arg::list(vec![Arg::prior_at("/logs/0/tokenId")])]);
    }

    #[test]
    fn literal_arrays_stay_literal() {
        assert_eq!(to_arg(&json!([8001, 8002])).unwrap(), Arg::Literal(json!([8001, 8002])));
    }

    #[test]
    fn explicit_source_needs_an_index() {
        assert_eq!(to_arg(&prior_placeholder_from(2, "/logs/0/contractAddress")).unwrap(),
                   Arg::prior_of(2, "/logs/0/contractAddress"));
        assert!(matches!(to_arg(&json!({"$prior": null, "$from": "x"})), Err(AdapterError::InvalidPlan(_))));
    }

    #[test]
    fn placeholder_helper_matches_parser() {
        assert_eq!(to_arg(&prior_placeholder(None)).unwrap(), Arg::prior());
        assert_eq!(to_arg(&prior_placeholder(Some("/x"))).unwrap(), Arg::prior_at("/x"));
        assert_eq!(to_arg(&json!({"$prior": null, "other": 1})).unwrap(),
                   Arg::Literal(json!({"$prior": null, "other": 1})));
    }
}

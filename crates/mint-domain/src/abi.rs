//! Interfaz publicada de un contrato (ABI).
//!
//! Sólo modelamos lo necesario para orquestar llamadas:
//! - `ParamType`: etiquetas de tipos Solidity (sin codificación binaria; la
//!   codificación on-chain la hace el cliente de cadena).
//! - `FunctionSignature`: nombre, tipos de entrada/salida y mutabilidad.
//! - `ContractAbi`: lista ordenada de funciones, cargada desde el JSON del ABI
//!   (array plano o artifact de truffle con campo `abi`) o desde la forma
//!   legible `"tokenURI(uint256) view returns (string)"`.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::{Address, DomainError};

/// Tipo de parámetro Solidity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    Uint(usize),
    Int(usize),
    Address,
    Bool,
    String,
    Bytes,
    FixedBytes(usize),
    Array(Box<ParamType>),
    FixedArray(Box<ParamType>, usize),
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Parsea un tipo escalar o array (`uint256`, `address[]`, `bytes32[4]`).
    /// Las tuplas requieren componentes, por lo que sólo llegan vía JSON.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        Self::parse_with(raw, &[])
    }

    fn parse_with(raw: &str, components: &[RawParam]) -> Result<Self, DomainError> {
        let s = raw.trim();
        if let Some(stripped) = s.strip_suffix(']') {
            let open = stripped.rfind('[')
                               .ok_or_else(|| DomainError::InvalidType(s.to_string()))?;
            let inner = Self::parse_with(&stripped[..open], components)?;
            let dim = &stripped[open + 1..];
            if dim.is_empty() {
                return Ok(ParamType::Array(Box::new(inner)));
            }
            let n = dim.parse::<usize>()
                       .map_err(|_| DomainError::InvalidType(s.to_string()))?;
            return Ok(ParamType::FixedArray(Box::new(inner), n));
        }
        match s {
            "address" => Ok(ParamType::Address),
            "bool" => Ok(ParamType::Bool),
            "string" => Ok(ParamType::String),
            "bytes" => Ok(ParamType::Bytes),
            "uint" => Ok(ParamType::Uint(256)),
            "int" => Ok(ParamType::Int(256)),
            "tuple" => {
                if components.is_empty() {
                    return Err(DomainError::InvalidType("tuple without components".into()));
                }
                components.iter()
                          .map(|c| Self::parse_with(&c.ty, &c.components))
                          .collect::<Result<Vec<_>, _>>()
                          .map(ParamType::Tuple)
            }
            _ => {
                if let Some(bits) = s.strip_prefix("uint") {
                    return int_bits(bits, s).map(ParamType::Uint);
                }
                if let Some(bits) = s.strip_prefix("int") {
                    return int_bits(bits, s).map(ParamType::Int);
                }
                if let Some(n) = s.strip_prefix("bytes") {
                    return match n.parse::<usize>() {
                        Ok(n) if (1..=32).contains(&n) => Ok(ParamType::FixedBytes(n)),
                        _ => Err(DomainError::InvalidType(s.to_string())),
                    };
                }
                Err(DomainError::InvalidType(s.to_string()))
            }
        }
    }

    /// Forma canónica usada en firmas (`claim(uint256)`).
    pub fn canonical(&self) -> String {
        match self {
            ParamType::Uint(n) => format!("uint{n}"),
            ParamType::Int(n) => format!("int{n}"),
            ParamType::Address => "address".into(),
            ParamType::Bool => "bool".into(),
            ParamType::String => "string".into(),
            ParamType::Bytes => "bytes".into(),
            ParamType::FixedBytes(n) => format!("bytes{n}"),
            ParamType::Array(inner) => format!("{}[]", inner.canonical()),
            ParamType::FixedArray(inner, n) => format!("{}[{n}]", inner.canonical()),
            ParamType::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(|t| t.canonical()).collect();
                format!("({})", parts.join(","))
            }
        }
    }

    /// Comprobación estructural de un valor JSON contra el tipo. No convierte
    /// nada: el valor se entrega tal cual al cliente de cadena.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ParamType::Uint(_), Value::Number(n)) => n.is_u64(),
            (ParamType::Uint(_), Value::String(s)) => is_decimal(s) || is_hex(s, None),
            (ParamType::Int(_), Value::Number(n)) => n.is_i64() || n.is_u64(),
            (ParamType::Int(_), Value::String(s)) => is_decimal(s.strip_prefix('-').unwrap_or(s)),
            (ParamType::Address, Value::String(s)) => Address::parse(s).is_ok(),
            (ParamType::Bool, Value::Bool(_)) => true,
            (ParamType::String, Value::String(_)) => true,
            (ParamType::Bytes, Value::String(s)) => is_hex(s, None),
            (ParamType::FixedBytes(n), Value::String(s)) => is_hex(s, Some(*n)),
            (ParamType::Array(inner), Value::Array(items)) => items.iter().all(|v| inner.accepts(v)),
            (ParamType::FixedArray(inner, n), Value::Array(items)) => {
                items.len() == *n && items.iter().all(|v| inner.accepts(v))
            }
            (ParamType::Tuple(types), Value::Array(items)) => {
                types.len() == items.len() && types.iter().zip(items).all(|(t, v)| t.accepts(v))
            }
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

fn int_bits(bits: &str, whole: &str) -> Result<usize, DomainError> {
    match bits.parse::<usize>() {
        Ok(b) if b > 0 && b <= 256 && b % 8 == 0 => Ok(b),
        _ => Err(DomainError::InvalidType(whole.to_string())),
    }
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn is_hex(s: &str, bytes: Option<usize>) -> bool {
    let Some(hex) = s.strip_prefix("0x") else { return false };
    if hex.len() % 2 != 0 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }
    bytes.map_or(true, |n| hex.len() == n * 2)
}

/// Lectura (`call`) o escritura (`send`, transacción firmada).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    Read,
    Write,
}

impl Mutability {
    fn from_state_mutability(s: &str) -> Self {
        match s {
            "view" | "pure" => Mutability::Read,
            _ => Mutability::Write,
        }
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutability::Read => f.write_str("read"),
            Mutability::Write => f.write_str("write"),
        }
    }
}

/// Firma de una función del contrato.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub inputs: Vec<ParamType>,
    pub outputs: Vec<ParamType>,
    pub mutability: Mutability,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, inputs: Vec<ParamType>, outputs: Vec<ParamType>, mutability: Mutability) -> Self {
        Self { name: name.into(),
               inputs,
               outputs,
               mutability }
    }

    /// `name(type1,type2)`
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|t| t.canonical()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    /// Parsea la forma legible:
    /// `[function] name(type [argName], ...) [view|pure|payable|nonpayable] [returns (type, ...)]`.
    pub fn parse_human(src: &str) -> Result<Self, DomainError> {
        let bad = || DomainError::InvalidSignature(src.to_string());
        let s = src.trim();
        let s = s.strip_prefix("function ").unwrap_or(s).trim();
        let open = s.find('(').ok_or_else(bad)?;
        let name = s[..open].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(bad());
        }
        let close = matching_paren(s, open).ok_or_else(bad)?;
        let inputs = parse_type_list(&s[open + 1..close]).map_err(|_| bad())?;

        let mut mutability = Mutability::Write;
        let mut outputs = Vec::new();
        let mut rest = s[close + 1..].trim();
        while !rest.is_empty() {
            if let Some(r) = rest.strip_prefix("returns") {
                let r = r.trim_start();
                if !r.starts_with('(') {
                    return Err(bad());
                }
                let c = matching_paren(r, 0).ok_or_else(bad)?;
                outputs = parse_type_list(&r[1..c]).map_err(|_| bad())?;
                rest = r[c + 1..].trim();
                continue;
            }
            let (word, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            match word {
                "view" | "pure" => mutability = Mutability::Read,
                "payable" | "nonpayable" => mutability = Mutability::Write,
                "external" | "public" => {}
                _ => return Err(bad()),
            }
            rest = tail.trim();
        }
        Ok(Self::new(name, inputs, outputs, mutability))
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_type_list(s: &str) -> Result<Vec<ParamType>, DomainError> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for item in s.split(',') {
        let item = item.trim();
        let ty = item.split_whitespace()
                     .next()
                     .ok_or_else(|| DomainError::InvalidType(item.to_string()))?;
        if ty.starts_with('(') {
            return Err(DomainError::InvalidType("tuples are not supported in human-readable form".into()));
        }
        out.push(ParamType::parse(ty)?);
    }
    Ok(out)
}

// Formato JSON del ABI de Solidity. Sólo las entradas `function` interesan.
#[derive(Debug, Deserialize)]
struct RawAbiEntry {
    #[serde(rename = "type", default = "default_entry_kind")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<RawParam>,
    #[serde(default)]
    outputs: Vec<RawParam>,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<String>,
    #[serde(default)]
    constant: Option<bool>,
}

fn default_entry_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    components: Vec<RawParam>,
}

/// ABI de un contrato: lista ordenada de funciones (puede haber sobrecargas).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractAbi {
    functions: Vec<FunctionSignature>,
}

impl ContractAbi {
    pub fn new(functions: Vec<FunctionSignature>) -> Self {
        Self { functions }
    }

    /// Acepta el array del ABI o un artifact de truffle (`{"abi": [...]}`).
    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let entries = match value {
            Value::Array(_) => value,
            Value::Object(map) => map.get("abi")
                                     .ok_or_else(|| DomainError::InvalidAbi("object without `abi` field".into()))?,
            _ => return Err(DomainError::InvalidAbi("expected array or artifact object".into())),
        };
        let raw: Vec<RawAbiEntry> = serde_json::from_value(entries.clone())?;
        let mut functions = Vec::new();
        for entry in raw.into_iter().filter(|e| e.kind == "function") {
            if entry.name.is_empty() {
                return Err(DomainError::InvalidAbi("function entry without name".into()));
            }
            let inputs = entry.inputs
                              .iter()
                              .map(|p| ParamType::parse_with(&p.ty, &p.components))
                              .collect::<Result<Vec<_>, _>>()?;
            let outputs = entry.outputs
                               .iter()
                               .map(|p| ParamType::parse_with(&p.ty, &p.components))
                               .collect::<Result<Vec<_>, _>>()?;
            let mutability = match entry.state_mutability.as_deref() {
                Some(sm) => Mutability::from_state_mutability(sm),
                None if entry.constant == Some(true) => Mutability::Read,
                None => Mutability::Write,
            };
            functions.push(FunctionSignature::new(entry.name, inputs, outputs, mutability));
        }
        Ok(Self { functions })
    }

    pub fn from_json_str(src: &str) -> Result<Self, DomainError> {
        let v: Value = serde_json::from_str(src)?;
        Self::from_json(&v)
    }

    pub fn from_human(lines: &[&str]) -> Result<Self, DomainError> {
        lines.iter()
             .map(|l| FunctionSignature::parse_human(l))
             .collect::<Result<Vec<_>, _>>()
             .map(Self::new)
    }

    pub fn functions(&self) -> &[FunctionSignature] {
        &self.functions
    }

    /// Primera función con ese nombre.
    pub fn function(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Resuelve sobrecargas por aridad.
    pub fn resolve(&self, name: &str, arity: usize) -> Option<&FunctionSignature> {
        self.functions.iter().find(|f| f.name == name && f.arity() == arity)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_nested_array_types() {
        let t = ParamType::parse("uint256[][3]").unwrap();
        assert_eq!(t.canonical(), "uint256[][3]");
        assert!(ParamType::parse("uint7").is_err());
        assert!(ParamType::parse("bytes33").is_err());
        assert_eq!(ParamType::parse("uint").unwrap(), ParamType::Uint(256));
    }

    #[test]
    fn human_signature_with_returns() {
        let f = FunctionSignature::parse_human("function tokenURI(uint256 tokenId) view returns (string)").unwrap();
        assert_eq!(f.signature(), "tokenURI(uint256)");
        assert_eq!(f.mutability, Mutability::Read);
        assert_eq!(f.outputs, vec![ParamType::String]);

        let g = FunctionSignature::parse_human("combine(uint256,address,uint256)").unwrap();
        assert_eq!(g.mutability, Mutability::Write);
        assert_eq!(g.arity(), 3);
        assert!(FunctionSignature::parse_human("broken(uint256").is_err());
        assert!(FunctionSignature::parse_human("f(uint256) sometimes").is_err());
    }

    #[test]
    fn truffle_artifact_skips_events_and_reads_mutability() {
        let artifact = json!({
            "contractName": "legoot",
            "abi": [
                {"type": "event", "name": "Transfer", "inputs": []},
                {"type": "constructor", "inputs": []},
                {"type": "function", "name": "claim", "inputs": [{"name": "tokenId", "type": "uint256"}],
                 "outputs": [], "stateMutability": "nonpayable"},
                {"name": "tokenURI", "inputs": [{"name": "tokenId", "type": "uint256"}],
                 "outputs": [{"name": "", "type": "string"}], "constant": true},
                {"type": "function", "name": "info", "inputs": [],
                 "outputs": [{"type": "tuple", "components": [{"type": "uint8"}, {"type": "address"}]}],
                 "stateMutability": "view"}
            ]
        });
        let abi = ContractAbi::from_json(&artifact).unwrap();
        assert_eq!(abi.len(), 3);
        assert_eq!(abi.function("claim").unwrap().mutability, Mutability::Write);
        assert_eq!(abi.function("tokenURI").unwrap().mutability, Mutability::Read);
        assert_eq!(abi.function("info").unwrap().outputs[0].canonical(), "(uint8,address)");
    }

    #[test]
    fn accepts_is_structural_only() {
        let uint = ParamType::Uint(256);
        assert!(uint.accepts(&json!(1)));
        assert!(uint.accepts(&json!("100000000000000000000000000")));
        assert!(!uint.accepts(&json!(-1)));
        assert!(!uint.accepts(&json!("ten")));
        let ids = ParamType::parse("uint256[]").unwrap();
        assert!(ids.accepts(&json!([1, 2, 3])));
        assert!(!ids.accepts(&json!([1, "x"])));
        assert!(ParamType::Address.accepts(&json!("0x0A559eD20fD86DC38A7aF82E7EdE91aE9b43b5f5")));
        assert!(ParamType::FixedBytes(2).accepts(&json!("0xabcd")));
        assert!(!ParamType::FixedBytes(2).accepts(&json!("0xab")));
    }
}

//! Definición inmutable de una secuencia de operaciones.
//!
//! Equivale a la definición del flujo: lista ordenada + `definition_hash`
//! calculado sobre la forma canónica de cada operación. Toda la validación
//! estática ocurre aquí, antes de ejecutar nada:
//! - `depends_on` apunta estrictamente hacia atrás.
//! - un marcador `Arg::Prior` exige `depends_on` o un `from` anterior.
//! - las partes literales de cada argumento encajan estructuralmente con la
//!   firma (lo sustituido se comprueba al ejecutar).
use serde_json::Value;

use mint_domain::ParamType;

use crate::errors::SequenceError;
use crate::hashing::hash_value;

use super::definition::{Arg, Operation};

#[derive(Debug, Clone)]
pub struct Sequence {
    operations: Vec<Operation>,
    definition_hash: String,
}

impl Sequence {
    pub fn new(operations: Vec<Operation>) -> Result<Self, SequenceError> {
        for (index, op) in operations.iter().enumerate() {
            match op.dependency() {
                Some(dep) if dep >= index => {
                    return Err(SequenceError::InvalidDependency { index,
                                                                  reason: format!("depends on #{dep}, which is not an earlier operation") });
                }
                _ => {}
            }
            for source in op.args().iter().flat_map(Arg::sources) {
                match source.or(op.dependency()) {
                    None => {
                        return Err(SequenceError::InvalidDependency { index,
                                                                      reason: "placeholder argument without depends_on".into() });
                    }
                    Some(dep) if dep >= index => {
                        return Err(SequenceError::InvalidDependency { index,
                                                                      reason: format!("placeholder reads #{dep}, which is not an earlier operation") });
                    }
                    Some(_) => {}
                }
            }
            for (position, (arg, ty)) in op.args().iter().zip(op.function().inputs.iter()).enumerate() {
                if !fits(arg, ty) {
                    return Err(SequenceError::ArgumentMismatch { index,
                                                                 label: op.label().to_string(),
                                                                 position,
                                                                 expected: ty.canonical() });
                }
            }
        }
        let shapes: Vec<Value> = operations.iter().map(|o| o.shape()).collect();
        let definition_hash = hash_value(&Value::Array(shapes));
        Ok(Self { operations, definition_hash })
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn get(&self, index: usize) -> Option<&Operation> {
        self.operations.get(index)
    }

    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

// Un marcador encaja con cualquier tipo; el resto se comprueba como literal.
fn fits(arg: &Arg, ty: &ParamType) -> bool {
    match (arg, ty) {
        (Arg::Literal(v), _) => ty.accepts(v),
        (Arg::Prior { .. }, _) => true,
        (Arg::List(items), ParamType::Array(inner)) => items.iter().all(|a| fits(a, inner)),
        (Arg::List(items), ParamType::FixedArray(inner, n)) => items.len() == *n && items.iter().all(|a| fits(a, inner)),
        (Arg::List(items), ParamType::Tuple(types)) => {
            items.len() == types.len() && items.iter().zip(types).all(|(a, t)| fits(a, t))
        }
        (Arg::List(_), _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ContractRegistry;
    use mint_domain::{Address, ContractAbi};

    fn registry() -> ContractRegistry {
        let mut reg = ContractRegistry::new();
        let abi = ContractAbi::from_human(&["claim(uint256)",
                                            "tokenURI(uint256) view returns (string)",
                                            "approve(address,uint256)",
                                            "combine(uint256,uint256[])"]).unwrap();
        reg.register("legoot", Address::zero(), abi).unwrap();
        reg
    }

    #[test]
    fn forward_dependency_is_rejected() {
        let reg = registry();
        let ops = vec![Operation::write(&reg, "legoot", "claim", vec![Arg::lit(1)]).unwrap().depends_on(1),
                       Operation::read(&reg, "legoot", "tokenURI", vec![Arg::lit(1)]).unwrap()];
        let err = Sequence::new(ops).unwrap_err();
        assert!(matches!(err, SequenceError::InvalidDependency { index: 0, .. }), "got {err:?}");
    }

    #[test]
    fn self_dependency_is_rejected() {
        let reg = registry();
        let ops = vec![Operation::read(&reg, "legoot", "tokenURI", vec![Arg::lit(1)]).unwrap().depends_on(0)];
        assert!(Sequence::new(ops).is_err());
    }

    #[test]
    fn placeholder_needs_dependency() {
        let reg = registry();
        let ops = vec![Operation::read(&reg, "legoot", "tokenURI", vec![Arg::prior()]).unwrap()];
        let err = Sequence::new(ops).unwrap_err();
        assert!(matches!(err, SequenceError::InvalidDependency { index: 0, .. }));
    }

    #[test]
    fn placeholder_inside_an_array_is_accepted() {
        let reg = registry();
        let item = Arg::list(vec![Arg::prior_at("/logs/0/tokenId")]);
        let ops = vec![Operation::write(&reg, "legoot", "claim", vec![Arg::lit(1)]).unwrap(),
                       Operation::write(&reg, "legoot", "combine", vec![Arg::lit(1), item]).unwrap().depends_on(0)];
        let seq = Sequence::new(ops).unwrap();
        assert!(seq.operations()[1].has_placeholders());
    }

    #[test]
    fn literal_part_of_a_mixed_array_is_still_checked() {
        let reg = registry();
        let items = Arg::list(vec![Arg::prior(), Arg::lit("eight")]);
        let ops = vec![Operation::write(&reg, "legoot", "claim", vec![Arg::lit(1)]).unwrap(),
                       Operation::write(&reg, "legoot", "combine", vec![Arg::lit(1), items]).unwrap().depends_on(0)];
        let err = Sequence::new(ops).unwrap_err();
        assert!(matches!(err, SequenceError::ArgumentMismatch { index: 1, position: 1, .. }), "got {err:?}");
    }

    #[test]
    fn explicit_source_must_be_earlier() {
        let reg = registry();
        let ok = vec![Operation::write(&reg, "legoot", "claim", vec![Arg::lit(1)]).unwrap(),
                      Operation::read(&reg, "legoot", "tokenURI", vec![Arg::prior_of(0, "/logs/0/tokenId")]).unwrap()];
        assert!(Sequence::new(ok).is_ok());

        let forward = vec![Operation::read(&reg, "legoot", "tokenURI", vec![Arg::prior_of(1, "/x")]).unwrap(),
                           Operation::write(&reg, "legoot", "claim", vec![Arg::lit(1)]).unwrap()];
        let err = Sequence::new(forward).unwrap_err();
        assert!(matches!(err, SequenceError::InvalidDependency { index: 0, .. }), "got {err:?}");
    }

    #[test]
    fn literal_type_mismatch_is_caught_before_running() {
        let reg = registry();
        let ops = vec![Operation::write(&reg, "legoot", "approve", vec![Arg::lit("not-an-address"), Arg::lit(10)]).unwrap()];
        let err = Sequence::new(ops).unwrap_err();
        assert_eq!(err,
                   SequenceError::ArgumentMismatch { index: 0,
                                                     label: "legoot.approve".into(),
                                                     position: 0,
                                                     expected: "address".into() });
    }

    #[test]
    fn unknown_function_or_arity() {
        let reg = registry();
        let err = Operation::write(&reg, "legoot", "claim", vec![]).unwrap_err();
        assert!(matches!(err, SequenceError::UnknownFunction { arity: 0, .. }));
        assert!(Operation::write(&reg, "legoot", "burn", vec![Arg::lit(1)]).is_err());
    }

    #[test]
    fn definition_hash_is_stable_and_label_sensitive() {
        let reg = registry();
        let build = |label: &str| {
            Sequence::new(vec![Operation::write(&reg, "legoot", "claim", vec![Arg::lit(1)]).unwrap().labeled(label)]).unwrap()
        };
        assert_eq!(build("claim").definition_hash(), build("claim").definition_hash());
        assert_ne!(build("claim").definition_hash(), build("claim Legoot").definition_hash());
    }
}

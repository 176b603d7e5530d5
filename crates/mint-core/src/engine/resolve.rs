//! Sustitución de marcadores `Arg::Prior` por el valor del resultado del que
//! depende la operación, también dentro de argumentos `Arg::List`.
//!
//! Invariante: si la operación de la que se depende falló, la secuencia ya
//! abortó y esta operación nunca llega aquí. Aun así se comprueba y se
//! devuelve `DependencyUnresolved` si el resultado no existe o no es éxito.
use serde_json::Value;

use crate::errors::SequenceError;
use crate::operation::{Arg, Operation, OperationResult};

struct Resolver<'a> {
    index: usize,
    op: &'a Operation,
    prior: &'a [OperationResult],
}

impl<'a> Resolver<'a> {
    fn unresolved(&self, depends_on: usize) -> SequenceError {
        SequenceError::DependencyUnresolved { index: self.index,
                                              label: self.op.label().to_string(),
                                              depends_on }
    }

    fn value_of(&self, dep: usize) -> Result<&'a Value, SequenceError> {
        self.prior
            .iter()
            .find(|r| r.index == dep)
            .and_then(|r| r.value())
            .ok_or_else(|| self.unresolved(dep))
    }

    fn substitute(&self, arg: &Arg) -> Result<Value, SequenceError> {
        match arg {
            Arg::Literal(v) => Ok(v.clone()),
            Arg::List(items) => items.iter()
                                     .map(|a| self.substitute(a))
                                     .collect::<Result<Vec<_>, _>>()
                                     .map(Value::Array),
            Arg::Prior { from, pointer } => {
                let dep = from.or(self.op.dependency())
                              .ok_or_else(|| SequenceError::InvalidDependency { index: self.index,
                                                                                reason: "placeholder argument without depends_on".into() })?;
                let value = self.value_of(dep)?;
                match pointer {
                    None => Ok(value.clone()),
                    Some(p) => value.pointer(p).cloned().ok_or_else(|| self.unresolved(dep)),
                }
            }
        }
    }
}

pub(crate) fn resolve_args(index: usize, op: &Operation, prior: &[OperationResult]) -> Result<Vec<Value>, SequenceError> {
    let resolver = Resolver { index, op, prior };
    if let Some(dep) = op.dependency() {
        resolver.value_of(dep)?;
    }
    op.args().iter().map(|arg| resolver.substitute(arg)).collect()
}

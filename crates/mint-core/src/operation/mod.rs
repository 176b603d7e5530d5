//! Operaciones y secuencias.
//!
//! Una `Operation` es una llamada a una función de un contrato registrado,
//! en modo lectura (`call`) o escritura (`send`). Se construye antes de
//! ejecutar nada y no se muta después. Este módulo define:
//! - `Operation`, `Arg` y `OperationMode`.
//! - `Sequence`: lista ordenada y validada (dependencias hacia atrás).
//! - `OperationResult` / `Outcome` / `RawOutput`: lo que produce el engine.
//! - `OperationStatus`: estado reconstruido por replay de eventos.

pub mod definition;
mod result;
pub mod sequence;
mod status;

pub use definition::{Arg, Operation, OperationMode};
pub use result::{OperationResult, Outcome, RawOutput};
pub use sequence::Sequence;
pub use status::OperationStatus;

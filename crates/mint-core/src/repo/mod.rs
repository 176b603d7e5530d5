pub mod types;
pub use types::{InMemoryRunRepository, OperationSlot, RunInstance, RunRepository};

/// Estado de una operación dentro de una ejecución.
///
/// Las transiciones válidas son:
/// - `Pending` -> `Running`
/// - `Running` -> `Finished`
/// - `Running` -> `Failed`
///
/// Una operación `Pending` tras un fallo o cancelación nunca se ejecutó.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum OperationStatus {
    Pending,
    Running,
    Finished,
    Failed,
}

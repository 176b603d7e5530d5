//! Constantes del secuenciador.
//!
//! `RUNNER_VERSION` entra en el input de los fingerprints de operación y de
//! secuencia: si cambia, dos ejecuciones idénticas dejan de ser comparables.

/// Versión lógica del runner. Mantener estable mientras no haya cambios
/// incompatibles en el cálculo de fingerprints.
pub const RUNNER_VERSION: &str = "S1.0";

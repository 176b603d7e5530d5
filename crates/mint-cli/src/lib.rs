//! mint-cli: línea de comandos de mintflow.
//!
//! `main.rs` sólo instala el logger, parsea argumentos y traduce el
//! resultado a código de salida; la lógica vive aquí para poder testearla.

pub mod args;
pub mod commands;
pub mod error;

pub use args::{Cli, Command, OutputFormat};
pub use error::CliError;

//! mintflow
//!
//! Librería raíz del workspace:
//! - `config`: configuración explícita (`AppConfig`) cargada desde el entorno.
//! - `network`: presets de red (los de `truffle-config.js`).
//! - `errors`: errores de aplicación.
//!
//! El secuenciador vive en `mint-core`; los adaptadores en `mint-adapters`.

pub mod config;
pub mod errors;
pub mod network;

pub use config::AppConfig;
pub use errors::app_error::AppError;
pub use network::NetworkPreset;

#[cfg(test)]
mod tests {
    use super::errors::app_error::AppError;

    #[test]
    fn app_error_messages() {
        let e = AppError::MissingVar("MINTFLOW_NETWORK".into()).to_string();
        assert_eq!(e, "Variable de entorno no definida: MINTFLOW_NETWORK");
    }
}

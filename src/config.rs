//! Configuración de la aplicación.
//!
//! El `.env` se carga una sola vez (perezosamente); la configuración en sí es
//! un valor `AppConfig` que se pasa explícitamente, nunca un global.
//!
//! Variables:
//! - `MINTFLOW_NETWORK` (obligatoria): preset de red.
//! - `MINTFLOW_RPC_URL`: sustituye la URL del preset.
//! - `INFURA_API_KEY`: para los presets de Infura.
//! - `MINTFLOW_SECRET_PATH`: fichero de frase secreta (por defecto `.secret`).
//! - `MINTFLOW_CALLER` (obligatoria): cuenta emisora.
//! - `MINTFLOW_GAS_LIMIT`: límite de gas para todas las escrituras.
//! - `MINTFLOW_ADDRESS_<NOMBRE>`: dirección del contrato `<nombre>`.
use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use mint_domain::Address;

use crate::errors::app_error::AppError;
use crate::network::NetworkPreset;

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const ADDRESS_PREFIX: &str = "MINTFLOW_ADDRESS_";
pub const DEFAULT_SECRET_PATH: &str = ".secret";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub network: &'static NetworkPreset,
    pub rpc_url: String,
    pub secret_path: PathBuf,
    pub caller: Address,
    pub gas_limit: Option<u64>,
    /// Nombre lógico (minúsculas) -> dirección.
    pub addresses: BTreeMap<String, Address>,
}

impl AppConfig {
    /// Lee el entorno del proceso (tras cargar `.env`).
    pub fn from_env() -> Result<Self, AppError> {
        init_dotenv();
        Self::from_vars(std::env::vars())
    }

    /// Igual que `from_env` pero sobre un conjunto explícito de variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, AppError>
        where I: IntoIterator<Item = (String, String)>
    {
        let vars: HashMap<String, String> = vars.into_iter().filter(|(_, v)| !v.trim().is_empty()).collect();
        let get = |k: &str| vars.get(k).map(|v| v.trim().to_string());
        let require = |k: &str| get(k).ok_or_else(|| AppError::MissingVar(k.to_string()));

        let network = NetworkPreset::find(&require("MINTFLOW_NETWORK")?)?;
        let rpc_url = match get("MINTFLOW_RPC_URL") {
            Some(url) => url,
            None => network.resolve_rpc_url(get("INFURA_API_KEY").as_deref())?,
        };
        let caller = Address::parse(&require("MINTFLOW_CALLER")?)?;
        let gas_limit = get("MINTFLOW_GAS_LIMIT").map(|raw| {
                                                      raw.parse::<u64>()
                                                         .map_err(|e| AppError::InvalidVar { name: "MINTFLOW_GAS_LIMIT".into(),
                                                                                             reason: e.to_string() })
                                                  })
                                                  .transpose()?;
        let secret_path = PathBuf::from(get("MINTFLOW_SECRET_PATH").unwrap_or_else(|| DEFAULT_SECRET_PATH.to_string()));

        let mut addresses = BTreeMap::new();
        for (key, value) in &vars {
            if let Some(name) = key.strip_prefix(ADDRESS_PREFIX) {
                let address = Address::parse(value).map_err(|e| AppError::InvalidVar { name: key.clone(),
                                                                                       reason: e.to_string() })?;
                addresses.insert(name.to_ascii_lowercase(), address);
            }
        }

        Ok(Self { network,
                  rpc_url,
                  secret_path,
                  caller,
                  gas_limit,
                  addresses })
    }
}

/// Fuerza la carga de `.env` desde el binario si se desea antes de leer nada.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

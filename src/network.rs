//! Presets de red equivalentes a `truffle-config.js`.
use serde::Serialize;

use crate::errors::app_error::AppError;

const INFURA_KEY_MARKER: &str = "{INFURA_API_KEY}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkPreset {
    pub name: &'static str,
    /// `None` = cualquier id (`'*'` en truffle).
    pub network_id: Option<u64>,
    pub rpc_url: &'static str,
    /// Límite de gas por defecto para contratos sin límite propio.
    pub gas: Option<u64>,
    /// Sólo informativo: el firmante/cliente decide el precio del gas.
    pub gas_price: Option<u64>,
}

pub const PRESETS: [NetworkPreset; 6] = [NetworkPreset { name: "development",
                                                         network_id: None,
                                                         rpc_url: "http://localhost:8545",
                                                         gas: Some(7_000_000),
                                                         gas_price: None },
                                         NetworkPreset { name: "rinkeby",
                                                         network_id: Some(4),
                                                         rpc_url: "https://rinkeby.infura.io/v3/{INFURA_API_KEY}",
                                                         gas: Some(8_000_000),
                                                         gas_price: None },
                                         NetworkPreset { name: "matic",
                                                         network_id: Some(137),
                                                         rpc_url: "https://polygon-mainnet.infura.io/v3/{INFURA_API_KEY}",
                                                         gas: None,
                                                         gas_price: Some(90_000_000_000) },
                                         NetworkPreset { name: "mumbai",
                                                         network_id: Some(80001),
                                                         rpc_url: "https://polygon-mumbai.infura.io/v3/{INFURA_API_KEY}",
                                                         gas: Some(8_000_000),
                                                         gas_price: None },
                                         NetworkPreset { name: "bsclive",
                                                         network_id: Some(56),
                                                         rpc_url: "https://bsc-dataseed1.binance.org/",
                                                         gas: Some(5_500_000),
                                                         gas_price: None },
                                         NetworkPreset { name: "bsctest",
                                                         network_id: Some(97),
                                                         rpc_url: "https://data-seed-prebsc-1-s1.binance.org:8545/",
                                                         gas: Some(5_500_000),
                                                         gas_price: None }];

impl NetworkPreset {
    pub fn find(name: &str) -> Result<&'static NetworkPreset, AppError> {
        PRESETS.iter()
               .find(|p| p.name.eq_ignore_ascii_case(name))
               .ok_or_else(|| AppError::UnknownNetwork(name.to_string()))
    }

    pub fn needs_infura_key(&self) -> bool {
        self.rpc_url.contains(INFURA_KEY_MARKER)
    }

    /// URL RPC con la clave de Infura sustituida cuando el preset la requiere.
    pub fn resolve_rpc_url(&self, infura_key: Option<&str>) -> Result<String, AppError> {
        if !self.needs_infura_key() {
            return Ok(self.rpc_url.to_string());
        }
        match infura_key {
            Some(k) if !k.trim().is_empty() => Ok(self.rpc_url.replace(INFURA_KEY_MARKER, k.trim())),
            _ => Err(AppError::MissingVar("INFURA_API_KEY".into())),
        }
    }

    /// Id usado para buscar despliegues en los artifacts de truffle.
    pub fn artifact_key(&self) -> Option<String> {
        self.network_id.map(|id| id.to_string())
    }
}

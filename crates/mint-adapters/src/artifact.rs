//! Artifacts de truffle (`build/contracts/<Name>.json`).
//!
//! Sólo interesan `contractName`, `abi` y `networks.<id>.address`; el resto
//! (bytecode, sourceMap, ast...) se ignora.
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use mint_domain::{Address, ContractAbi, ContractDescriptor};

use crate::error::AdapterError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: String,
    abi: Value,
    #[serde(default)]
    networks: BTreeMap<String, RawDeployment>,
}

#[derive(Debug, Deserialize)]
struct RawDeployment {
    address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TruffleArtifact {
    pub contract_name: String,
    pub abi: ContractAbi,
    /// network id -> dirección desplegada.
    pub deployments: BTreeMap<String, Address>,
}

impl TruffleArtifact {
    pub fn from_json_str(src: &str) -> Result<Self, AdapterError> {
        let raw: RawArtifact = serde_json::from_str(src)?;
        let abi = ContractAbi::from_json(&raw.abi)?;
        let mut deployments = BTreeMap::new();
        for (network, dep) in raw.networks {
            if let Some(addr) = dep.address {
                deployments.insert(network, Address::parse(&addr)?);
            }
        }
        Ok(Self { contract_name: raw.contract_name,
                  abi,
                  deployments })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AdapterError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|e| AdapterError::io(path, e))?;
        Self::from_json_str(&src)
    }

    pub fn address_for(&self, network_id: &str) -> Result<&Address, AdapterError> {
        self.deployments
            .get(network_id)
            .ok_or_else(|| AdapterError::NotDeployed { contract: self.contract_name.clone(),
                                                       network: network_id.to_string() })
    }

    /// Descriptor bajo `name`, con dirección explícita o la del despliegue
    /// registrado para `network_id`.
    pub fn descriptor(&self,
                      name: &str,
                      address: Option<Address>,
                      network_id: Option<&str>)
                      -> Result<ContractDescriptor, AdapterError> {
        let address = match (address, network_id) {
            (Some(a), _) => a,
            (None, Some(net)) => self.address_for(net)?.clone(),
            (None, None) => {
                return Err(AdapterError::NotDeployed { contract: self.contract_name.clone(),
                                                       network: "<unspecified>".into() })
            }
        };
        Ok(ContractDescriptor::new(name, address, self.abi.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT: &str = r#"{
        "contractName": "legoot",
        "abi": [
            {"type": "constructor", "inputs": []},
            {"type": "function", "name": "claim", "stateMutability": "nonpayable",
             "inputs": [{"name": "tokenId", "type": "uint256"}], "outputs": []},
            {"type": "function", "name": "tokenURI", "stateMutability": "view",
             "inputs": [{"name": "tokenId", "type": "uint256"}], "outputs": [{"name": "", "type": "string"}]},
            {"type": "event", "name": "Transfer", "inputs": []}
        ],
        "bytecode": "0x6080",
        "networks": {
            "4": {"address": "0x819766088b2e8Bd418071F89607BaB722fD0A606", "transactionHash": "0x01"}
        }
    }"#;

    #[test]
    fn reads_abi_and_deployments() {
        let art = TruffleArtifact::from_json_str(ARTIFACT).unwrap();
        assert_eq!(art.contract_name, "legoot");
        assert_eq!(art.abi.len(), 2);
        assert_eq!(art.address_for("4").unwrap().as_str(), "0x819766088b2e8bd418071f89607bab722fd0a606");
        assert!(matches!(art.address_for("97"), Err(AdapterError::NotDeployed { .. })));

        let d = art.descriptor("legoot", None, Some("4")).unwrap();
        assert!(d.abi().contains("tokenURI"));
        assert!(art.descriptor("legoot", None, None).is_err());
    }
}

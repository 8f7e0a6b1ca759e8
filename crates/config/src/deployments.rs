use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use daoctl_types::DeployedContract;

use crate::consts::DEPLOYMENTS_DIR;
use crate::traits::FileConfigTrait;

impl FileConfigTrait for DeploymentsConfig {}

/// Per-network record of confirmed deployments, keyed by contract name.
/// Written after every broadcast deploy so dependent commands can pick up
/// addresses without re-entering them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentsConfig {
    pub network: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub contracts: BTreeMap<String, DeployedContract>,
}

impl DeploymentsConfig {
    pub fn new(network: impl Into<String>, chain_id: Option<u64>) -> Self {
        Self {
            network: network.into(),
            chain_id,
            contracts: BTreeMap::new(),
        }
    }

    /// Record file for a network, under the given project root.
    pub fn path(root: impl AsRef<Path>, network: &str) -> PathBuf {
        root.as_ref()
            .join(DEPLOYMENTS_DIR)
            .join(format!("{network}.yaml"))
    }

    pub fn record(&mut self, contract: DeployedContract) {
        self.contracts.insert(contract.contract.clone(), contract);
    }

    pub fn get(&self, contract: &str) -> Option<&DeployedContract> {
        self.contracts.get(contract)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use ethers::types::{Address, H256};
    use xshell::Shell;

    use crate::traits::{ReadConfig, SaveConfig};

    use super::*;

    fn deployment(contract: &str, address: Address) -> DeployedContract {
        DeployedContract {
            contract: contract.to_string(),
            address,
            tx_hash: H256::zero(),
            block_number: Some(7),
            deployed_at: Utc::now(),
        }
    }

    #[test]
    fn records_are_keyed_by_contract_name() {
        let mut config = DeploymentsConfig::new("localhost", Some(31337));
        config.record(deployment("Token", Address::from_low_u64_be(1)));
        config.record(deployment("DAO", Address::from_low_u64_be(2)));
        // Re-deploying replaces the previous record.
        config.record(deployment("Token", Address::from_low_u64_be(3)));

        assert_eq!(config.contracts.len(), 2);
        assert_eq!(
            config.get("Token").unwrap().address,
            Address::from_low_u64_be(3)
        );
        assert!(config.get("Treasury").is_none());
    }

    #[test]
    fn record_path_is_per_network() {
        let path = DeploymentsConfig::path("/work", "sepolia");
        assert_eq!(path, PathBuf::from("/work/deployments/sepolia.yaml"));
    }

    #[test]
    fn roundtrips_through_yaml() {
        let shell = Shell::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = DeploymentsConfig::path(dir.path(), "localhost");

        let mut config = DeploymentsConfig::new("localhost", None);
        config.record(deployment("Token", Address::from_low_u64_be(42)));
        config.save(&shell, &path).unwrap();

        let read = DeploymentsConfig::read(&shell, &path).unwrap();
        assert_eq!(read.network, "localhost");
        assert_eq!(
            read.get("Token").unwrap().address,
            Address::from_low_u64_be(42)
        );
    }
}

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use ethers::types::H256;
use serde::{Deserialize, Serialize};
use xshell::Shell;

use crate::consts::{DEFAULT_NETWORK, DEFAULT_RPC_URL};
use crate::traits::{FileConfigTrait, ReadConfig};

impl FileConfigTrait for NetworksConfig {}

/// Named network endpoints plus an optional compiler pin. Credential material
/// is never stored inline; entries may reference the environment as `${VAR}`
/// and are expanded only when the network is actually used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworksConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_network: Option<String>,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Sender private keys or `${VAR}` references. Empty means the node
    /// manages the accounts (local development nodes).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<String>,
}

impl NetworksConfig {
    /// Localhost-only config used when no networks file exists, so the tool
    /// works against a local development node out of the box.
    pub fn localhost() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            DEFAULT_NETWORK.to_string(),
            NetworkConfig {
                url: DEFAULT_RPC_URL.to_string(),
                chain_id: None,
                accounts: vec![],
            },
        );
        Self {
            solc: None,
            default_network: None,
            networks,
        }
    }

    pub fn load_or_default(shell: &Shell, path: &Path) -> anyhow::Result<Self> {
        if shell.path_exists(path) {
            Self::read(shell, path)
        } else {
            Ok(Self::localhost())
        }
    }

    /// Selects a network by explicit name, falling back to `default_network`
    /// and then to `localhost`.
    pub fn select(&self, name: Option<&str>) -> anyhow::Result<(String, &NetworkConfig)> {
        let name = name
            .or(self.default_network.as_deref())
            .unwrap_or(DEFAULT_NETWORK);
        let network = self.networks.get(name).with_context(|| {
            format!(
                "Network `{name}` is not defined in the config (known networks: {})",
                self.networks
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?;
        Ok((name.to_string(), network))
    }
}

impl NetworkConfig {
    pub fn resolved_url(&self) -> anyhow::Result<String> {
        expand_env_vars(&self.url)
    }

    /// Expands env references and parses each account entry as a 32-byte
    /// private key.
    pub fn resolved_accounts(&self) -> anyhow::Result<Vec<H256>> {
        self.accounts
            .iter()
            .map(|raw| parse_private_key(&expand_env_vars(raw)?))
            .collect()
    }

    pub fn first_account(&self) -> anyhow::Result<Option<H256>> {
        Ok(self.resolved_accounts()?.into_iter().next())
    }
}

/// Replaces `${VAR}` references with values from the process environment.
pub fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .with_context(|| format!("Unclosed `${{` in config value `{input}`"))?;
        let var = &after[..end];
        let value = std::env::var(var).with_context(|| {
            format!("Environment variable `{var}` referenced from the config is not set")
        })?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

pub fn parse_private_key(raw: &str) -> anyhow::Result<H256> {
    raw.trim()
        .parse::<H256>()
        .map_err(|_| anyhow::anyhow!("Invalid private key (expected a 32-byte hex string)"))
}

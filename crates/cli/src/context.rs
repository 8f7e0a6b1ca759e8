use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use ethers::signers::Signer;
use ethers::types::{Address, H256};
use xshell::Shell;

use daoctl_common::ethereum::{self, RpcDeployer};
use daoctl_common::logger;
use daoctl_common::node::ForkNode;
use daoctl_config::{ArtifactStore, NetworksConfig};
use daoctl_types::ContractArtifact;

use crate::utils::paths;

/// Anvil/Hardhat first default account private key.
/// Mnemonic: "test test test test test test test test test test test junk"
const DEV_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// How deployment transactions are authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderAuth {
    /// Sign locally with a private key.
    PrivateKey(H256),
    /// Let the node sign for an account it has unlocked.
    Unlocked(Address),
}

/// Whether the command executes for real or against an anvil fork.
#[derive(Debug)]
pub enum ExecutionMode {
    /// Broadcast transactions to the target RPC.
    Broadcast,
    /// Fork the target RPC, run against the fork, tear down on drop.
    Simulate(ForkNode),
}

impl ExecutionMode {
    pub fn rpc_url<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            ExecutionMode::Broadcast => original,
            ExecutionMode::Simulate(node) => node.rpc_url(),
        }
    }

    pub fn is_simulation(&self) -> bool {
        matches!(self, ExecutionMode::Simulate(_))
    }
}

/// Network and signing flags shared by every deploy command.
#[derive(Debug, Clone, Parser)]
pub struct NetworkOpts {
    #[clap(long, help = "Named network from the networks config")]
    pub network: Option<String>,
    #[clap(long, help = "Path to the networks config file")]
    pub config: Option<PathBuf>,
    #[clap(long, help = "RPC URL, overriding the selected network's url")]
    pub rpc_url: Option<String>,
    #[clap(long, visible_alias = "pk", help = "Sender private key")]
    pub private_key: Option<H256>,
    #[clap(long, help = "Unlocked sender address on the node")]
    pub sender: Option<Address>,
    #[clap(long, help = "Use the local development account")]
    pub dev: bool,
    #[clap(long, help = "Simulate against an anvil fork (no on-chain changes)")]
    pub simulate: bool,
    #[clap(long, help = "Directory with compiled contract artifacts")]
    pub artifacts_dir: Option<PathBuf>,
    #[clap(
        long,
        help = "Confirmations to wait for after each deployment",
        default_value_t = 1
    )]
    pub confirmations: usize,
}

/// Everything a deploy command needs once flags and config are resolved.
pub struct DeployContext {
    pub network_name: String,
    pub expected_chain_id: Option<u64>,
    pub solc_pin: Option<String>,
    pub rpc_url: String,
    pub auth: SenderAuth,
    pub sender: Address,
    pub artifacts: ArtifactStore,
    pub confirmations: usize,
    pub mode: ExecutionMode,
}

impl DeployContext {
    pub fn from_opts(opts: &NetworkOpts, shell: &Shell) -> anyhow::Result<Self> {
        let config_path = paths::config_path(opts.config.clone());
        let networks = NetworksConfig::load_or_default(shell, &config_path)?;
        let (network_name, network) = networks.select(opts.network.as_deref())?;

        let rpc_url = match &opts.rpc_url {
            Some(url) => url.clone(),
            None => network.resolved_url()?,
        };

        // Config keys are resolved only when no identity flag is given, so a
        // missing env reference cannot break explicitly keyed runs.
        let config_key = if opts.private_key.is_none() && !opts.dev && opts.sender.is_none() {
            network.first_account()?
        } else {
            None
        };

        let (auth, sender, mode) = resolve_execution(
            opts.private_key,
            opts.sender,
            opts.dev,
            opts.simulate,
            config_key,
            &rpc_url,
        )?;

        let effective_rpc = mode.rpc_url(&rpc_url).to_string();
        logger::debug(format!(
            "Network `{network_name}`, rpc {effective_rpc}, sender {sender:#x}"
        ));

        Ok(Self {
            network_name,
            expected_chain_id: network.chain_id,
            solc_pin: networks.solc.clone(),
            rpc_url: effective_rpc,
            auth,
            sender,
            artifacts: ArtifactStore::new(paths::artifacts_root(opts.artifacts_dir.clone())),
            confirmations: opts.confirmations,
            mode,
        })
    }

    /// Connects to the effective endpoint and binds the resolved identity.
    pub async fn deployer(&self) -> anyhow::Result<RpcDeployer> {
        let provider = ethereum::create_provider(&self.rpc_url)?;

        if let Some(expected) = self.expected_chain_id {
            let actual = ethereum::fetch_chain_id(&provider).await?;
            if !self.mode.is_simulation() && actual != expected {
                anyhow::bail!(
                    "RPC chain id {actual} does not match the configured {expected} for network `{}`",
                    self.network_name
                );
            }
        }

        let deployer = match &self.auth {
            SenderAuth::PrivateKey(key) => RpcDeployer::with_key(provider, *key).await?,
            SenderAuth::Unlocked(address) => RpcDeployer::with_unlocked(provider, *address),
        };
        Ok(deployer.confirmations(self.confirmations))
    }

    /// Warns when an artifact was built with a different compiler than the
    /// config pins.
    pub fn check_compiler_pin(&self, artifact: &ContractArtifact) {
        if let (Some(pin), Some(version)) = (&self.solc_pin, &artifact.compiler_version) {
            if !version.starts_with(pin.as_str()) {
                logger::warn(format!(
                    "`{}` was compiled with solc {version}, config pins {pin}",
                    artifact.contract_name
                ));
            }
        }
    }

    pub fn is_simulation(&self) -> bool {
        self.mode.is_simulation()
    }
}

/// Resolves the signing identity and execution mode from flags plus the
/// network config fallback.
///
/// Identity precedence: `--private-key`, then `--dev`, then `--sender`, then
/// the first key configured for the network. `--simulate` reroutes the run
/// to an anvil fork where the sender is impersonated, so no key material is
/// needed there.
pub fn resolve_execution(
    private_key: Option<H256>,
    sender: Option<Address>,
    dev: bool,
    simulate: bool,
    config_key: Option<H256>,
    rpc_url: &str,
) -> anyhow::Result<(SenderAuth, Address, ExecutionMode)> {
    let (resolved_addr, resolved_key) = if let Some(key) = private_key {
        let address = ethereum::wallet_from_key(key)?.address();
        if let Some(sender) = sender {
            if sender != address {
                anyhow::bail!(
                    "Sender address does not match the private key: got {sender:#x}, want {address:#x}"
                );
            }
        }
        (address, Some(key))
    } else if dev {
        let key = H256::from_str(DEV_PRIVATE_KEY)?;
        (ethereum::wallet_from_key(key)?.address(), Some(key))
    } else if let Some(sender) = sender {
        (sender, None)
    } else if let Some(key) = config_key {
        (ethereum::wallet_from_key(key)?.address(), Some(key))
    } else {
        anyhow::bail!(
            "No signing identity: pass --private-key, --dev or --sender, or configure accounts for the network"
        );
    };

    if simulate {
        let node = ForkNode::start(rpc_url)?;
        return Ok((
            SenderAuth::Unlocked(resolved_addr),
            resolved_addr,
            ExecutionMode::Simulate(node),
        ));
    }

    let auth = match resolved_key {
        Some(key) => SenderAuth::PrivateKey(key),
        None => SenderAuth::Unlocked(resolved_addr),
    };
    Ok((auth, resolved_addr, ExecutionMode::Broadcast))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn dev_key() -> H256 {
        DEV_PRIVATE_KEY.parse().unwrap()
    }

    fn dev_address() -> Address {
        DEV_ADDRESS.parse().unwrap()
    }

    #[test]
    fn private_key_broadcasts_with_local_signing() {
        let (auth, sender, mode) =
            resolve_execution(Some(dev_key()), None, false, false, None, "http://x").unwrap();
        assert_eq!(auth, SenderAuth::PrivateKey(dev_key()));
        assert_eq!(sender, dev_address());
        assert!(!mode.is_simulation());
    }

    #[test]
    fn matching_sender_and_key_are_accepted() {
        let (_, sender, _) = resolve_execution(
            Some(dev_key()),
            Some(dev_address()),
            false,
            false,
            None,
            "http://x",
        )
        .unwrap();
        assert_eq!(sender, dev_address());
    }

    #[test]
    fn mismatched_sender_and_key_are_rejected() {
        let err = resolve_execution(
            Some(dev_key()),
            Some(Address::zero()),
            false,
            false,
            None,
            "http://x",
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn dev_flag_resolves_the_development_account() {
        let (auth, sender, _) =
            resolve_execution(None, None, true, false, None, "http://x").unwrap();
        assert_eq!(auth, SenderAuth::PrivateKey(dev_key()));
        assert_eq!(sender, dev_address());
    }

    #[test]
    fn bare_sender_uses_node_signing() {
        let address = Address::from_low_u64_be(7);
        let (auth, sender, mode) =
            resolve_execution(None, Some(address), false, false, None, "http://x").unwrap();
        assert_eq!(auth, SenderAuth::Unlocked(address));
        assert_eq!(sender, address);
        assert!(!mode.is_simulation());
    }

    #[test]
    fn configured_key_is_the_last_fallback() {
        let (auth, sender, _) =
            resolve_execution(None, None, false, false, Some(dev_key()), "http://x").unwrap();
        assert_eq!(auth, SenderAuth::PrivateKey(dev_key()));
        assert_eq!(sender, dev_address());
    }

    #[test]
    fn missing_identity_is_an_error() {
        let err = resolve_execution(None, None, false, false, None, "http://x").unwrap_err();
        assert!(err.to_string().contains("No signing identity"));
    }

    #[test]
    fn rpc_url_passes_through_outside_simulation() {
        let mode = ExecutionMode::Broadcast;
        assert_eq!(mode.rpc_url("http://localhost:8545"), "http://localhost:8545");
    }
}

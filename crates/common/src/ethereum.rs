use std::sync::Arc;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::Utc;
use ethers::abi::Token;
use ethers::contract::ContractFactory;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, H256};

use daoctl_types::{ContractArtifact, DeployedContract};

use crate::logger;

pub fn create_provider(url: &str) -> anyhow::Result<Provider<Http>> {
    Provider::<Http>::try_from(url).with_context(|| format!("Invalid RPC URL `{url}`"))
}

pub async fn fetch_chain_id(provider: &Provider<Http>) -> anyhow::Result<u64> {
    let id = provider
        .get_chainid()
        .await
        .context("Failed to query the chain id")?;
    Ok(id.as_u64())
}

/// Addresses the node itself controls (`eth_accounts`).
pub async fn node_accounts<M: Middleware>(provider: &M) -> anyhow::Result<Vec<Address>> {
    provider
        .get_accounts()
        .await
        .map_err(|e| anyhow!("Failed to list accounts on the node: {e}"))
}

/// Addresses derived from locally held private keys, in key order.
pub fn derive_addresses(keys: &[H256]) -> anyhow::Result<Vec<Address>> {
    keys.iter()
        .map(|key| Ok(wallet_from_key(*key)?.address()))
        .collect()
}

pub fn wallet_from_key(key: H256) -> anyhow::Result<LocalWallet> {
    LocalWallet::from_bytes(key.as_bytes())
        .context("Private key is not a valid secp256k1 secret")
}

/// Submits a contract deployment and blocks until it confirms. Implemented
/// over live RPC connections here and by in-memory stubs in tests.
#[async_trait]
pub trait ContractDeployer {
    async fn deploy(
        &self,
        artifact: &ContractArtifact,
        constructor_args: Vec<Token>,
    ) -> anyhow::Result<DeployedContract>;
}

enum RpcClient {
    /// Transactions signed locally and broadcast raw.
    Wallet(Arc<SignerMiddleware<Provider<Http>, LocalWallet>>),
    /// Transactions signed by the node for an unlocked account.
    Unlocked {
        provider: Arc<Provider<Http>>,
        sender: Address,
    },
}

/// Deployer bound to a live RPC endpoint.
pub struct RpcDeployer {
    client: RpcClient,
    confirmations: usize,
}

impl RpcDeployer {
    /// Binds a locally held key to the endpoint. The wallet is tied to the
    /// node's chain id so transaction signatures carry it.
    pub async fn with_key(provider: Provider<Http>, key: H256) -> anyhow::Result<Self> {
        let chain_id = fetch_chain_id(&provider).await?;
        let wallet = wallet_from_key(key)?.with_chain_id(chain_id);
        Ok(Self {
            client: RpcClient::Wallet(Arc::new(SignerMiddleware::new(provider, wallet))),
            confirmations: 1,
        })
    }

    /// Uses an account the node has unlocked; the node signs.
    pub fn with_unlocked(provider: Provider<Http>, sender: Address) -> Self {
        Self {
            client: RpcClient::Unlocked {
                provider: Arc::new(provider),
                sender,
            },
            confirmations: 1,
        }
    }

    pub fn confirmations(mut self, confirmations: usize) -> Self {
        self.confirmations = confirmations;
        self
    }
}

#[async_trait]
impl ContractDeployer for RpcDeployer {
    async fn deploy(
        &self,
        artifact: &ContractArtifact,
        constructor_args: Vec<Token>,
    ) -> anyhow::Result<DeployedContract> {
        match &self.client {
            RpcClient::Wallet(client) => {
                deploy_with(
                    client.clone(),
                    None,
                    artifact,
                    constructor_args,
                    self.confirmations,
                )
                .await
            }
            RpcClient::Unlocked { provider, sender } => {
                deploy_with(
                    provider.clone(),
                    Some(*sender),
                    artifact,
                    constructor_args,
                    self.confirmations,
                )
                .await
            }
        }
    }
}

async fn deploy_with<M: Middleware + 'static>(
    client: Arc<M>,
    from: Option<Address>,
    artifact: &ContractArtifact,
    constructor_args: Vec<Token>,
    confirmations: usize,
) -> anyhow::Result<DeployedContract> {
    let factory = ContractFactory::new(artifact.abi.clone(), artifact.bytecode.clone(), client);
    let mut deployer = factory
        .deploy_tokens(constructor_args)
        .map_err(|e| {
            anyhow!(
                "Failed to encode constructor arguments for `{}`: {e}",
                artifact.contract_name
            )
        })?
        .confirmations(confirmations);
    if let Some(from) = from {
        deployer.tx.set_from(from);
    }

    let (contract, receipt) = deployer
        .send_with_receipt()
        .await
        .map_err(|e| anyhow!("Deployment of `{}` failed: {e}", artifact.contract_name))?;

    logger::debug(format!(
        "`{}` confirmed in tx {:#x}",
        artifact.contract_name, receipt.transaction_hash
    ));

    Ok(DeployedContract {
        contract: artifact.contract_name.clone(),
        address: contract.address(),
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number.map(|number| number.as_u64()),
        deployed_at: Utc::now(),
    })
}

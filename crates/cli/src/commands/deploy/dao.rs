use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use ethers::types::{Address, U256};
use serde_json::json;
use xshell::Shell;

use daoctl_common::ethereum::ContractDeployer;
use daoctl_common::logger;
use daoctl_config::traits::ReadConfig;
use daoctl_config::{DeploymentsConfig, DAO_CONTRACT, TOKEN_CONTRACT};
use daoctl_types::{ContractArtifact, DaoParams, DeployedContract};

use crate::commands::deploy::{address_line, parse_dec_u256, record_deployments, write_summary};
use crate::context::{DeployContext, NetworkOpts};

#[derive(Debug, Clone, Parser)]
pub struct DeployDaoArgs {
    #[clap(long, help = "Curator address (default: the sender)")]
    pub curator: Option<Address>,
    #[clap(
        long,
        help = "Minimum deposit for DAO proposals",
        default_value = "1000",
        value_parser = parse_dec_u256
    )]
    pub proposal_deposit: U256,
    #[clap(
        long,
        help = "Token contract address (default: the network's deployment record)"
    )]
    pub token: Option<Address>,
    #[clap(flatten)]
    pub network: NetworkOpts,
    #[clap(long, help = "Write a JSON summary to this path")]
    pub out: Option<PathBuf>,
}

pub async fn run(args: DeployDaoArgs, shell: &Shell) -> anyhow::Result<()> {
    let ctx = DeployContext::from_opts(&args.network, shell)?;
    logger::intro(format!("Deploying the DAO contract to `{}`", ctx.network_name));

    let token_address = match args.token {
        Some(address) => address,
        None => recorded_token_address(shell, &ctx.network_name)?,
    };
    let params = DaoParams {
        curator: args.curator.unwrap_or(ctx.sender),
        proposal_deposit: args.proposal_deposit,
    };
    if args.curator.is_none() {
        logger::info(format!("Curator defaults to the sender {:#x}", ctx.sender));
    }

    let artifact = ctx.artifacts.load(shell, DAO_CONTRACT)?;
    ctx.check_compiler_pin(&artifact);
    let deployer = ctx.deployer().await?;

    let dao = deploy_dao(&deployer, &artifact, &params, token_address).await?;
    println!("{}", address_line("DAO", &dao.address));

    if let Some(out) = &args.out {
        write_summary(out, dao_summary(&params, token_address, &dao))?;
    }

    if ctx.is_simulation() {
        logger::outro("DAO deploy simulation complete (no on-chain changes)");
    } else {
        record_deployments(
            shell,
            &ctx.network_name,
            ctx.expected_chain_id,
            std::slice::from_ref(&dao),
        )?;
        logger::outro("DAO deployed");
    }
    Ok(())
}

/// Deploys the DAO contract bound to a confirmed token address.
pub async fn deploy_dao<D>(
    deployer: &D,
    artifact: &ContractArtifact,
    params: &DaoParams,
    token: Address,
) -> anyhow::Result<DeployedContract>
where
    D: ContractDeployer + ?Sized,
{
    logger::step(format!(
        "Deploying `{}` (curator {:#x}, deposit {}, token {:#x})",
        artifact.contract_name, params.curator, params.proposal_deposit, token
    ));
    deployer
        .deploy(artifact, params.constructor_args(token))
        .await
}

fn recorded_token_address(shell: &Shell, network: &str) -> anyhow::Result<Address> {
    let path = DeploymentsConfig::path(".", network);
    if !shell.path_exists(&path) {
        anyhow::bail!(
            "No token address: pass --token or deploy the token on `{network}` first"
        );
    }
    let record = DeploymentsConfig::read(shell, &path)?;
    record
        .get(TOKEN_CONTRACT)
        .map(|token| token.address)
        .with_context(|| {
            format!("No `{TOKEN_CONTRACT}` deployment recorded for `{network}`; pass --token")
        })
}

fn dao_summary(
    params: &DaoParams,
    token: Address,
    dao: &DeployedContract,
) -> serde_json::Value {
    json!({
        "contract": dao.contract,
        "address": format!("{:#x}", dao.address),
        "tx_hash": format!("{:#x}", dao.tx_hash),
        "params": {
            "curator": format!("{:#x}", params.curator),
            "proposal_deposit": params.proposal_deposit.to_string(),
            "token": format!("{token:#x}"),
        },
    })
}

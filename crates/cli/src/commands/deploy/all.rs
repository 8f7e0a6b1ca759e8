use std::path::PathBuf;

use clap::Parser;
use ethers::types::{Address, U256};
use serde_json::json;
use xshell::Shell;

use daoctl_common::ethereum::ContractDeployer;
use daoctl_common::logger;
use daoctl_config::{DAO_CONTRACT, TOKEN_CONTRACT};
use daoctl_types::{ContractArtifact, DaoParams, DeployedContract, TokenParams};

use crate::commands::deploy::{
    address_line, dao::deploy_dao, parse_dec_u256, record_deployments, token::deploy_token,
    write_summary,
};
use crate::context::{DeployContext, NetworkOpts};

#[derive(Debug, Clone, Parser)]
pub struct DeployAllArgs {
    #[clap(long, help = "Token name")]
    pub name: String,
    #[clap(long, help = "Token symbol")]
    pub symbol: String,
    #[clap(long, help = "Token decimal precision", default_value_t = 18)]
    pub decimals: u8,
    #[clap(long, help = "Curator address (default: the sender)")]
    pub curator: Option<Address>,
    #[clap(
        long,
        help = "Minimum deposit for DAO proposals",
        default_value = "1000",
        value_parser = parse_dec_u256
    )]
    pub proposal_deposit: U256,
    #[clap(flatten)]
    pub network: NetworkOpts,
    #[clap(long, help = "Write a JSON summary to this path")]
    pub out: Option<PathBuf>,
}

/// Outcome of the full two-contract sequence.
#[derive(Debug, Clone)]
pub struct PairOutput {
    pub token: DeployedContract,
    pub dao: DeployedContract,
}

pub async fn run(args: DeployAllArgs, shell: &Shell) -> anyhow::Result<()> {
    let ctx = DeployContext::from_opts(&args.network, shell)?;
    logger::intro(format!(
        "Deploying the Token/DAO pair to `{}`",
        ctx.network_name
    ));

    let token_params = TokenParams {
        name: args.name,
        symbol: args.symbol,
        decimals: args.decimals,
    };
    let dao_params = DaoParams {
        curator: args.curator.unwrap_or(ctx.sender),
        proposal_deposit: args.proposal_deposit,
    };
    if args.curator.is_none() {
        logger::info(format!("Curator defaults to the sender {:#x}", ctx.sender));
    }

    let deployer = ctx.deployer().await?;

    let output = deploy_pair(
        &deployer,
        |contract| {
            let artifact = ctx.artifacts.load(shell, contract)?;
            ctx.check_compiler_pin(&artifact);
            Ok(artifact)
        },
        &token_params,
        &dao_params,
        |line| println!("{line}"),
    )
    .await?;

    if let Some(out) = &args.out {
        write_summary(out, pair_summary(&token_params, &dao_params, &output))?;
    }

    if ctx.is_simulation() {
        logger::outro("Deploy simulation complete (no on-chain changes)");
    } else {
        record_deployments(
            shell,
            &ctx.network_name,
            ctx.expected_chain_id,
            &[output.token.clone(), output.dao.clone()],
        )?;
        logger::outro("Token and DAO deployed");
    }
    Ok(())
}

/// Runs the fixed deployment sequence: the token first, then the DAO bound to
/// the confirmed token address. Each address line is reported as soon as its
/// deployment confirms. A token failure aborts before any DAO work, artifact
/// loading included.
pub async fn deploy_pair<D, L, R>(
    deployer: &D,
    mut load_artifact: L,
    token_params: &TokenParams,
    dao_params: &DaoParams,
    mut report: R,
) -> anyhow::Result<PairOutput>
where
    D: ContractDeployer + ?Sized,
    L: FnMut(&str) -> anyhow::Result<ContractArtifact>,
    R: FnMut(&str),
{
    let token_artifact = load_artifact(TOKEN_CONTRACT)?;
    let token = deploy_token(deployer, &token_artifact, token_params).await?;
    report(&address_line("Token", &token.address));

    let dao_artifact = load_artifact(DAO_CONTRACT)?;
    let dao = deploy_dao(deployer, &dao_artifact, dao_params, token.address).await?;
    report(&address_line("DAO", &dao.address));

    Ok(PairOutput { token, dao })
}

fn pair_summary(
    token_params: &TokenParams,
    dao_params: &DaoParams,
    output: &PairOutput,
) -> serde_json::Value {
    json!({
        "token": {
            "contract": output.token.contract,
            "address": format!("{:#x}", output.token.address),
            "tx_hash": format!("{:#x}", output.token.tx_hash),
            "name": token_params.name,
            "symbol": token_params.symbol,
            "decimals": token_params.decimals,
        },
        "dao": {
            "contract": output.dao.contract,
            "address": format!("{:#x}", output.dao.address),
            "tx_hash": format!("{:#x}", output.dao.tx_hash),
            "curator": format!("{:#x}", dao_params.curator),
            "proposal_deposit": dao_params.proposal_deposit.to_string(),
        },
    })
}

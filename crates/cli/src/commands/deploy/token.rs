use std::path::PathBuf;

use clap::Parser;
use serde_json::json;
use xshell::Shell;

use daoctl_common::ethereum::ContractDeployer;
use daoctl_common::logger;
use daoctl_config::TOKEN_CONTRACT;
use daoctl_types::{ContractArtifact, DeployedContract, TokenParams};

use crate::commands::deploy::{address_line, record_deployments, write_summary};
use crate::context::{DeployContext, NetworkOpts};

#[derive(Debug, Clone, Parser)]
pub struct DeployTokenArgs {
    #[clap(long, help = "Token name")]
    pub name: String,
    #[clap(long, help = "Token symbol")]
    pub symbol: String,
    #[clap(long, help = "Token decimal precision", default_value_t = 18)]
    pub decimals: u8,
    #[clap(flatten)]
    pub network: NetworkOpts,
    #[clap(long, help = "Write a JSON summary to this path")]
    pub out: Option<PathBuf>,
}

pub async fn run(args: DeployTokenArgs, shell: &Shell) -> anyhow::Result<()> {
    let ctx = DeployContext::from_opts(&args.network, shell)?;
    logger::intro(format!("Deploying the token contract to `{}`", ctx.network_name));
    let params = TokenParams {
        name: args.name,
        symbol: args.symbol,
        decimals: args.decimals,
    };

    let artifact = ctx.artifacts.load(shell, TOKEN_CONTRACT)?;
    ctx.check_compiler_pin(&artifact);
    let deployer = ctx.deployer().await?;

    let token = deploy_token(&deployer, &artifact, &params).await?;
    println!("{}", address_line("Token", &token.address));

    if let Some(out) = &args.out {
        write_summary(out, token_summary(&params, &token))?;
    }

    if ctx.is_simulation() {
        logger::outro("Token deploy simulation complete (no on-chain changes)");
    } else {
        record_deployments(
            shell,
            &ctx.network_name,
            ctx.expected_chain_id,
            std::slice::from_ref(&token),
        )?;
        logger::outro("Token deployed");
    }
    Ok(())
}

/// Deploys the token contract and waits for confirmation.
pub async fn deploy_token<D>(
    deployer: &D,
    artifact: &ContractArtifact,
    params: &TokenParams,
) -> anyhow::Result<DeployedContract>
where
    D: ContractDeployer + ?Sized,
{
    logger::step(format!(
        "Deploying `{}` ({} / {}, {} decimals)",
        artifact.contract_name, params.name, params.symbol, params.decimals
    ));
    deployer.deploy(artifact, params.constructor_args()).await
}

fn token_summary(params: &TokenParams, token: &DeployedContract) -> serde_json::Value {
    json!({
        "contract": token.contract,
        "address": format!("{:#x}", token.address),
        "tx_hash": format!("{:#x}", token.tx_hash),
        "params": {
            "name": params.name,
            "symbol": params.symbol,
            "decimals": params.decimals,
        },
    })
}

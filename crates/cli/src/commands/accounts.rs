use std::path::PathBuf;

use clap::Parser;
use ethers::utils::to_checksum;
use xshell::Shell;

use daoctl_common::ethereum;
use daoctl_common::logger;
use daoctl_config::NetworksConfig;

use crate::utils::paths;

#[derive(Debug, Clone, Parser)]
pub struct AccountsArgs {
    #[clap(long, help = "Named network from the networks config")]
    pub network: Option<String>,
    #[clap(long, help = "Path to the networks config file")]
    pub config: Option<PathBuf>,
    #[clap(long, help = "RPC URL, overriding the selected network's url")]
    pub rpc_url: Option<String>,
}

/// Prints the signing identities for the selected network, one address per
/// line. Networks with configured keys list the addresses those keys derive;
/// otherwise the node is asked for its unlocked accounts.
pub async fn run(args: AccountsArgs, shell: &Shell) -> anyhow::Result<()> {
    let config_path = paths::config_path(args.config.clone());
    let networks = NetworksConfig::load_or_default(shell, &config_path)?;
    let (network_name, network) = networks.select(args.network.as_deref())?;

    let addresses = match network.resolved_accounts()? {
        keys if !keys.is_empty() => ethereum::derive_addresses(&keys)?,
        _ => {
            let url = match &args.rpc_url {
                Some(url) => url.clone(),
                None => network.resolved_url()?,
            };
            let provider = ethereum::create_provider(&url)?;
            ethereum::node_accounts(&provider).await?
        }
    };

    logger::debug(format!(
        "{} account(s) on network `{network_name}`",
        addresses.len()
    ));
    for address in addresses {
        println!("{}", to_checksum(&address, None));
    }
    Ok(())
}

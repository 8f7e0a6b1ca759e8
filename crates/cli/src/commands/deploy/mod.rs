use std::path::{Path, PathBuf};

use clap::Subcommand;
use ethers::types::{Address, U256};
use ethers::utils::to_checksum;
use xshell::Shell;

use daoctl_common::logger;
use daoctl_config::traits::{get_or_create_config, SaveConfig};
use daoctl_config::DeploymentsConfig;
use daoctl_types::DeployedContract;

pub(crate) mod all;
pub(crate) mod dao;
pub(crate) mod token;

#[derive(Debug, Subcommand)]
#[allow(clippy::large_enum_variant)]
pub enum DeployCommands {
    /// Deploy the Token contract
    Token(token::DeployTokenArgs),
    /// Deploy the DAO contract against an existing token
    Dao(dao::DeployDaoArgs),
    /// Deploy the Token/DAO pair in order
    All(all::DeployAllArgs),
}

pub async fn run(command: DeployCommands, shell: &Shell) -> anyhow::Result<()> {
    match command {
        DeployCommands::Token(args) => token::run(args, shell).await,
        DeployCommands::Dao(args) => dao::run(args, shell).await,
        DeployCommands::All(args) => all::run(args, shell).await,
    }
}

/// Address line printed to stdout for every confirmed contract. The checksum
/// casing and the two spaces after the colon are part of the fixed format.
pub(crate) fn address_line(label: &str, address: &Address) -> String {
    format!("{label} address (contract):  {}", to_checksum(address, None))
}

pub(crate) fn parse_dec_u256(raw: &str) -> Result<U256, String> {
    U256::from_dec_str(raw).map_err(|e| format!("Invalid decimal value: {e}"))
}

/// Saves confirmed deployments into the per-network record so dependent
/// commands can pick the addresses up later.
pub(crate) fn record_deployments(
    shell: &Shell,
    network: &str,
    chain_id: Option<u64>,
    contracts: &[DeployedContract],
) -> anyhow::Result<PathBuf> {
    let path = DeploymentsConfig::path(".", network);
    let mut record = get_or_create_config(shell, &path, || {
        DeploymentsConfig::new(network, chain_id)
    })?;
    record.chain_id = chain_id.or(record.chain_id);
    for contract in contracts {
        record.record(contract.clone());
    }
    record.save(shell, &path)?;
    logger::debug(format!("Deployment record updated: {}", path.display()));
    Ok(path)
}

pub(crate) fn write_summary(path: &Path, summary: serde_json::Value) -> anyhow::Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
    logger::info(format!("Summary written to: {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_line_keeps_label_double_space_and_checksum() {
        let address: Address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1"
            .parse()
            .unwrap();
        let line = address_line("Token", &address);

        assert!(line.starts_with("Token address (contract):  0x"));
        // Label, colon, two spaces, then the 42-character address.
        assert_eq!(line.len(), "Token address (contract):  ".len() + 42);
        assert!(line.to_lowercase().ends_with(&format!("{address:?}")));
    }

    #[test]
    fn deposits_parse_as_decimal_not_hex() {
        assert_eq!(parse_dec_u256("1000").unwrap(), U256::from(1000u64));
        assert!(parse_dec_u256("0x1000").is_err());
        assert!(parse_dec_u256("ten").is_err());
    }
}

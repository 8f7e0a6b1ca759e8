use clap::{Parser, Subcommand};
use daoctl_common::{
    config::{init_global_config, GlobalConfig},
    error::log_error,
};
use xshell::Shell;

use crate::commands::accounts::AccountsArgs;
use crate::commands::deploy::DeployCommands;

mod commands;
mod context;
mod utils;

#[derive(Parser, Debug)]
#[command(
    name = "daoctl",
    about = "Deploys the Token/DAO contract pair and inspects signer accounts"
)]
struct Daoctl {
    #[command(subcommand)]
    command: DaoctlSubcommands,
    #[clap(flatten)]
    global: DaoctlGlobalArgs,
}

#[derive(Subcommand, Debug)]
enum DaoctlSubcommands {
    /// List the signing identities available on the selected network
    Accounts(AccountsArgs),
    /// Deploy contracts
    #[command(subcommand)]
    Deploy(Box<DeployCommands>),
}

#[derive(Parser, Debug)]
#[clap(next_help_heading = "Global options")]
struct DaoctlGlobalArgs {
    /// Verbose mode
    #[clap(short, long, global = true)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    human_panic::setup_panic!();
    let cli_args = Daoctl::parse();
    match run_subcommand(cli_args).await {
        Ok(_) => {}
        Err(error) => {
            log_error(error);
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn run_subcommand(cli_args: Daoctl) -> anyhow::Result<()> {
    init_global_config(GlobalConfig {
        verbose: cli_args.global.verbose,
    });
    let shell = Shell::new()?;

    match cli_args.command {
        DaoctlSubcommands::Accounts(args) => commands::accounts::run(args, &shell).await?,
        DaoctlSubcommands::Deploy(args) => commands::deploy::run(*args, &shell).await?,
    }
    Ok(())
}

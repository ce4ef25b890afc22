use clap::Parser;
use std::process::ExitCode;

use wordpress_mcp_gateway::cli::{self, Cli};
use wordpress_mcp_gateway::infra::{boot, config::Config, logging};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init();

    match Cli::parse().command {
        Some(command) => Ok(cli::run_commands(command).await),
        None => {
            boot::run_server(Config::from_env()).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

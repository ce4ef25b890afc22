use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::infra::config::{Config, GatewayConfig};
use crate::tools::posts::ListPostsArgs;

#[derive(Parser)]
#[command(name = "wordpress-mcp-gateway")]
#[command(about = "Multi-tenant WordPress MCP gateway")]
#[command(version)]
pub struct Cli {
    /// Run the gateway when no subcommand is given.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Health check a running gateway
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Validate the tenant configuration file
    Config {
        /// Config file (defaults to GATEWAY_CONFIG or ./gateway.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// List configured tenants (credentials are never printed)
    Tenants {
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Call list_posts once against a tenant and print the result
    ListPosts {
        #[arg(short, long)]
        tenant: String,
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { path } => match validate_config(&config_path(path)) {
            Ok(count) => {
                println!("✅ Configuration is valid ({count} tenants)");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Tenants { path } => match list_tenants(&config_path(path)) {
            Ok(lines) => {
                for line in lines {
                    println!("{line}");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Could not read tenants: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::ListPosts {
            tenant,
            status,
            path,
        } => match list_posts(&config_path(path), tenant, status).await {
            Ok((text, false)) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Ok((text, true)) => {
                eprintln!("❌ {text}");
                ExitCode::FAILURE
            }
            Err(e) => {
                eprintln!("❌ list_posts failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn config_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| Config::from_env().config_path)
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/healthz", url.trim_end_matches('/')))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config(path: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let gateway = GatewayConfig::load(path)?;
    gateway.validate()?;
    Ok(gateway.tenants.len())
}

fn list_tenants(path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let registry = GatewayConfig::load(path)?.tenant_registry()?;
    let mut lines = Vec::with_capacity(registry.len());
    for key in registry.keys() {
        lines.push(format!("{key}\t{}", registry.resolve(key)?.base_url));
    }
    Ok(lines)
}

/// Returns the envelope text and its error flag.
async fn list_posts(
    path: &Path,
    tenant: String,
    status: Option<String>,
) -> Result<(String, bool), Box<dyn std::error::Error>> {
    let svc = crate::infra::boot::build_service(path)?;
    let env = svc
        .list_posts(ListPostsArgs {
            tenant_key: tenant,
            status,
        })
        .await;
    Ok((env.text(), env.is_error))
}

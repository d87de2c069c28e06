//! Command-line surface of the `kubectl-auth_vault` plugin.
//!
//! Commands write to caller-provided streams so they can be driven from
//! tests; only the binary wires them to the real stdout and stderr.

use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::settings::{Environment, LogFormat};
use crate::utils::logging::LogLevel;

pub mod cache;
pub mod config;
pub mod get;
pub mod version;

use cache::CacheCommand;
use config::ConfigCommand;
use get::GetArgs;

#[derive(Debug, Parser)]
#[command(
    name = "kubectl-auth_vault",
    version,
    about = "Kubectl plugin for Vault OIDC token authentication",
    long_about = "A kubectl credential plugin that fetches OIDC tokens from HashiCorp Vault.
It caches tokens locally and reuses them until expiration.

Usage as kubectl plugin:
  kubectl auth-vault get --token-path identity/oidc/token/my_role

Usage in kubeconfig:
  users:
  - name: vault-user
    user:
      exec:
        apiVersion: client.authentication.k8s.io/v1
        command: kubectl-auth_vault
        args: [\"get\", \"--token-path\", \"identity/oidc/token/my_role\"]"
)]
pub struct Cli {
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "compact", global = true)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Get an OIDC token from Vault and output ExecCredential
    Get(GetArgs),
    /// Test and validate Vault configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Manage the local token cache
    #[command(subcommand)]
    Cache(CacheCommand),
    /// Print version information
    Version,
}

/// Dispatch a parsed command line.
pub async fn run<O: Write, E: Write>(
    command: Commands,
    environment: &Environment,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    match command {
        Commands::Get(args) => get::run_get(&args, environment, out, err).await,
        Commands::Config(ConfigCommand::Test(args)) => {
            config::run_config_test(&args, environment, out).await
        }
        Commands::Config(ConfigCommand::Show(args)) => {
            config::run_config_show(&args, environment, out)
        }
        Commands::Cache(CacheCommand::Clear(args)) => {
            cache::run_cache_clear(&args, environment, out).await
        }
        Commands::Version => version::run_version(out),
    }
}

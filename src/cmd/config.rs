use std::io::Write;

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Args, Subcommand};

use crate::config::settings::{non_empty, resolve_vault_addr, Environment};
use crate::lifecycle::manager::resolve_expiration;
use crate::parser::claims::decode_claims;
use crate::sources::credentials::resolve_vault_token;
use crate::sources::vault::VaultSource;
use crate::sources::FetchToken;
use crate::utils::constants::DEFAULT_TOKEN_PATH;

const NOT_SET: &str = "(not set)";
const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Test Vault connectivity and token retrieval
    Test(ConfigArgs),
    /// Show current configuration
    Show(ConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Vault server address (env: VAULT_ADDR)
    #[arg(long)]
    pub vault_addr: Option<String>,
    /// Vault OIDC token path
    #[arg(long, default_value = DEFAULT_TOKEN_PATH)]
    pub token_path: String,
}

/// Fetch a token without touching the cache and describe it.
pub async fn run_config_test<O: Write>(
    args: &ConfigArgs,
    environment: &Environment,
    out: &mut O,
) -> Result<()> {
    let vault_addr = resolve_vault_addr(args.vault_addr.as_deref(), environment)?;

    writeln!(out, "Testing Vault configuration...")?;
    writeln!(out, "  Vault Address: {}", vault_addr)?;
    writeln!(out, "  Token Path:    {}\n", args.token_path)?;

    let source = VaultSource::new(&vault_addr, resolve_vault_token(environment))
        .context("failed to create Vault client")?;

    writeln!(out, "Fetching OIDC token...")?;
    let token = match source.fetch_token(&args.token_path).await {
        Ok(token) => token,
        Err(err) => {
            writeln!(out, "❌ Failed to fetch token: {}", err)?;
            return Err(err.into());
        }
    };

    let exp = resolve_expiration(&token);
    let expires = DateTime::from_timestamp(exp, 0)
        .map(|at| at.to_rfc3339())
        .unwrap_or_default();
    let preview: String = token.chars().take(PREVIEW_CHARS).collect();

    writeln!(out, "✅ Successfully retrieved token!\n")?;
    writeln!(out, "Token Details:")?;
    writeln!(out, "  Length:     {} characters", token.len())?;
    writeln!(out, "  Expiration: {} (Unix timestamp) {}", exp, expires)?;
    if let Ok(claims) = decode_claims(&token) {
        if let Some(sub) = &claims.sub {
            writeln!(out, "  Subject:    {}", sub)?;
        }
        if let Some(iss) = &claims.iss {
            writeln!(out, "  Issuer:     {}", iss)?;
        }
    }
    writeln!(out, "  Preview:    {}...", preview)?;

    Ok(())
}

/// Print effective settings and a ready-to-paste kubeconfig snippet.
pub fn run_config_show<O: Write>(
    args: &ConfigArgs,
    environment: &Environment,
    out: &mut O,
) -> Result<()> {
    let vault_addr = resolve_vault_addr(args.vault_addr.as_deref(), environment).ok();
    let env_addr = non_empty(environment.vault_addr.as_deref()).unwrap_or(NOT_SET);
    let env_token = non_empty(environment.vault_token.as_deref())
        .map(|_| "(set, hidden)")
        .unwrap_or(NOT_SET);

    writeln!(out, "Current Configuration:\n")?;
    writeln!(out, "Environment Variables:")?;
    writeln!(out, "  VAULT_ADDR:  {}", env_addr)?;
    writeln!(out, "  VAULT_TOKEN: {}", env_token)?;
    writeln!(out)?;
    writeln!(out, "Effective Settings:")?;
    writeln!(out, "  Vault Address: {}", vault_addr.as_deref().unwrap_or(NOT_SET))?;
    writeln!(out, "  Token Path:    {}", args.token_path)?;
    writeln!(out)?;
    writeln!(out, "Kubeconfig Example:")?;
    writeln!(out, "  users:")?;
    writeln!(out, "  - name: vault-user")?;
    writeln!(out, "    user:")?;
    writeln!(out, "      exec:")?;
    writeln!(out, "        apiVersion: client.authentication.k8s.io/v1")?;
    writeln!(out, "        command: kubectl-auth_vault")?;
    writeln!(out, "        interactiveMode: Never")?;
    if let Some(addr) = &vault_addr {
        writeln!(out, "        env:")?;
        writeln!(out, "        - name: VAULT_ADDR")?;
        writeln!(out, "          value: {}", addr)?;
    }
    writeln!(out, "        args:")?;
    writeln!(out, "        - get")?;
    writeln!(out, "        - --token-path")?;
    writeln!(out, "        - {}", args.token_path)?;

    Ok(())
}

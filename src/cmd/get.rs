use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::cache::token_store::{default_cache_file, TokenStore};
use crate::config::settings::{resolve_vault_addr, Environment};
use crate::credential::write_exec_credential;
use crate::error::FetchError;
use crate::lifecycle::manager::obtain;
use crate::sources::credentials::resolve_vault_token;
use crate::sources::vault::VaultSource;
use crate::sources::FetchToken;
use crate::utils::constants::DEFAULT_TOKEN_PATH;

#[derive(Debug, Clone, Args)]
#[command(after_help = "Examples:
  # Using environment variable for vault address
  export VAULT_ADDR=https://vault.example.com
  kubectl-auth_vault get --token-path identity/oidc/token/my_role

  # Disable caching
  kubectl-auth_vault get --token-path identity/oidc/token/my_role --no-cache")]
pub struct GetArgs {
    /// Vault server address (env: VAULT_ADDR)
    #[arg(long)]
    pub vault_addr: Option<String>,
    /// Vault OIDC token path
    #[arg(long, default_value = DEFAULT_TOKEN_PATH)]
    pub token_path: String,
    /// Token cache file path (default: ~/.kube/vault_<sanitized_path>_token.json)
    #[arg(long)]
    pub cache_file: Option<PathBuf>,
    /// Disable token caching
    #[arg(long)]
    pub no_cache: bool,
}

/// Cache file for `token_path`, unless one was given explicitly.
pub fn cache_location(
    cache_file: Option<&Path>,
    token_path: &str,
    environment: &Environment,
) -> PathBuf {
    cache_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_cache_file(token_path, environment))
}

/// Vault client built on the first fetch, so a cache hit needs neither a
/// well-formed address nor a Vault token.
struct DeferredVault<'a> {
    address: &'a str,
    environment: &'a Environment,
}

impl FetchToken for DeferredVault<'_> {
    async fn fetch_token(&self, token_path: &str) -> Result<String, FetchError> {
        let source = VaultSource::new(self.address, resolve_vault_token(self.environment))?;
        source.fetch_token(token_path).await
    }
}

pub async fn run_get<O: Write, E: Write>(
    args: &GetArgs,
    environment: &Environment,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    let vault_addr = resolve_vault_addr(args.vault_addr.as_deref(), environment)?;
    let store = TokenStore::new(cache_location(args.cache_file.as_deref(), &args.token_path, environment));
    let source = DeferredVault { address: &vault_addr, environment };

    let obtained = obtain(&args.token_path, &store, args.no_cache, &source)
        .await
        .context("failed to fetch token from Vault")?;

    if let Some(warning) = &obtained.cache_warning {
        writeln!(err, "warning: failed to cache token: {}", warning)?;
    }

    write_exec_credential(out, &obtained.token)
}

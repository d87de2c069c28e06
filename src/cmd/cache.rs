use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cache::token_store::TokenStore;
use crate::cmd::get::cache_location;
use crate::config::settings::Environment;
use crate::utils::constants::DEFAULT_TOKEN_PATH;

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Remove the cached token so the next `get` fetches a fresh one
    Clear(CacheArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CacheArgs {
    /// Vault OIDC token path
    #[arg(long, default_value = DEFAULT_TOKEN_PATH)]
    pub token_path: String,
    /// Token cache file path (default: ~/.kube/vault_<sanitized_path>_token.json)
    #[arg(long)]
    pub cache_file: Option<PathBuf>,
}

pub async fn run_cache_clear<O: Write>(
    args: &CacheArgs,
    environment: &Environment,
    out: &mut O,
) -> Result<()> {
    let store = TokenStore::new(cache_location(args.cache_file.as_deref(), &args.token_path, environment));
    store.clear().await.context("failed to clear token cache")?;
    writeln!(out, "Removed cached token: {}", store.path().display())?;
    Ok(())
}

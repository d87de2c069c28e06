use std::fs;

use tracing::debug;

use crate::config::settings::{non_empty, Environment};
use crate::utils::constants::VAULT_TOKEN_FILE;

/// Token used to authenticate against Vault.
///
/// Priority: `VAULT_TOKEN` > `~/.vault-token`. `None` means requests go out
/// unauthenticated and Vault will reject them.
pub fn resolve_vault_token(environment: &Environment) -> Option<String> {
    if let Some(token) = non_empty(environment.vault_token.as_deref()) {
        debug!("vault token taken from environment");
        return Some(token.to_owned());
    }

    let path = environment.home_dir.as_ref()?.join(VAULT_TOKEN_FILE);
    let token = fs::read_to_string(&path)
        .map(|content| content.trim().to_string())
        .ok()
        .filter(|token| !token.is_empty())?;

    debug!(path = %path.display(), "vault token taken from token file");
    Some(token)
}

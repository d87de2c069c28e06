use tracing::{debug, info};

use crate::cache::token_store::TokenStore;
use crate::error::{FetchError, StoreError};
use crate::helpers::time::fallback_expiration;
use crate::parser::claims::extract_expiration;
use crate::sources::FetchToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOrigin {
    Cache,
    Fetched,
}

/// Outcome of one `obtain` call.
#[derive(Debug)]
pub struct Obtained {
    pub token: String,
    pub expires_at: i64,
    pub origin: TokenOrigin,
    /// Set when a fetched token could not be cached. The token is still usable.
    pub cache_warning: Option<StoreError>,
}

/// Return a usable token for `token_path`, from `store` when possible.
///
/// A cache hit never touches `fetcher`. With `bypass_cache` the store is
/// neither read nor written. Fetch errors are returned as-is; only caching
/// is allowed to fail quietly.
pub async fn obtain<F: FetchToken>(
    token_path: &str,
    store: &TokenStore,
    bypass_cache: bool,
    fetcher: &F,
) -> Result<Obtained, FetchError> {
    if !bypass_cache {
        if let Some(cached) = store.load().await {
            info!(token_path, expires_at = cached.exp, "using cached token");
            return Ok(Obtained {
                token: cached.token,
                expires_at: cached.exp,
                origin: TokenOrigin::Cache,
                cache_warning: None,
            });
        }
        debug!(token_path, path = %store.path().display(), "no usable cached token");
    }

    let token = fetcher.fetch_token(token_path).await?;
    let expires_at = resolve_expiration(&token);

    let cache_warning = if bypass_cache {
        None
    } else {
        store
            .save(&token, expires_at)
            .await
            .inspect_err(|err| debug!(path = %store.path().display(), error = %err, "failed to cache token"))
            .err()
    };

    Ok(Obtained {
        token,
        expires_at,
        origin: TokenOrigin::Fetched,
        cache_warning,
    })
}

/// Expiration from the token's `exp` claim, or one hour from now for tokens
/// that don't carry a readable one.
pub fn resolve_expiration(token: &str) -> i64 {
    match extract_expiration(token) {
        Ok(exp) => exp,
        Err(err) => {
            let fallback = fallback_expiration();
            debug!(error = %err, expires_at = fallback, "no usable exp claim, using fallback expiration");
            fallback
        }
    }
}

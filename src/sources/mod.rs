//! Sources module
//!
//! The fetch side of the plugin: the `FetchToken` capability the lifecycle
//! manager depends on, and its Vault-backed implementation.

use crate::error::FetchError;

pub mod credentials;
pub mod vault;

pub use credentials::resolve_vault_token;
pub use vault::VaultSource;

/// Something that can issue a fresh bearer token for a token path.
pub trait FetchToken {
    fn fetch_token(
        &self,
        token_path: &str,
    ) -> impl std::future::Future<Output = Result<String, FetchError>> + Send;
}

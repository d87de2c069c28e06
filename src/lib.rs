//! # kubectl-auth-vault
//!
//! kubectl exec credential plugin: fetches an OIDC token from Vault,
//! caches it on disk until it expires, and prints it as an
//! `ExecCredential` for kubectl.
//!
//! Modules:
//! - `parser` — reading the `exp` claim out of a bearer token
//! - `cache` — on-disk token store
//! - `sources` — Vault token source and its credentials
//! - `lifecycle` — cache-or-fetch decision
//! - `credential` — `ExecCredential` output envelope
//! - `cmd` — command-line surface

pub mod cache;
pub mod cmd;
pub mod config;
pub mod credential;
pub mod error;
pub mod helpers;
pub mod lifecycle;
pub mod parser;
pub mod resilience;
pub mod sources;
pub mod utils;
#[cfg(test)]
mod tests;

pub use crate::error::{ClaimError, ConfigError, FetchError, StoreError};
pub use crate::lifecycle::manager::{obtain, Obtained, TokenOrigin};

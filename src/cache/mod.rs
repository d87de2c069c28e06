//! On-disk token cache.

pub mod token;
pub mod token_store;

pub use token::CachedToken;
pub use token_store::{default_cache_file, TokenStore};

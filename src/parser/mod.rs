//! Bearer token claim decoding.

pub mod claims;

pub use claims::{decode_claims, extract_expiration, TokenClaims};

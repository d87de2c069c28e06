use chrono::Utc;

use crate::utils::constants::FALLBACK_TOKEN_TTL_SECS;

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

/// Expiration assigned to tokens that carry no usable `exp` claim.
pub fn fallback_expiration() -> i64 {
    now_i64() + FALLBACK_TOKEN_TTL_SECS
}

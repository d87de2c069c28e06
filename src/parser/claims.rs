use base64::alphabet;
use base64::engine::general_purpose::GeneralPurposeConfig;
use base64::engine::{DecodePaddingMode, GeneralPurpose};
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use crate::error::ClaimError;

/// URL-safe alphabet, padding optional.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Standard alphabet, padding optional.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims read from the payload segment of a JWT.
///
/// Only `exp` matters for caching; the rest is surfaced for diagnostics.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub exp: Option<i64>,
    pub iat: Option<i64>,
    pub iss: Option<String>,
    pub sub: Option<String>,
}

/// Decode the payload of a three-part token without checking its signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims, ClaimError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
        return Err(ClaimError::Format { segments: parts.len() });
    }

    let payload = parts[1];
    let decoded = match URL_SAFE_LENIENT.decode(payload) {
        Ok(bytes) => bytes,
        Err(_) => STANDARD_LENIENT.decode(payload)?,
    };

    Ok(serde_json::from_slice::<TokenClaims>(&decoded)?)
}

/// Expiration of `token` as a unix timestamp. A zero `exp` counts as absent.
pub fn extract_expiration(token: &str) -> Result<i64, ClaimError> {
    let claims = decode_claims(token)?;
    match claims.exp {
        Some(exp) if exp != 0 => {
            debug!(expires_at = exp, "jwt parsed successfully");
            Ok(exp)
        }
        _ => Err(ClaimError::MissingExp),
    }
}

//! Error types.
//!
//! Claim and store errors never reach the user on the `get` path: the
//! lifecycle manager absorbs the former and downgrades the latter to a
//! warning. Fetch and config errors are fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read the `exp` claim out of a bearer token.
#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("invalid JWT format: expected 3 non-empty parts, got {segments}")]
    Format { segments: usize },

    #[error("failed to decode JWT payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("failed to parse JWT payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no exp claim in JWT")]
    MissingExp,
}

/// Failure to persist or remove a cached token.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cache file {} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("cache I/O on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize cache record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure to obtain a token from the remote issuer.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid vault address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to create vault client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to read from vault path {path}: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read from vault path {path}: HTTP {status}{}", format_details(.details))]
    Status {
        path: String,
        status: u16,
        details: Vec<String>,
    },

    #[error("no data returned from vault path: {path}")]
    NoData { path: String },

    #[error("no 'token' field in vault response")]
    MissingTokenField,

    #[error("token is not a string")]
    TokenNotString,
}

impl FetchError {
    /// Transient failures worth another attempt: server-side errors,
    /// timeouts and connection failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            Self::Http { source, .. } => source.is_timeout() || source.is_connect(),
            _ => false,
        }
    }
}

fn format_details(details: &[String]) -> String {
    if details.is_empty() {
        String::new()
    } else {
        format!(" ({})", details.join("; "))
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("VAULT_ADDR is required (use --vault-addr or VAULT_ADDR env var)")]
    MissingVaultAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_lists_vault_details() {
        let err = FetchError::Status {
            path: "identity/oidc/token/r".into(),
            status: 403,
            details: vec!["permission denied".into()],
        };
        assert_eq!(
            err.to_string(),
            "failed to read from vault path identity/oidc/token/r: HTTP 403 (permission denied)"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn server_errors_are_retryable() {
        let err = FetchError::Status { path: "p".into(), status: 503, details: vec![] };
        assert!(err.is_retryable());
        assert!(!FetchError::MissingTokenField.is_retryable());
    }
}

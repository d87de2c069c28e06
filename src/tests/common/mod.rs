// tests/common/mod.rs
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::config::settings::Environment;
use crate::error::FetchError;
use crate::sources::FetchToken;

/// Unsigned three-part token carrying `exp`.
pub fn sample_jwt(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{},"sub":"test"}}"#, exp));
    let signature = URL_SAFE_NO_PAD.encode("fake-signature");
    format!("{}.{}.{}", header, payload, signature)
}

/// Environment rooted at a temp home, with no Vault token.
pub fn test_environment(home: &Path, vault_addr: Option<&str>) -> Environment {
    Environment {
        vault_addr: vault_addr.map(str::to_owned),
        vault_token: None,
        home_dir: Some(home.to_path_buf()),
    }
}

/// Fetcher returning a canned token and counting calls.
pub struct CountingFetcher {
    token: String,
    calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into(), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FetchToken for CountingFetcher {
    async fn fetch_token(&self, _token_path: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.token.clone())
    }
}

/// Fetcher that always fails like an unreachable Vault.
pub struct FailingFetcher;

impl FetchToken for FailingFetcher {
    async fn fetch_token(&self, token_path: &str) -> Result<String, FetchError> {
        Err(FetchError::Status {
            path: token_path.to_owned(),
            status: 503,
            details: vec!["Vault is sealed".to_owned()],
        })
    }
}

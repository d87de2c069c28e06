use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::resilience::retry::RetrySettings;
use crate::sources::FetchToken;
use crate::utils::constants::{DEFAULT_HTTP_TIMEOUT_SECS, VAULT_TOKEN_HEADER};

/// Reads OIDC tokens from a Vault `identity/oidc/token/<role>` style path.
#[derive(Debug, Clone)]
pub struct VaultSource {
    address: Url,
    vault_token: Option<String>,
    client: Client,
    retry: RetrySettings,
}

impl VaultSource {
    pub fn new(address: &str, vault_token: Option<String>) -> Result<Self, FetchError> {
        let invalid = |reason: String| FetchError::InvalidAddress {
            address: address.to_owned(),
            reason,
        };
        let address = Url::parse(address).map_err(|e| invalid(e.to_string()))?;
        if address.cannot_be_a_base() || !matches!(address.scheme(), "http" | "https") {
            return Err(invalid("expected an http(s) URL".to_owned()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            address,
            vault_token,
            client,
            retry: RetrySettings::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    fn endpoint(&self, token_path: &str) -> String {
        format!(
            "{}/v1/{}",
            self.address.as_str().trim_end_matches('/'),
            token_path.trim_start_matches('/')
        )
    }

    async fn read_token(&self, token_path: &str) -> Result<String, FetchError> {
        let url = self.endpoint(token_path);
        debug!(url = %url, "vault read");

        let mut request = self.client.get(&url);
        if let Some(vault_token) = &self.vault_token {
            request = request.header(VAULT_TOKEN_HEADER, vault_token);
        }

        let http_err = |source| FetchError::Http { path: token_path.to_owned(), source };
        let response = request.send().await.map_err(http_err)?;
        let status = response.status();
        let body = response.text().await.map_err(http_err)?;
        let json: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(FetchError::Status {
                path: token_path.to_owned(),
                status: status.as_u16(),
                details: vault_errors(&json),
            });
        }

        token_from_response(&json, token_path)
    }
}

impl FetchToken for VaultSource {
    async fn fetch_token(&self, token_path: &str) -> Result<String, FetchError> {
        info!(token_path, "fetching token from vault");
        self.retry
            .run_with_retry(FetchError::is_retryable, || self.read_token(token_path))
            .await
    }
}

/// `{"data": {"token": "<jwt>"}}`
fn token_from_response(json: &Value, token_path: &str) -> Result<String, FetchError> {
    let data = match json.get("data") {
        Some(data) if !data.is_null() => data,
        _ => return Err(FetchError::NoData { path: token_path.to_owned() }),
    };

    data.get("token")
        .ok_or(FetchError::MissingTokenField)?
        .as_str()
        .map(str::to_owned)
        .ok_or(FetchError::TokenNotString)
}

/// Vault reports failures as `{"errors": ["..."]}`.
fn vault_errors(json: &Value) -> Vec<String> {
    json.get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

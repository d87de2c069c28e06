//! Shared constants and invariants

pub const DEFAULT_TOKEN_PATH: &str = "identity/oidc/token/enablers_kubernetes_admin";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Lifetime given to tokens whose expiration cannot be decoded.
pub const FALLBACK_TOKEN_TTL_SECS: i64 = 3600;

// Environment
pub const ENV_VAULT_ADDR: &str = "VAULT_ADDR";
pub const ENV_VAULT_TOKEN: &str = "VAULT_TOKEN";
pub const VAULT_TOKEN_FILE: &str = ".vault-token";
pub const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

// Cache file layout: <home>/.kube/vault_<sanitized>_token.json
pub const CACHE_DIR: &str = ".kube";
pub const CACHE_FILE_PREFIX: &str = "vault_";
pub const CACHE_FILE_SUFFIX: &str = "_token.json";

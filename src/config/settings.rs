use std::env;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::error::ConfigError;
use crate::utils::constants::{ENV_VAULT_ADDR, ENV_VAULT_TOKEN};

/// ================================
/// Process environment snapshot
/// ================================
///
/// Everything the plugin consults outside of its arguments. Captured once
/// in `main`; library code only ever sees this value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub vault_addr: Option<String>,
    pub vault_token: Option<String>,
    pub home_dir: Option<PathBuf>,
}

impl Environment {
    pub fn from_process() -> Self {
        Self {
            vault_addr: env::var(ENV_VAULT_ADDR).ok(),
            vault_token: env::var(ENV_VAULT_TOKEN).ok(),
            home_dir: dirs::home_dir(),
        }
    }

    /// Home directory, or the system temp dir when there is none.
    pub fn home_or_temp(&self) -> PathBuf {
        self.home_dir.clone().unwrap_or_else(env::temp_dir)
    }
}

/// Vault address: CLI flag first, then `VAULT_ADDR`. Empty values count as unset.
pub fn resolve_vault_addr(
    override_addr: Option<&str>,
    environment: &Environment,
) -> Result<String, ConfigError> {
    non_empty(override_addr)
        .or_else(|| non_empty(environment.vault_addr.as_deref()))
        .map(str::to_owned)
        .ok_or(ConfigError::MissingVaultAddr)
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Compact,
}

pub mod settings;

pub use settings::{resolve_vault_addr, Environment, LogFormat, LoggingConfig};

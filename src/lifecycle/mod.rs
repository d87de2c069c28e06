pub mod manager;

pub use manager::{obtain, resolve_expiration, Obtained, TokenOrigin};

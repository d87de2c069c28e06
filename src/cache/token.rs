use serde::{Deserialize, Serialize};

/// On-disk cache record: `{"token":"...","exp":<unix ts>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    pub token: String,
    pub exp: i64, // UNIX TIMESTAMP
}

impl CachedToken {
    pub fn new(token: String, exp: i64) -> Self {
        Self { token, exp }
    }

    /// No leeway: a token expiring this very second is already stale.
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.exp > now
    }
}

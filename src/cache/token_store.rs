use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::cache::token::CachedToken;
use crate::config::settings::Environment;
use crate::error::StoreError;
use crate::helpers::time::now_i64;
use crate::utils::constants::{CACHE_DIR, CACHE_FILE_PREFIX, CACHE_FILE_SUFFIX};

const DIR_MODE: u32 = 0o700;
const FILE_MODE: u32 = 0o600;

/// Single-record token cache backed by one JSON file.
///
/// Concurrent writers race and the last rename wins. Readers never see a
/// torn file because `save` writes to a sibling temp file first.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached token if one exists and has not expired.
    ///
    /// Missing, unreadable and malformed files are all cache misses.
    pub async fn load(&self) -> Option<CachedToken> {
        let data = fs::read(&self.path)
            .await
            .inspect_err(|err| debug!(path = %self.path.display(), error = %err, "cache miss: unreadable"))
            .ok()?;

        let cached: CachedToken = serde_json::from_slice(&data)
            .inspect_err(|err| debug!(path = %self.path.display(), error = %err, "cache miss: malformed record"))
            .ok()?;

        let now = now_i64();
        if !cached.is_valid_at(now) {
            debug!(path = %self.path.display(), expired_at = cached.exp, now, "cache miss: expired");
            return None;
        }

        debug!(path = %self.path.display(), expires_at = cached.exp, "cache hit");
        Some(cached)
    }

    /// Replace the cached record with `token`.
    pub async fn save(&self, token: &str, exp: i64) -> Result<(), StoreError> {
        let dir = self.parent_dir();
        create_private_dir(&dir).await?;

        let data = serde_json::to_vec(&CachedToken::new(token.to_owned(), exp))?;

        let tmp = self.tmp_path(&dir);
        if let Err(err) = write_private_file(&tmp, &data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(err);
        }

        if let Err(source) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::Io { path: self.path.clone(), source });
        }

        info!(path = %self.path.display(), expires_at = exp, "token cached");
        Ok(())
    }

    /// Delete the cached record.
    pub async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "cache cleared");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound { path: self.path.clone() })
            }
            Err(source) => Err(StoreError::Io { path: self.path.clone(), source }),
        }
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn tmp_path(&self, dir: &Path) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "token".to_owned());
        dir.join(format!(".{}.tmp.{}", file_name, std::process::id()))
    }
}

/// `<home>/.kube/vault_<token path with '/' replaced by '_'>_token.json`
///
/// Paths differing only by '/' vs '_' in the same position share a file.
pub fn default_cache_file(token_path: &str, environment: &Environment) -> PathBuf {
    environment
        .home_or_temp()
        .join(CACHE_DIR)
        .join(cache_file_name(token_path))
}

fn cache_file_name(token_path: &str) -> String {
    format!(
        "{}{}{}",
        CACHE_FILE_PREFIX,
        token_path.replace('/', "_"),
        CACHE_FILE_SUFFIX
    )
}

async fn create_private_dir(dir: &Path) -> Result<(), StoreError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);

    builder.create(dir).await.map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

async fn write_private_file(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);

    let mut file = options.open(path).await.map_err(io_err)?;
    file.write_all(data).await.map_err(io_err)?;
    file.sync_all().await.map_err(io_err)?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_then_load_returns_token() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));

        store.save("abc123", now_i64() + 3600).await.unwrap();

        let cached = store.load().await.expect("cache hit");
        assert_eq!(cached.token, "abc123");
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));

        store.save("old", now_i64() - 1).await.unwrap();
        assert!(store.load().await.is_none());

        store.save("now", now_i64()).await.unwrap();
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_a_miss() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("absent.json"));
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_file_is_a_miss() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token.json");
        let store = TokenStore::new(&path);

        std::fs::write(&path, "invalid json").unwrap();
        assert!(store.load().await.is_none());

        // truncated record from an interrupted writer
        std::fs::write(&path, r#"{"token":"abc","ex"#).unwrap();
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_record() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        let exp = now_i64() + 3600;

        store.save("first", exp).await.unwrap();
        store.save("second", exp + 10).await.unwrap();

        let cached = store.load().await.unwrap();
        assert_eq!(cached, CachedToken::new("second".into(), exp + 10));
    }

    #[tokio::test]
    async fn test_record_format_is_compact_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token.json");
        TokenStore::new(&path).save("abc", 42).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, r#"{"token":"abc","exp":42}"#);
    }

    #[tokio::test]
    async fn test_save_creates_nested_dirs_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = TokenStore::new(nested.join("token.json"));

        store.save("tok", now_i64() + 60).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(&nested)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["token.json".to_string()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let cache_dir = dir.path().join(".kube");
        let path = cache_dir.join("token.json");

        TokenStore::new(&path).save("tok", now_i64() + 60).await.unwrap();

        let file_mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600, "permissions mismatch (expected 0600)");
        let dir_mode = std::fs::metadata(&cache_dir).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700, "permissions mismatch (expected 0700)");
    }

    #[tokio::test]
    async fn test_clear_removes_record() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));

        store.save("tok", now_i64() + 60).await.unwrap();
        store.clear().await.unwrap();

        assert!(store.load().await.is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_clear_missing_record_is_not_found() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));

        let err = store.clear().await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_save_fails_when_parent_is_a_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = TokenStore::new(blocker.join("token.json"));

        let err = store.save("tok", now_i64() + 60).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }), "got {:?}", err);
    }

    #[test]
    fn test_default_cache_file_sanitizes_separators() {
        let env = Environment {
            home_dir: Some(PathBuf::from("/home/user")),
            ..Default::default()
        };

        let first = default_cache_file("identity/oidc/token/my_role", &env);
        let second = default_cache_file("auth/oidc/role", &env);

        assert_eq!(
            first,
            PathBuf::from("/home/user/.kube/vault_identity_oidc_token_my_role_token.json")
        );
        assert_eq!(second, PathBuf::from("/home/user/.kube/vault_auth_oidc_role_token.json"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_default_cache_file_without_home_uses_temp_dir() {
        let path = default_cache_file("a/b", &Environment::default());
        assert_eq!(path, std::env::temp_dir().join(".kube").join("vault_a_b_token.json"));
    }
}

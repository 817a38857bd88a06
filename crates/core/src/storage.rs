//! Persisted key-value storage for session credentials
//!
//! The store plays the role browser local storage plays for the web
//! dashboard: a flat map of string keys to string values that survives
//! restarts (for [`FileTokenStore`]) and is shared by every request.

use crate::{CoreError, CoreResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use tracing::debug;

/// Key holding the access token
pub const ACCESS_TOKEN_KEY: &str = "token";

/// Key holding the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Key holding the signed-in user's profile as JSON
pub const USER_KEY: &str = "user";

/// Keys removed when a session ends
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

/// Process-wide persisted key-value store
///
/// Every `set` replaces the previous value as a whole; readers never see a
/// partially written value.
pub trait TokenStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> CoreResult<()>;

    /// Remove several values at once
    fn remove_all(&self, keys: &[&str]) -> CoreResult<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// In-memory store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a token pair
    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(ACCESS_TOKEN_KEY.to_string(), access_token.to_string());
        entries.insert(REFRESH_TOKEN_KEY.to_string(), refresh_token.to_string());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// JSON file backed store
///
/// The file is read once on open and rewritten on every change through a
/// temporary sibling file and a rename.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileTokenStore {
    /// Open the store at `path`, creating an empty one if the file is missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn open<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => HashMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(CoreError::storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        debug!(path = %path.display(), entries = entries.len(), "Opened token store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, entries: &HashMap<String, String>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content)?;

        // Tokens are credentials: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))?;
        }

        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Apply `change` to a copy of the entries and keep it only once it is on disk
    fn update<F>(&self, change: F) -> CoreResult<()>
    where
        F: FnOnce(&mut HashMap<String, String>) -> bool,
    {
        let mut entries = self.lock();
        let mut next = entries.clone();
        if !change(&mut next) {
            return Ok(());
        }

        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.update(|entries| entries.remove(key).is_some())
    }

    fn remove_all(&self, keys: &[&str]) -> CoreResult<()> {
        self.update(|entries| {
            let before = entries.len();
            for key in keys {
                entries.remove(*key);
            }
            entries.len() != before
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::storage::TokenStoreTestSuite;

    #[test]
    fn test_memory_store_suite() {
        TokenStoreTestSuite::new(MemoryTokenStore::new()).run_all_tests();
    }

    #[test]
    fn test_file_store_suite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::open(dir.path().join("session.json")).unwrap();
        TokenStoreTestSuite::new(store).run_all_tests();
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileTokenStore::open(&path).unwrap();
        store.set(ACCESS_TOKEN_KEY, "A1").unwrap();
        store.set(REFRESH_TOKEN_KEY, "R1").unwrap();
        drop(store);

        let reopened = FileTokenStore::open(&path).unwrap();
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("A1"));
        assert_eq!(reopened.get(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            FileTokenStore::open(&path),
            Err(CoreError::Serialization { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::open(&path).unwrap();
        store.set(ACCESS_TOKEN_KEY, "A1").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::open(&path).unwrap();
        store.set(REFRESH_TOKEN_KEY, "R1").unwrap();

        // A non-empty directory in place of the file makes the rename fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "x").unwrap();

        assert!(store.set(ACCESS_TOKEN_KEY, "A9").is_err());
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
        assert!(store.remove(REFRESH_TOKEN_KEY).is_err());
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_memory_store_with_tokens() {
        let store = MemoryTokenStore::with_tokens("A1", "R1");
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("A1"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
        assert_eq!(store.get(USER_KEY), None);
    }
}

//! Persistent session storage
//!
//! Holds the opaque bearer token and user record issued at login. The gateway
//! reads the token on every request and deletes both entries when the backend
//! rejects the credential. Entries live in a small JSON file next to the
//! panel configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key for the serialized user record
pub const USER_KEY: &str = "user";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// File-backed key/value session store
pub struct SessionStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    /// Open the store, reading the session file if it exists
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Read an entry
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Write an entry and persist the store
    pub async fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await
    }

    /// Remove an entry and persist the store
    ///
    /// Removing an absent key is a no-op.
    pub async fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries).await
    }

    /// The current bearer token, if a session exists
    pub async fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).await
    }

    /// Delete the credential and the user record
    ///
    /// Idempotent: invalidating an already-empty session leaves the store in
    /// the same state and raises nothing.
    pub async fn invalidate(&self) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().await;
        let token = entries.remove(TOKEN_KEY);
        let user = entries.remove(USER_KEY);
        if token.is_none() && user.is_none() {
            return Ok(());
        }
        debug!("Session invalidated");
        self.persist(&entries).await
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        let content = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let (_dir, store) = temp_store().await;

        store.set(TOKEN_KEY, "abc").await.unwrap();
        assert_eq!(store.get(TOKEN_KEY).await.as_deref(), Some("abc"));

        store.remove(TOKEN_KEY).await.unwrap();
        assert_eq!(store.get(TOKEN_KEY).await, None);

        // Removing again is a no-op
        store.remove(TOKEN_KEY).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalidate_is_idempotent() {
        let (_dir, store) = temp_store().await;

        store.set(TOKEN_KEY, "abc").await.unwrap();
        store.set(USER_KEY, r#"{"id":1}"#).await.unwrap();

        store.invalidate().await.unwrap();
        assert_eq!(store.token().await, None);
        assert_eq!(store.get(USER_KEY).await, None);

        // Second invalidation leaves the same empty state
        store.invalidate().await.unwrap();
        assert_eq!(store.token().await, None);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path).await.unwrap();
        store.set(TOKEN_KEY, "abc").await.unwrap();
        drop(store);

        let reopened = SessionStore::open(&path).await.unwrap();
        assert_eq!(reopened.token().await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let (_dir, store) = temp_store().await;
        assert_eq!(store.token().await, None);
    }
}

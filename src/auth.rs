// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Authentication gate backed by a small key-value store
//!
//! The flag is read once when the session is created and written through on
//! every change. Storage failures never surface: a failed read means "not
//! authenticated" and a failed write is dropped.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::{EditorError, Result};

/// Key under which the authentication flag is stored
pub const AUTH_KEY: &str = "mls-editor-authenticated";

/// String-valued persistent storage
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store kept as one JSON object on disk
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(EditorError::Storage(format!(
                "{:?} does not hold a JSON object",
                self.path
            ))),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.read_map()?;
        Ok(map.get(key).and_then(|v| v.as_str()).map(str::to_string))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        let content = serde_json::to_string_pretty(&Value::Object(map))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-process store; clones share the same entries
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| EditorError::Storage("Memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The authentication flag and the store it persists to
pub struct AuthSession {
    store: Box<dyn KeyValueStore>,
    authenticated: bool,
}

impl AuthSession {
    /// Read the persisted flag once; anything but `"true"` is unauthenticated
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let authenticated = match store.get(AUTH_KEY) {
            Ok(Some(value)) => value == "true",
            Ok(None) => false,
            Err(e) => {
                warn!("Could not read authentication flag, treating as signed out: {}", e);
                false
            }
        };
        debug!("Authentication flag loaded: {}", authenticated);

        Self {
            store,
            authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Sign in
    pub fn grant(&mut self) {
        self.authenticated = true;
        self.persist();
        info!("Signed in");
    }

    /// Sign out
    pub fn revoke(&mut self) {
        self.authenticated = false;
        self.persist();
        info!("Signed out");
    }

    fn persist(&mut self) {
        let value = if self.authenticated { "true" } else { "false" };
        if let Err(e) = self.store.set(AUTH_KEY, value) {
            warn!("Could not persist authentication flag: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(EditorError::Storage("unavailable".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(EditorError::Storage("unavailable".to_string()))
        }
    }

    #[test]
    fn test_absent_flag_is_signed_out() {
        let session = AuthSession::load(Box::new(MemoryStore::new()));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_grant_survives_reload_and_revoke_clears() {
        let store = MemoryStore::new();

        let mut session = AuthSession::load(Box::new(store.clone()));
        session.grant();
        assert!(session.is_authenticated());
        assert_eq!(store.get(AUTH_KEY).unwrap().as_deref(), Some("true"));

        let mut reloaded = AuthSession::load(Box::new(store.clone()));
        assert!(reloaded.is_authenticated());

        reloaded.revoke();
        assert!(!reloaded.is_authenticated());
        assert_eq!(store.get(AUTH_KEY).unwrap().as_deref(), Some("false"));
        assert!(!AuthSession::load(Box::new(store)).is_authenticated());
    }

    #[test]
    fn test_other_values_are_signed_out() {
        let mut store = MemoryStore::new();
        store.set(AUTH_KEY, "TRUE").unwrap();
        assert!(!AuthSession::load(Box::new(store)).is_authenticated());
    }

    #[test]
    fn test_storage_failures_degrade_silently() {
        let mut session = AuthSession::load(Box::new(BrokenStore));
        assert!(!session.is_authenticated());

        session.grant();
        assert!(session.is_authenticated());
        session.revoke();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut session = AuthSession::load(Box::new(FileStore::new(&path)));
        assert!(!session.is_authenticated());
        session.grant();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""mls-editor-authenticated": "true""#));
        assert!(AuthSession::load(Box::new(FileStore::new(&path))).is_authenticated());
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{ "theme": "dark" }"#).unwrap();

        let mut store = FileStore::new(&path);
        store.set(AUTH_KEY, "true").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get(AUTH_KEY).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_corrupt_file_reads_as_signed_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(FileStore::new(&path).get(AUTH_KEY).is_err());
        assert!(!AuthSession::load(Box::new(FileStore::new(&path))).is_authenticated());
    }
}

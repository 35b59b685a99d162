//! File-backed session storage for the command-line client
//!
//! The session survives between invocations the same way browser storage
//! survives page reloads: one JSON object keyed by the storage names.

use super::{MemorySessionStore, SessionKey, SessionStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use taxing_core::{portal_home_dir, session_error, PortalResult};
use tracing::{debug, info, warn};

/// Session store persisted as JSON on disk
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    inner: MemorySessionStore,
}

impl FileSessionStore {
    /// Open the store, starting empty when the file does not exist yet
    pub fn open<P: AsRef<Path>>(path: P) -> PortalResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut inner = MemorySessionStore::new();

        if path.exists() {
            let json_data = std::fs::read_to_string(&path)?;
            let stored: BTreeMap<String, String> = serde_json::from_str(&json_data)
                .map_err(|e| session_error!("Session file is corrupt", "file_session_store", e))?;

            for (name, value) in stored {
                match SessionKey::from_storage_name(&name) {
                    Some(key) => inner.set(key, &value),
                    None => warn!("Ignoring unknown session key '{}' in {}", name, path.display()),
                }
            }
            debug!("Loaded session from {}", path.display());
        }

        Ok(Self { path, inner })
    }

    /// Default location, `~/.taxing/session.json`
    pub fn default_path() -> PortalResult<PathBuf> {
        Ok(portal_home_dir()?.join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current contents to disk; an empty session removes the file
    pub fn persist(&self) -> PortalResult<()> {
        if self.inner.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
                info!("Removed session file {}", self.path.display());
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored: BTreeMap<&str, &str> = self
            .inner
            .entries()
            .iter()
            .map(|(key, value)| (key.storage_name(), value.as_str()))
            .collect();
        let json_data = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, json_data)?;

        debug!("Saved session to {}", self.path.display());
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&mut self, key: SessionKey, value: &str) {
        self.inner.set(key, value);
    }

    fn clear(&mut self, keys: &[SessionKey]) {
        self.inner.clear(keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionGrant;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::open(dir.path().join("session.json")).unwrap();
        assert!(!store.snapshot().is_logged_in());
    }

    #[test]
    fn persisted_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile").join("session.json");

        let mut store = FileSessionStore::open(&path).unwrap();
        store.establish(&SessionGrant::new("abc", "paras@gmail.com", Some("user")));
        store.persist().unwrap();

        let reopened = FileSessionStore::open(&path).unwrap();
        let session = reopened.snapshot();
        assert_eq!(session.token(), Some("abc"));
        assert_eq!(session.email(), Some("paras@gmail.com"));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["userEmail"], "paras@gmail.com");
    }

    #[test]
    fn ending_and_persisting_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = FileSessionStore::open(&path).unwrap();
        store.establish(&SessionGrant::new("abc", "a@b.c", None));
        store.persist().unwrap();
        assert!(path.exists());

        store.end();
        store.persist().unwrap();
        assert!(!path.exists());

        store.end();
        store.persist().unwrap();
        assert!(!FileSessionStore::open(&path).unwrap().snapshot().is_logged_in());
    }

    #[test]
    fn corrupt_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(FileSessionStore::open(&path).is_err());
    }
}

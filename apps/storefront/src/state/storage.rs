//! # Cart Storage Slot
//!
//! A named key holding one serialized payload. The cart store is the only
//! writer; it reads once on startup and writes after every mutation.
//!
//! ```text
//!   CartStore ──write("cart", json)──► FileStorage ──► <data_dir>/cart.json
//!             ◄──read("cart")───────
//! ```
//!
//! Two processes pointed at the same data directory share the slot with no
//! coordination: whichever writes last wins.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

/// Storage slot failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read storage key '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write storage key '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Key-value slot for the persisted cart.
pub trait CartStorage: Send + Sync + std::fmt::Debug {
    /// Returns the stored payload, or `None` if the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the payload stored under `key`.
    fn write(&self, key: &str, payload: &str) -> Result<(), StorageError>;
}

// =============================================================================
// File Storage
// =============================================================================

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// Writes to a sibling temp file and renames it over the slot, so a
    /// crash mid-write leaves the previous payload intact.
    fn write(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        let to_err = |source| StorageError::Write {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(to_err)?;
        fs::write(&tmp, payload).map_err(to_err)?;
        fs::rename(&tmp, &path).map_err(to_err)?;

        debug!(path = %path.display(), bytes = payload.len(), "Storage slot written");
        Ok(())
    }
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-process slot for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a key, e.g. with a payload written by an older build.
    pub fn with_payload(key: &str, payload: &str) -> Self {
        let storage = Self::new();
        storage
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), payload.to_string());
        storage
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.read("cart").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.write("cart", "[]").unwrap();
        storage.write("cart", "[1]").unwrap();

        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("[1]"));
        assert!(dir.path().join("nested").join("cart.json").exists());
        assert!(!dir.path().join("nested").join("cart.json.tmp").exists());
    }

    #[test]
    fn test_keys_are_independent() {
        let storage = MemoryStorage::with_payload("cart", "a");
        storage.write("accounts-cart", "b").unwrap();

        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("a"));
        assert_eq!(storage.read("accounts-cart").unwrap().as_deref(), Some("b"));
        assert!(storage.read("other").unwrap().is_none());
    }
}

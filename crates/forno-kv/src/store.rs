//! Key-value store with automatic serialization.

use crate::KvError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Raw byte storage behind [`Kv`].
///
/// Implementations only move bytes; serialization happens in the facade.
pub trait Backend: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), KvError>;
    fn remove(&self, key: &str) -> Result<(), KvError>;
}

/// In-memory backend. State dies with the process; used in tests and as a
/// stand-in while a host wires up real storage.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| KvError::StoreError(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), KvError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| KvError::StoreError(e.to_string()))?;
        entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| KvError::StoreError(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed backend. One JSON file per key under a base directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, KvError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| KvError::OpenError(e.to_string()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys contain ':' separators; keep filenames portable.
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl Backend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), KvError> {
        fs::write(self.path_for(key), bytes)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Type-safe store over a [`Backend`].
///
/// Values are stored as JSON for any type implementing `Serialize` and
/// `DeserializeOwned`.
pub struct Kv {
    backend: Box<dyn Backend>,
}

impl Kv {
    /// Store backed by process memory.
    pub fn memory() -> Self {
        Self {
            backend: Box::new(MemoryBackend::default()),
        }
    }

    /// Store backed by files under `dir`.
    pub fn file(dir: impl Into<PathBuf>) -> Result<Self, KvError> {
        Ok(Self {
            backend: Box::new(FileBackend::new(dir)?),
        })
    }

    /// Store over a custom backend.
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Get a value. Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError> {
        match self.backend.read(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.write(key, &bytes)
    }

    /// Delete a value. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), KvError> {
        self.backend.remove(key)
    }

    /// Check if a key exists.
    pub fn exists(&self, key: &str) -> Result<bool, KvError> {
        Ok(self.backend.read(key)?.is_some())
    }
}

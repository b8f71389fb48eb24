//! Key-value backing store with JSON values and a soft size limit.
//!
//! Backends only move strings around; [`Storage`] owns (de)serialization and
//! the quota check.

mod file;
mod memory;

use std::{io, path::PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key written and removed again by [`Storage::is_available`].
pub const TEST_KEY: &str = "__storage_test__";

/// Default soft limit: 5 MiB.
pub const DEFAULT_SOFT_LIMIT: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage key is required")]
    KeyRequired,
    #[error("storage key `{0}` contains unsupported characters")]
    InvalidKey(String),
    #[error("storage quota exceeded: {needed} bytes requested, {remaining} bytes remaining")]
    QuotaExceeded { needed: usize, remaining: usize },
    #[error("storage access denied: {0}")]
    AccessDenied(String),
    #[error("invalid data format for key `{key}`: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize value for key `{key}`: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage i/o failure: {0}")]
    Io(#[source] io::Error),
}

impl StorageError {
    /// Stable identifier used when the error crosses into user-facing layers.
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::KeyRequired | StorageError::InvalidKey(_) => "STORAGE_KEY",
            StorageError::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            StorageError::AccessDenied(_) => "ACCESS_DENIED",
            StorageError::Malformed { .. } => "MALFORMED_DATA",
            StorageError::Serialization { .. } => "SERIALIZATION",
            StorageError::Io(_) => "STORAGE_IO",
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
                StorageError::AccessDenied(err.to_string())
            }
            _ => StorageError::Io(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StorageError>;

/// Raw string-valued backend, the shape of browser local storage.
pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_raw(&mut self, key: &str, value: String) -> StoreResult<()>;
    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
    fn clear(&mut self) -> StoreResult<()>;
    /// Total bytes currently held across all keys.
    fn usage(&self) -> StoreResult<usize>;

    fn len_of(&self, key: &str) -> StoreResult<usize> {
        Ok(self.get_raw(key)?.map(|value| value.len()).unwrap_or(0))
    }
}

/// Location and size limit of the file-backed store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageSettings {
    pub dir: PathBuf,
    pub soft_limit_bytes: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".hr-data"),
            soft_limit_bytes: DEFAULT_SOFT_LIMIT,
        }
    }
}

impl StorageSettings {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn open(&self) -> StoreResult<Storage<FileStore>> {
        let backend = FileStore::open(&self.dir)?;
        Ok(Storage::new(backend, self.soft_limit_bytes))
    }
}

/// JSON-valued view over a [`KeyValueStore`].
#[derive(Debug)]
pub struct Storage<B> {
    backend: B,
    soft_limit: usize,
}

impl<B: KeyValueStore> Storage<B> {
    pub fn new(backend: B, soft_limit: usize) -> Self {
        Self {
            backend,
            soft_limit,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn soft_limit(&self) -> usize {
        self.soft_limit
    }

    /// Parsed value for `key`, or `None` when the key is absent or empty.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        require_key(key)?;
        let Some(raw) = self.backend.get_raw(key)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Malformed {
                key: key.to_string(),
                source,
            })
    }

    /// Serializes and stores `value`.
    ///
    /// Rejects the write up front when the projected total would pass the soft
    /// limit, leaving the stored value untouched.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> StoreResult<()> {
        require_key(key)?;
        let serialized =
            serde_json::to_string(value).map_err(|source| StorageError::Serialization {
                key: key.to_string(),
                source,
            })?;
        let others = self
            .backend
            .usage()?
            .saturating_sub(self.backend.len_of(key)?);
        let remaining = self.soft_limit.saturating_sub(others);
        if serialized.len() > remaining {
            warn!(key, needed = serialized.len(), remaining, "write rejected by soft limit");
            return Err(StorageError::QuotaExceeded {
                needed: serialized.len(),
                remaining,
            });
        }
        debug!(key, bytes = serialized.len(), "writing value");
        self.backend.set_raw(key, serialized)
    }

    pub fn remove(&mut self, key: &str) -> StoreResult<()> {
        require_key(key)?;
        self.backend.remove(key)
    }

    pub fn clear(&mut self) -> StoreResult<()> {
        self.backend.clear()
    }

    /// Bytes left under the soft limit.
    pub fn remaining(&self) -> StoreResult<usize> {
        Ok(self.soft_limit.saturating_sub(self.backend.usage()?))
    }

    /// Round-trips a tiny marker value to check the backend accepts writes.
    pub fn is_available(&mut self) -> bool {
        self.probe().unwrap_or(false)
    }

    fn probe(&mut self) -> StoreResult<bool> {
        self.backend.set_raw(TEST_KEY, "test".to_string())?;
        let ok = self.backend.get_raw(TEST_KEY)?.as_deref() == Some("test");
        self.backend.remove(TEST_KEY)?;
        Ok(ok)
    }
}

fn require_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StorageError::KeyRequired);
    }
    Ok(())
}

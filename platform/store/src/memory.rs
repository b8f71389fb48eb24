use std::collections::BTreeMap;

use crate::{KeyValueStore, StorageError, StoreResult};

/// In-process backend. `read_only` makes every write fail with
/// [`StorageError::AccessDenied`], the way a locked-down browser profile does.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        if self.read_only {
            return Err(StorageError::AccessDenied("store is read-only".into()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: String) -> StoreResult<()> {
        self.ensure_writable()?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.ensure_writable()?;
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.ensure_writable()?;
        self.entries.clear();
        Ok(())
    }

    fn usage(&self) -> StoreResult<usize> {
        Ok(self.entries.values().map(String::len).sum())
    }

    fn len_of(&self, key: &str) -> StoreResult<usize> {
        Ok(self.entries.get(key).map(String::len).unwrap_or(0))
    }
}

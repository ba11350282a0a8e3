//! In-process [`SchemaStore`] backed by a `HashMap`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, StorageError};
use crate::traits::SchemaStore;

/// A store that keeps everything in memory. Nothing outlives the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Poisoned("entries"))
    }
}

impl SchemaStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

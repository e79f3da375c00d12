use std::sync::Mutex;

use kbase_core::error::{Error, Result};
use kbase_core::traits::IndexStore;
use kbase_core::types::IndexFile;

/// Keeps the last saved index in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    saved: Mutex<Option<IndexFile>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out as if `index` had already been persisted.
    pub fn with_index(index: IndexFile) -> Self {
        Self { saved: Mutex::new(Some(index)) }
    }

    pub fn snapshot(&self) -> Result<Option<IndexFile>> {
        self.load()
    }
}

impl IndexStore for InMemoryStore {
    fn load(&self) -> Result<Option<IndexFile>> {
        Ok(self.saved.lock().map_err(|_| Error::Poisoned)?.clone())
    }

    fn save(&self, index: &IndexFile) -> Result<()> {
        *self.saved.lock().map_err(|_| Error::Poisoned)? = Some(index.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_then_returns_last_save() {
        let store = InMemoryStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&IndexFile::empty(16)).unwrap();
        assert_eq!(store.snapshot().unwrap().map(|i| i.dims), Some(16));
    }
}

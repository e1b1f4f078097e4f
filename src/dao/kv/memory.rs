use std::{collections::HashMap, sync::Mutex};

use crate::dao::{kv::KeyValueStore, storage::StorageResult};

/// In-memory store used by tests and ephemeral runs. Nothing survives the
/// process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let documents = self.documents.lock().expect("memory store poisoned");
        Ok(documents.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut documents = self.documents.lock().expect("memory store poisoned");
        documents.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut documents = self.documents.lock().expect("memory store poisoned");
        documents.remove(key);
        Ok(())
    }
}

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{DurableStorage, StorageError, StorageWrite};

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn apply(&self, batch: &[StorageWrite]) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        for write in batch {
            match &write.value {
                Some(value) => {
                    entries.insert(write.key.to_string(), value.clone());
                }
                None => {
                    entries.remove(write.key);
                }
            }
        }
        Ok(())
    }
}

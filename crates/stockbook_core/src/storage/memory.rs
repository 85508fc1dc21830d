//! Volatile in-process storage.
//!
//! Backs session-scoped state and tests. Contents live as long as the value.

use super::KeyValueStore;
use crate::db::DbResult;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        // A panic mid-write cannot leave a half-written String behind,
        // so a poisoned map is still consistent.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> DbResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStorage;
    use crate::storage::KeyValueStore;

    #[test]
    fn set_get_remove() {
        let store = MemoryStorage::new();
        assert!(store.is_empty());

        store.set_item("imeis", "[]").unwrap();
        store.set_item("imeis", "[\"1\"]").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_item("imeis").unwrap().as_deref(), Some("[\"1\"]"));

        store.remove_item("imeis").unwrap();
        store.remove_item("imeis").unwrap();
        assert_eq!(store.get_item("imeis").unwrap(), None);
    }
}

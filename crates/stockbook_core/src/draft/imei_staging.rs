//! IMEI staging buffer over the `imeis` key.

use crate::error::StoreResult;
use crate::model::values::{push_unique, remove_at};
use crate::storage::{load_json, save_json, KeyValueStore};
use log::debug;

pub const STAGED_IMEIS_KEY: &str = "imeis";

/// Ordered, duplicate-free IMEIs staged for the current draft.
pub struct ImeiStagingBuffer<'s> {
    storage: &'s dyn KeyValueStore,
}

impl<'s> ImeiStagingBuffer<'s> {
    pub fn new(storage: &'s dyn KeyValueStore) -> Self {
        Self { storage }
    }

    /// Stages a trimmed IMEI and returns the new count.
    ///
    /// # Errors
    /// - `Validation` for blank input.
    /// - `Duplicate` when the IMEI is already staged.
    pub fn add(&self, value: &str) -> StoreResult<usize> {
        let mut imeis = self.list()?;
        push_unique(&mut imeis, value, "staged imeis")?;
        self.store(&imeis)?;
        debug!(
            "event=staging_imei_add module=draft status=ok count={}",
            imeis.len()
        );
        Ok(imeis.len())
    }

    /// Removes the staged IMEI at `index` and returns it.
    pub fn remove(&self, index: usize) -> StoreResult<String> {
        let mut imeis = self.list()?;
        let removed = remove_at(&mut imeis, index)?;
        self.store(&imeis)?;
        debug!(
            "event=staging_imei_remove module=draft status=ok count={}",
            imeis.len()
        );
        Ok(removed)
    }

    /// Empties the buffer.
    pub fn clear(&self) -> StoreResult<()> {
        self.store(&[])
    }

    pub fn count(&self) -> StoreResult<usize> {
        Ok(self.list()?.len())
    }

    pub fn list(&self) -> StoreResult<Vec<String>> {
        load_json(self.storage, STAGED_IMEIS_KEY)
    }

    /// Writes `[]` when the buffer key has never been written.
    pub fn initialize(&self) -> StoreResult<()> {
        if self.storage.get_item(STAGED_IMEIS_KEY)?.is_none() {
            self.clear()?;
        }
        Ok(())
    }

    fn store(&self, imeis: &[String]) -> StoreResult<()> {
        save_json(self.storage, STAGED_IMEIS_KEY, imeis)
    }
}

#[cfg(test)]
mod tests {
    use super::{ImeiStagingBuffer, STAGED_IMEIS_KEY};
    use crate::storage::{KeyValueStore, MemoryStorage};

    #[test]
    fn clear_writes_empty_array() {
        let store = MemoryStorage::new();
        let buffer = ImeiStagingBuffer::new(&store);
        buffer.add("111").unwrap();

        buffer.clear().unwrap();

        assert_eq!(store.get_item(STAGED_IMEIS_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(buffer.count().unwrap(), 0);
    }

    #[test]
    fn initialize_does_not_drop_a_persisted_draft() {
        let store = MemoryStorage::new();
        store.set_item(STAGED_IMEIS_KEY, r#"["42"]"#).unwrap();

        let buffer = ImeiStagingBuffer::new(&store);
        buffer.initialize().unwrap();

        assert_eq!(buffer.list().unwrap(), vec!["42"]);
    }
}

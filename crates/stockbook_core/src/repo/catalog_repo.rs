//! Attribute catalog over the eight category keys.
//!
//! # Invariants
//! - Values are trimmed, non-blank and unique per category (exact match).
//! - Insertion order is display order.
//! - Removing a value never touches items that already use it.

use crate::error::StoreResult;
use crate::model::category::Category;
use crate::model::values::{push_unique, remove_at};
use crate::storage::{load_json, save_json, KeyValueStore};
use log::debug;

/// Category value lists used by selection widgets.
pub struct AttributeCatalog<'s> {
    storage: &'s dyn KeyValueStore,
}

impl<'s> AttributeCatalog<'s> {
    pub fn new(storage: &'s dyn KeyValueStore) -> Self {
        Self { storage }
    }

    /// Appends `value` (trimmed) and returns the updated list.
    ///
    /// # Errors
    /// - `Validation` when the value is blank.
    /// - `Duplicate` when the category already holds the value.
    pub fn add(&self, category: Category, value: &str) -> StoreResult<Vec<String>> {
        let mut values = self.list(category)?;
        push_unique(&mut values, value, category.storage_key())?;
        save_json(self.storage, category.storage_key(), &values)?;
        debug!(
            "event=catalog_add module=repo status=ok category={} count={}",
            category.storage_key(),
            values.len()
        );
        Ok(values)
    }

    /// Removes the entry at `index` and returns the updated list.
    pub fn remove(&self, category: Category, index: usize) -> StoreResult<Vec<String>> {
        let mut values = self.list(category)?;
        remove_at(&mut values, index)?;
        save_json(self.storage, category.storage_key(), &values)?;
        debug!(
            "event=catalog_remove module=repo status=ok category={} index={} count={}",
            category.storage_key(),
            index,
            values.len()
        );
        Ok(values)
    }

    /// Current values of `category` in insertion order.
    pub fn list(&self, category: Category) -> StoreResult<Vec<String>> {
        load_json(self.storage, category.storage_key())
    }

    /// Like [`list`](Self::list) but resolves a category name first.
    ///
    /// # Errors
    /// - `UnknownCategory` when `name` is not one of the eight categories.
    pub fn list_named(&self, name: &str) -> StoreResult<Vec<String>> {
        self.list(name.parse()?)
    }

    pub fn contains(&self, category: Category, value: &str) -> StoreResult<bool> {
        Ok(self.list(category)?.iter().any(|existing| existing == value))
    }

    /// Writes `[]` for every category key that has no value yet.
    pub fn initialize(&self) -> StoreResult<()> {
        for category in Category::ALL {
            if self.storage.get_item(category.storage_key())?.is_none() {
                save_json(self.storage, category.storage_key(), &Vec::<String>::new())?;
            }
        }
        Ok(())
    }
}

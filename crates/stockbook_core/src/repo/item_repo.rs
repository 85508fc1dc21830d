//! Saved item list over the `savedItems` key.
//!
//! # Responsibility
//! - Append, read and edit saved items addressed by row index.
//! - Own per-item IMEI add/remove with the staging-buffer rules.
//!
//! # Invariants
//! - Writes call `Item::validate()` before touching storage.
//! - Row index is a display position, not an identity; `Item::id` is stable.
//! - Items are never deleted, so indices only grow.
//! - Records stored without an `id` get one on first read, persisted at once.

use crate::error::{StoreError, StoreResult};
use crate::model::item::{Item, ItemField, ItemId};
use crate::model::values::{push_unique, remove_at};
use crate::storage::{save_json, KeyValueStore};
use log::{debug, info};
use serde_json::Value;
use std::iter::Enumerate;
use std::vec::IntoIter;
use uuid::Uuid;

pub const SAVED_ITEMS_KEY: &str = "savedItems";

/// Snapshot iterator of `(index, item)` pairs in storage order.
pub type ItemRows = Enumerate<IntoIter<Item>>;

/// Ordered repository of saved items.
pub struct ItemRepository<'s> {
    storage: &'s dyn KeyValueStore,
}

impl<'s> ItemRepository<'s> {
    pub fn new(storage: &'s dyn KeyValueStore) -> Self {
        Self { storage }
    }

    /// Appends a validated item and returns its row index.
    ///
    /// # Errors
    /// - `Validation` when the item breaks a record invariant.
    /// - `Duplicate` when a stored item already carries the same id.
    pub fn append(&self, mut item: Item) -> StoreResult<usize> {
        item.name = item.name.trim().to_string();
        item.validate()?;
        let mut items = self.load()?;
        if items.iter().any(|stored| stored.id == item.id) {
            return Err(StoreError::Duplicate {
                scope: "item ids".to_string(),
                value: item.id.to_string(),
            });
        }
        items.push(item);
        self.store(&items)?;

        let index = items.len() - 1;
        info!(
            "event=item_append module=repo status=ok index={} imei_count={} has_image={}",
            index,
            items[index].imeis.len(),
            items[index].image.is_some()
        );
        Ok(index)
    }

    pub fn get(&self, index: usize) -> StoreResult<Item> {
        let mut items = self.load()?;
        check_index(index, items.len())?;
        Ok(items.swap_remove(index))
    }

    /// Replaces one field of the item at `index` in place.
    ///
    /// # Errors
    /// - `Index` for a row outside the list.
    /// - `UnknownField` for a name outside the editable set.
    /// - `Validation` when the new value breaks an item invariant.
    pub fn update_field(&self, index: usize, field: &str, value: &str) -> StoreResult<Item> {
        let mut items = self.load()?;
        check_index(index, items.len())?;
        let field: ItemField = field.parse()?;

        items[index].set_field(field, value)?;
        self.store(&items)?;
        debug!(
            "event=item_update module=repo status=ok index={} field={}",
            index, field
        );
        Ok(items.swap_remove(index))
    }

    /// Adds an IMEI to a stored item and returns the item's IMEI list.
    pub fn add_imei(&self, index: usize, value: &str) -> StoreResult<Vec<String>> {
        let mut items = self.load()?;
        check_index(index, items.len())?;

        push_unique(&mut items[index].imeis, value, "item imeis")?;
        self.store(&items)?;
        debug!(
            "event=item_imei_add module=repo status=ok index={} imei_count={}",
            index,
            items[index].imeis.len()
        );
        Ok(items.swap_remove(index).imeis)
    }

    /// Removes the IMEI at `imei_index` from a stored item.
    pub fn remove_imei(&self, index: usize, imei_index: usize) -> StoreResult<Vec<String>> {
        let mut items = self.load()?;
        check_index(index, items.len())?;

        remove_at(&mut items[index].imeis, imei_index)?;
        self.store(&items)?;
        debug!(
            "event=item_imei_remove module=repo status=ok index={} imei_count={}",
            index,
            items[index].imeis.len()
        );
        Ok(items.swap_remove(index).imeis)
    }

    pub fn imeis(&self, index: usize) -> StoreResult<Vec<String>> {
        Ok(self.get(index)?.imeis)
    }

    /// Reads the current list and yields `(index, item)` pairs.
    ///
    /// Each call re-reads storage; the returned iterator is a snapshot.
    pub fn all(&self) -> StoreResult<ItemRows> {
        Ok(self.load()?.into_iter().enumerate())
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Current row index of the item with `id`, if still present.
    pub fn position(&self, id: ItemId) -> StoreResult<Option<usize>> {
        Ok(self.load()?.iter().position(|item| item.id == id))
    }

    fn load(&self) -> StoreResult<Vec<Item>> {
        let raw = match self.storage.get_item(SAVED_ITEMS_KEY)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };
        let values: Vec<Value> = serde_json::from_str(&raw).map_err(|err| {
            StoreError::InvalidData(format!("key `{SAVED_ITEMS_KEY}`: {err}"))
        })?;

        let mut backfilled = 0usize;
        let mut items = Vec::with_capacity(values.len());
        for (index, mut value) in values.into_iter().enumerate() {
            if let Some(record) = value.as_object_mut() {
                if !record.contains_key("id") {
                    record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
                    backfilled += 1;
                }
            }
            let item: Item = serde_json::from_value(value).map_err(|err| {
                StoreError::InvalidData(format!("key `{SAVED_ITEMS_KEY}` row {index}: {err}"))
            })?;
            items.push(item);
        }

        if backfilled > 0 {
            self.store(&items)?;
            info!(
                "event=item_id_backfill module=repo status=ok backfilled={}",
                backfilled
            );
        }
        Ok(items)
    }

    fn store(&self, items: &[Item]) -> StoreResult<()> {
        save_json(self.storage, SAVED_ITEMS_KEY, items)
    }
}

fn check_index(index: usize, len: usize) -> StoreResult<()> {
    if index >= len {
        return Err(StoreError::Index { index, len });
    }
    Ok(())
}

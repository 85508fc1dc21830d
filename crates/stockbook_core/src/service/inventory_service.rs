//! Inventory use-case service.
//!
//! # Responsibility
//! - Hand out catalog, staging, image and item components bound to storage.
//! - Commit a draft: snapshot into the item list, then clear draft state.
//! - Carry the selected row from the listing page to the edit page.
//!
//! # Invariants
//! - A failed save leaves staged IMEIs, the pending image and the form intact.
//! - The edit handoff lives in session storage only.

use crate::draft::image_store::ImageStore;
use crate::draft::imei_staging::ImeiStagingBuffer;
use crate::error::{StoreError, StoreResult};
use crate::listing::ItemTable;
use crate::model::item::{Item, ItemDraft};
use crate::repo::catalog_repo::AttributeCatalog;
use crate::repo::item_repo::ItemRepository;
use crate::storage::{KeyValueStore, MemoryStorage};
use chrono::Utc;
use log::info;

/// Session key carrying the row index selected for editing.
pub const EDIT_ITEM_INDEX_KEY: &str = "editItemIndex";

/// Facade over local (durable) and session (per-tab) storage.
pub struct InventoryService<L: KeyValueStore, S: KeyValueStore = MemoryStorage> {
    local: L,
    session: S,
}

impl<L: KeyValueStore> InventoryService<L, MemoryStorage> {
    /// Creates a service with a fresh, empty session scope.
    pub fn new(local: L) -> Self {
        Self::with_session(local, MemoryStorage::new())
    }
}

impl<L: KeyValueStore, S: KeyValueStore> InventoryService<L, S> {
    pub fn with_session(local: L, session: S) -> Self {
        Self { local, session }
    }

    /// Seeds empty lists for every catalog key and the staging buffer.
    ///
    /// Keys that already hold a value are left alone.
    pub fn initialize(&self) -> StoreResult<()> {
        self.catalog().initialize()?;
        self.imeis().initialize()?;
        Ok(())
    }

    pub fn catalog(&self) -> AttributeCatalog<'_> {
        AttributeCatalog::new(&self.local)
    }

    pub fn imeis(&self) -> ImeiStagingBuffer<'_> {
        ImeiStagingBuffer::new(&self.local)
    }

    pub fn image(&self) -> ImageStore<'_> {
        ImageStore::new(&self.local)
    }

    pub fn items(&self) -> ItemRepository<'_> {
        ItemRepository::new(&self.local)
    }

    /// Builds the listing table from the current item list.
    pub fn table(&self) -> StoreResult<ItemTable> {
        Ok(ItemTable::from_rows(self.items().all()?))
    }

    /// Commits `draft` and returns the new row index.
    ///
    /// On success the staged IMEIs and pending image move into the saved
    /// item, both are cleared, and `draft` is reset to empty.
    ///
    /// # Errors
    /// - `Validation` when the draft name is blank or a price is not numeric.
    pub fn save(&self, draft: &mut ItemDraft) -> StoreResult<usize> {
        let imeis = self.imeis().list()?;
        let image = self.image().get()?;
        let item = Item::from_draft(draft, imeis, image, Utc::now());
        let item_id = item.id;

        let index = self.items().append(item)?;
        self.imeis().clear()?;
        self.image().clear()?;
        draft.reset();

        info!(
            "event=draft_save module=service status=ok index={} item_id={}",
            index, item_id
        );
        Ok(index)
    }

    /// Records `index` as the row to open on the edit page.
    pub fn begin_edit(&self, index: usize) -> StoreResult<()> {
        let len = self.items().len()?;
        if index >= len {
            return Err(StoreError::Index { index, len });
        }
        self.session
            .set_item(EDIT_ITEM_INDEX_KEY, &index.to_string())?;
        Ok(())
    }

    /// Resolves the handed-off row, or `None` when no edit was requested.
    ///
    /// # Errors
    /// - `Index` when the recorded row no longer exists.
    /// - `InvalidData` when the session value is not a row number.
    pub fn edit_target(&self) -> StoreResult<Option<(usize, Item)>> {
        let raw = match self.session.get_item(EDIT_ITEM_INDEX_KEY)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let index = raw.trim().parse::<usize>().map_err(|_| {
            StoreError::InvalidData(format!("key `{EDIT_ITEM_INDEX_KEY}`: `{raw}` is not a row"))
        })?;
        let item = self.items().get(index)?;
        Ok(Some((index, item)))
    }

    pub fn clear_edit(&self) -> StoreResult<()> {
        self.session.remove_item(EDIT_ITEM_INDEX_KEY)?;
        Ok(())
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn session(&self) -> &S {
        &self.session
    }
}

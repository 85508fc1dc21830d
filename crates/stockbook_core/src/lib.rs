//! Core inventory store for Stockbook.
//! This crate is the single source of truth for catalog, draft and item invariants.

pub mod db;
pub mod draft;
pub mod error;
pub mod listing;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use draft::image_store::{ImageStore, ImageUpload};
pub use draft::imei_staging::ImeiStagingBuffer;
pub use error::{ErrorKind, StoreError, StoreResult};
pub use listing::{Column, ColumnVisibility, ItemTable, TableRow};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::Category;
pub use model::image::{ImageMime, ImagePayload, MAX_IMAGE_BYTES};
pub use model::item::{Item, ItemDraft, ItemField, ItemId};
pub use repo::catalog_repo::AttributeCatalog;
pub use repo::item_repo::{ItemRepository, ItemRows};
pub use service::inventory_service::InventoryService;
pub use storage::{KeyValueStore, MemoryStorage, SqliteStorage};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

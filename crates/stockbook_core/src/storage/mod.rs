//! String-keyed storage backends.
//!
//! # Responsibility
//! - Define the `KeyValueStore` contract every store component writes through.
//! - Provide JSON load/save helpers shared by components.
//!
//! # Invariants
//! - Keys and values are plain strings; components own JSON encoding.
//! - A missing key is `None`, never an error.
//! - Each call completes before returning; there is no cross-call batching.

use crate::db::DbResult;
use crate::error::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Local/session storage contract.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> DbResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> DbResult<()>;
    fn remove_item(&self, key: &str) -> DbResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> DbResult<()> {
        (**self).remove_item(key)
    }
}

/// Reads and decodes a JSON value, falling back to `T::default()` when absent.
pub(crate) fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    match store.get_item(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|err| StoreError::InvalidData(format!("key `{key}`: {err}"))),
        None => Ok(T::default()),
    }
}

/// Encodes and writes a JSON value under `key`.
pub(crate) fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value)?;
    store.set_item(key, &encoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_json, save_json, KeyValueStore, MemoryStorage};
    use crate::error::ErrorKind;

    #[test]
    fn missing_key_loads_default() {
        let store = MemoryStorage::new();
        let loaded: Vec<String> = load_json(&store, "brands").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let store = MemoryStorage::new();
        save_json(&store, "colors", &["Red", "Blue"]).unwrap();
        let loaded: Vec<String> = load_json(&store, "colors").unwrap();
        assert_eq!(loaded, vec!["Red", "Blue"]);
    }

    #[test]
    fn corrupt_value_is_reported_not_replaced() {
        let store = MemoryStorage::new();
        store.set_item("rams", "not json").unwrap();
        let err = load_json::<Vec<String>>(&store, "rams").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(store.get_item("rams").unwrap().as_deref(), Some("not json"));
    }
}

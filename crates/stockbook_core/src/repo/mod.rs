//! Persistent collections behind the add and view pages.
//!
//! # Responsibility
//! - `AttributeCatalog`: one ordered value list per category.
//! - `ItemRepository`: the ordered list of saved items.
//!
//! # Invariants
//! - Each collection owns exactly one storage key per list.
//! - Every write validates first; a rejected call leaves storage untouched.
//! - Reads always go to storage; nothing is cached between calls.

pub mod catalog_repo;
pub mod item_repo;

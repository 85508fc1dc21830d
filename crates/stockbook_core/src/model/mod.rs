//! Inventory domain model.
//!
//! # Responsibility
//! - Define the closed category set, item records, drafts and image payloads.
//! - Hold the validation rules shared by every component that stores them.
//!
//! # Invariants
//! - Category and field names form closed sets; unknown names are errors.
//! - Ordered string lists stay free of duplicates and blank entries.

pub mod category;
pub mod image;
pub mod item;
pub mod values;

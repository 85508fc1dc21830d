//! Draft-scoped state for the item being composed.
//!
//! # Responsibility
//! - `ImeiStagingBuffer`: IMEIs waiting to be attached on save.
//! - `ImageStore` / `ImageUpload`: the single pending image slot.
//!
//! # Invariants
//! - Draft state persists across page loads until a successful save clears it.
//! - Draft state is independent of every saved item until that save.

pub mod image_store;
pub mod imei_staging;

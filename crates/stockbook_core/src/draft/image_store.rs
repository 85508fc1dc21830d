//! Pending image slot over the `itemImage` key.
//!
//! # Responsibility
//! - Hold zero or one validated image for the current draft.
//! - Model an upload as a validated begin step and a resolving finish step.
//!
//! # Invariants
//! - The slot changes only when a payload fully validates.
//! - The value is stored as the raw data URL, not JSON-quoted.
//! - With several uploads in flight, the last one applied wins.

use crate::error::{StoreError, StoreResult};
use crate::model::image::{ensure_image_data_url, ensure_size, ImageMime, ImagePayload};
use crate::storage::KeyValueStore;
use log::debug;

pub const PENDING_IMAGE_KEY: &str = "itemImage";

/// Single-slot store for the draft image.
pub struct ImageStore<'s> {
    storage: &'s dyn KeyValueStore,
}

impl<'s> ImageStore<'s> {
    pub fn new(storage: &'s dyn KeyValueStore) -> Self {
        Self { storage }
    }

    /// Stores `payload`, replacing any pending image.
    ///
    /// # Errors
    /// - `UnsupportedType` unless `mime_type` is JPEG, PNG, GIF or SVG.
    /// - `TooLarge` when `size_bytes` exceeds 5 MiB.
    /// - `Validation` when `payload` is not a data URL or declares another type.
    /// - `UnsupportedType`/`TooLarge` when the payload itself breaks the rules.
    pub fn set(&self, payload: &str, mime_type: &str, size_bytes: u64) -> StoreResult<()> {
        let mime = ImageMime::parse(mime_type)?;
        ensure_size(size_bytes)?;
        let payload_mime = ensure_image_data_url(payload)?;
        if payload_mime != mime {
            return Err(StoreError::validation(format!(
                "image payload is {payload_mime}, declared as {mime}"
            )));
        }

        self.storage.set_item(PENDING_IMAGE_KEY, payload)?;
        debug!(
            "event=image_set module=draft status=ok mime={} size_bytes={}",
            mime, size_bytes
        );
        Ok(())
    }

    /// Stores a payload produced by [`ImageUpload::finish`].
    pub fn apply(&self, payload: &ImagePayload) -> StoreResult<()> {
        self.set(
            payload.data_url(),
            payload.mime().as_str(),
            payload.size_bytes(),
        )
    }

    pub fn get(&self) -> StoreResult<Option<String>> {
        Ok(self.storage.get_item(PENDING_IMAGE_KEY)?)
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.storage.remove_item(PENDING_IMAGE_KEY)?;
        Ok(())
    }
}

/// Image read that passed type and size checks and awaits its bytes.
///
/// Dropping it without calling `finish` cancels nothing and stores nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageUpload {
    mime: ImageMime,
}

impl ImageUpload {
    /// Validates file metadata before any bytes are read.
    pub fn begin(mime_type: &str, size_bytes: u64) -> StoreResult<Self> {
        let mime = ImageMime::parse(mime_type)?;
        ensure_size(size_bytes)?;
        Ok(Self { mime })
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    /// Resolves the read into a payload, re-checking the actual size.
    pub fn finish(self, bytes: &[u8]) -> StoreResult<ImagePayload> {
        ImagePayload::encode(self.mime, bytes)
    }
}

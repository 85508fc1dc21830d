//! Store-wide error model.
//!
//! # Responsibility
//! - Give every store component one error type with stable kinds.
//! - Keep storage transport failures distinct from user-input rejections.
//!
//! # Invariants
//! - A returned error means persisted state was left unchanged.
//! - `ErrorKind` values are stable and safe to match on from UI layers.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Stable error discriminant for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Duplicate,
    Index,
    UnknownCategory,
    UnknownField,
    UnsupportedType,
    TooLarge,
    Storage,
    InvalidData,
}

/// Error returned by catalog, draft, item and listing operations.
#[derive(Debug)]
pub enum StoreError {
    /// Required input is empty or malformed.
    Validation(String),
    /// Value already present where uniqueness is required.
    Duplicate { scope: String, value: String },
    /// Positional access outside `0..len`.
    Index { index: usize, len: usize },
    /// Name outside the closed set of categories.
    UnknownCategory(String),
    /// Name outside the closed set of item fields or table columns.
    UnknownField(String),
    /// Image MIME type outside the accepted set.
    UnsupportedType(String),
    /// Image payload over the size cap.
    TooLarge { size: u64, max: u64 },
    Storage(DbError),
    /// Persisted value exists but does not decode to the expected shape.
    InvalidData(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::Index { .. } => ErrorKind::Index,
            Self::UnknownCategory(_) => ErrorKind::UnknownCategory,
            Self::UnknownField(_) => ErrorKind::UnknownField,
            Self::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Self::TooLarge { .. } => ErrorKind::TooLarge,
            Self::Storage(_) => ErrorKind::Storage,
            Self::InvalidData(_) => ErrorKind::InvalidData,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "invalid input: {message}"),
            Self::Duplicate { scope, value } => {
                write!(f, "`{value}` already exists in {scope}")
            }
            Self::Index { index, len } => {
                write!(f, "index {index} out of range for {len} entries")
            }
            Self::UnknownCategory(name) => write!(f, "unknown category `{name}`"),
            Self::UnknownField(name) => write!(f, "unknown field `{name}`"),
            Self::UnsupportedType(mime) => write!(f, "unsupported image type `{mime}`"),
            Self::TooLarge { size, max } => {
                write!(f, "image of {size} bytes exceeds the {max} byte limit")
            }
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidData(value.to_string())
    }
}

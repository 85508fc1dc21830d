//! Item table projection for the listing page.
//!
//! # Responsibility
//! - Turn saved items into display rows with fixed columns.
//! - Apply text search, column visibility and the entries-shown limit.
//!
//! # Invariants
//! - Search matches every displayed cell, hidden or not.
//! - Visibility toggles never change which rows match.

pub mod table;

pub use table::{
    parse_entry_limit, Column, ColumnVisibility, ItemTable, TableRow, DEFAULT_VISIBLE_ROWS,
    EMPTY_TABLE_NOTICE,
};

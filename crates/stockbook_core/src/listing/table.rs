//! Row/column model of the saved-items table.

use crate::error::{StoreError, StoreResult};
use crate::model::item::{Item, ItemId};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Rows shown before the user changes the entries count.
pub const DEFAULT_VISIBLE_ROWS: usize = 30;

/// Placeholder rendered when no item has been saved yet.
pub const EMPTY_TABLE_NOTICE: &str = "No items found. Please add items first.";

/// Table column in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Number,
    Name,
    Brand,
    Model,
    ImeiCount,
    Color,
    Ram,
    Storage,
    DateCreated,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Number,
        Column::Name,
        Column::Brand,
        Column::Model,
        Column::ImeiCount,
        Column::Color,
        Column::Ram,
        Column::Storage,
        Column::DateCreated,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Self::Number => "No.",
            Self::Name => "Name",
            Self::Brand => "Brand",
            Self::Model => "Model",
            Self::ImeiCount => "IMEI",
            Self::Color => "Color",
            Self::Ram => "RAM",
            Self::Storage => "Storage",
            Self::DateCreated => "Date Created",
        }
    }

    fn position(self) -> usize {
        self as usize
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = StoreError;

    /// Matches headers ignoring case, with `_` accepted for spaces.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_column_name(value);
        Column::ALL
            .into_iter()
            .find(|column| normalize_column_name(column.header()) == wanted)
            .ok_or_else(|| StoreError::UnknownField(value.to_string()))
    }
}

fn normalize_column_name(value: &str) -> String {
    value
        .trim()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Storage index; the edit and IMEI actions address the item by it.
    pub index: usize,
    pub item_id: ItemId,
    cells: Vec<String>,
}

impl TableRow {
    pub fn from_item(index: usize, item: &Item) -> Self {
        let cells = Column::ALL
            .into_iter()
            .map(|column| match column {
                Column::Number => (index + 1).to_string(),
                Column::Name => item.name.clone(),
                Column::Brand => item.brand.clone(),
                Column::Model => item.model.clone(),
                Column::ImeiCount => item.imeis.len().to_string(),
                Column::Color => item.color.clone(),
                Column::Ram => item.ram.clone(),
                Column::Storage => item.storage.clone(),
                Column::DateCreated => item.date_created.format("%Y-%m-%d").to_string(),
            })
            .collect();
        Self {
            index,
            item_id: item.id,
            cells,
        }
    }

    pub fn cell(&self, column: Column) -> &str {
        &self.cells[column.position()]
    }

    /// Cells of the visible columns, in display order.
    pub fn visible_cells(&self, visibility: &ColumnVisibility) -> Vec<&str> {
        visibility
            .visible_columns()
            .into_iter()
            .map(|column| self.cell(column))
            .collect()
    }

    /// Case-insensitive substring match over every cell.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self
                .cells
                .iter()
                .any(|cell| cell.to_lowercase().contains(&needle))
    }
}

/// Shown/hidden flag per column; everything starts shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    hidden: BTreeSet<Column>,
}

impl ColumnVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_visible(&mut self, column: Column, visible: bool) {
        if visible {
            self.hidden.remove(&column);
        } else {
            self.hidden.insert(column);
        }
    }

    /// Resolves a column by name and sets its flag.
    pub fn set_visible_named(&mut self, name: &str, visible: bool) -> StoreResult<Column> {
        let column: Column = name.parse()?;
        self.set_visible(column, visible);
        Ok(column)
    }

    /// Flips `column` and returns its new visibility.
    pub fn toggle(&mut self, column: Column) -> bool {
        let visible = !self.is_visible(column);
        self.set_visible(column, visible);
        visible
    }

    pub fn is_visible(&self, column: Column) -> bool {
        !self.hidden.contains(&column)
    }

    pub fn visible_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| self.is_visible(*column))
            .collect()
    }
}

/// Projected table built from one read of the item repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemTable {
    rows: Vec<TableRow>,
}

impl ItemTable {
    pub fn from_rows(rows: impl IntoIterator<Item = (usize, Item)>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|(index, item)| TableRow::from_item(index, &item))
                .collect(),
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn search(&self, text: &str) -> Vec<&TableRow> {
        self.rows.iter().filter(|row| row.matches(text)).collect()
    }

    /// Rows matching `text`, truncated to the first `limit`.
    pub fn view(&self, text: &str, limit: usize) -> Vec<&TableRow> {
        self.rows
            .iter()
            .filter(|row| row.matches(text))
            .take(limit)
            .collect()
    }
}

/// Parses the entries-shown input; must be a positive integer.
pub fn parse_entry_limit(raw: &str) -> StoreResult<usize> {
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => Ok(usize::try_from(value).unwrap_or(usize::MAX)),
        _ => Err(StoreError::validation(format!(
            "entries shown must be a positive number, got `{raw}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_entry_limit, Column, ColumnVisibility, ItemTable};
    use crate::error::ErrorKind;
    use crate::model::item::Item;
    use chrono::{TimeZone, Utc};

    fn item(name: &str, brand: &str, imeis: &[&str]) -> Item {
        let mut item = Item::new(name, Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap());
        item.brand = brand.to_string();
        item.imeis = imeis.iter().map(|imei| imei.to_string()).collect();
        item
    }

    fn table() -> ItemTable {
        ItemTable::from_rows(
            vec![
                item("Pixel 8", "Google", &["1", "2"]),
                item("Galaxy S24", "Samsung", &[]),
                item("iPhone 15", "Apple", &["3"]),
            ]
            .into_iter()
            .enumerate(),
        )
    }

    #[test]
    fn cells_follow_column_order() {
        let table = table();
        let row = &table.rows()[0];
        assert_eq!(row.cell(Column::Number), "1");
        assert_eq!(row.cell(Column::ImeiCount), "2");
        assert_eq!(row.cell(Column::DateCreated), "2024-03-09");
    }

    #[test]
    fn search_is_case_insensitive_over_all_cells() {
        let table = table();
        let hits = table.search("SAMSUNG");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 1);

        assert_eq!(table.search("").len(), 3);
        assert_eq!(table.search("2024-03").len(), 3);
        assert!(table.search("nokia").is_empty());
    }

    #[test]
    fn hidden_columns_still_match() {
        let table = table();
        let mut visibility = ColumnVisibility::new();
        visibility.set_visible_named("brand", false).unwrap();

        assert_eq!(table.search("apple").len(), 1);
        assert_eq!(
            table.rows()[2].visible_cells(&visibility),
            vec!["3", "iPhone 15", "", "1", "", "", "", "2024-03-09"]
        );
    }

    #[test]
    fn column_names_accept_underscores() {
        assert_eq!("date_created".parse::<Column>().unwrap(), Column::DateCreated);
        assert_eq!(" ram ".parse::<Column>().unwrap(), Column::Ram);
        assert_eq!(
            "price".parse::<Column>().unwrap_err().kind(),
            ErrorKind::UnknownField
        );
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut visibility = ColumnVisibility::new();
        assert!(!visibility.toggle(Column::Model));
        assert!(visibility.toggle(Column::Model));
        assert_eq!(visibility.visible_columns().len(), Column::ALL.len());
    }

    #[test]
    fn view_applies_limit_after_search() {
        let table = table();
        let rows = table.view("i", 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, 0);
    }

    #[test]
    fn entry_limit_must_be_positive() {
        assert_eq!(parse_entry_limit(" 30 ").unwrap(), 30);
        for raw in ["0", "-4", "ten", ""] {
            assert_eq!(
                parse_entry_limit(raw).unwrap_err().kind(),
                ErrorKind::Validation
            );
        }
    }
}

//! The eight attribute categories and their per-category metadata.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Attribute class whose values populate a selection widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Brand,
    Model,
    Color,
    Storage,
    Ram,
    Distributor,
    Dealer,
    Agent,
}

impl Category {
    /// All categories in form order.
    pub const ALL: [Category; 8] = [
        Category::Brand,
        Category::Model,
        Category::Color,
        Category::Storage,
        Category::Ram,
        Category::Distributor,
        Category::Dealer,
        Category::Agent,
    ];

    /// Storage key holding this category's value list.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Brand => "brands",
            Self::Model => "models",
            Self::Color => "colors",
            Self::Storage => "storages",
            Self::Ram => "rams",
            Self::Distributor => "distributors",
            Self::Dealer => "dealers",
            Self::Agent => "agents",
        }
    }

    /// Singular id used by form widgets and item records.
    pub fn ui_id(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Model => "model",
            Self::Color => "color",
            Self::Storage => "storage",
            Self::Ram => "ram",
            Self::Distributor => "distributor",
            Self::Dealer => "dealer",
            Self::Agent => "agent",
        }
    }

    pub fn dialog_title(self) -> &'static str {
        match self {
            Self::Brand => "Add Brand",
            Self::Model => "Add Model",
            Self::Color => "Add Color",
            Self::Storage => "Add Storage Option",
            Self::Ram => "Add RAM Option",
            Self::Distributor => "Add Distributor",
            Self::Dealer => "Add Dealer",
            Self::Agent => "Add Agent",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Brand => "Brand Name",
            Self::Model => "Model Name",
            Self::Color => "Color Name",
            Self::Storage => "Storage Size",
            Self::Ram => "RAM Size",
            Self::Distributor => "Distributor Name",
            Self::Dealer => "Dealer Name",
            Self::Agent => "Agent Name",
        }
    }

    /// Prompt shown while nothing is selected, e.g. `Select Brand`.
    pub fn select_prompt(self) -> String {
        let id = self.ui_id();
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => format!("Select {}{}", first.to_ascii_uppercase(), chars.as_str()),
            None => "Select".to_string(),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.ui_id())
    }
}

impl FromStr for Category {
    type Err = StoreError;

    /// Accepts the singular UI id or the plural storage key, ignoring case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| {
                category.ui_id() == normalized || category.storage_key() == normalized
            })
            .ok_or_else(|| StoreError::UnknownCategory(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Category;
    use crate::error::ErrorKind;

    #[test]
    fn parses_singular_and_plural_names() {
        assert_eq!("brands".parse::<Category>().unwrap(), Category::Brand);
        assert_eq!(" RAM ".parse::<Category>().unwrap(), Category::Ram);
        assert_eq!("storages".parse::<Category>().unwrap(), Category::Storage);
    }

    #[test]
    fn rejects_names_outside_the_set() {
        let err = "imeis".parse::<Category>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCategory);
    }

    #[test]
    fn storage_keys_are_unique() {
        let mut keys = Category::ALL.map(Category::storage_key).to_vec();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Category::ALL.len());
    }

    #[test]
    fn select_prompt_capitalizes_id() {
        assert_eq!(Category::Distributor.select_prompt(), "Select Distributor");
        assert_eq!(Category::Ram.select_prompt(), "Select Ram");
    }
}

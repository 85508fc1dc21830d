//! Saved item records and the in-progress draft.
//!
//! # Responsibility
//! - Define the persisted item shape (camelCase JSON).
//! - Define the closed set of editable fields.
//! - Snapshot a draft into an item at save time.
//!
//! # Invariants
//! - `name` is non-blank.
//! - Price fields are empty or decimal number strings.
//! - `imeis` holds unique, non-blank values.
//! - `id` is assigned once at creation and never reused.

use crate::error::{StoreError, StoreResult};
use crate::model::category::Category;
use crate::model::image::ensure_image_data_url;
use crate::model::values::ensure_unique;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier assigned to an item when it is first saved.
///
/// Row indices shift when rows move; this id does not.
pub type ItemId = Uuid;

static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("valid price regex"));

/// Saved inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub storage: String,
    #[serde(default)]
    pub ram: String,
    #[serde(default)]
    pub distributor: String,
    #[serde(default)]
    pub dealer: String,
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub distributor_price: String,
    #[serde(default)]
    pub dealer_price: String,
    #[serde(default)]
    pub agent_price: String,
    #[serde(default)]
    pub tax: String,
    #[serde(default)]
    pub mrp_price: String,
    #[serde(default)]
    pub purchase_price: String,
    #[serde(default)]
    pub imeis: Vec<String>,
    /// Data URL of the attached image.
    #[serde(default)]
    pub image: Option<String>,
    pub date_created: DateTime<Utc>,
}

impl Item {
    /// Creates an item with a fresh id and every optional field empty.
    pub fn new(name: impl Into<String>, date_created: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            brand: String::new(),
            model: String::new(),
            color: String::new(),
            storage: String::new(),
            ram: String::new(),
            distributor: String::new(),
            dealer: String::new(),
            agent: String::new(),
            distributor_price: String::new(),
            dealer_price: String::new(),
            agent_price: String::new(),
            tax: String::new(),
            mrp_price: String::new(),
            purchase_price: String::new(),
            imeis: Vec::new(),
            image: None,
            date_created,
        }
    }

    /// Snapshots a draft together with the staged IMEIs and pending image.
    pub fn from_draft(
        draft: &ItemDraft,
        imeis: Vec<String>,
        image: Option<String>,
        date_created: DateTime<Utc>,
    ) -> Self {
        let mut item = Self::new(draft.name.trim(), date_created);
        item.description = draft.description.clone();
        for category in Category::ALL {
            *item.attribute_mut(category) = draft.selection(category).to_string();
        }
        item.distributor_price = draft.distributor_price.trim().to_string();
        item.dealer_price = draft.dealer_price.trim().to_string();
        item.agent_price = draft.agent_price.trim().to_string();
        item.tax = draft.tax.trim().to_string();
        item.mrp_price = draft.mrp_price.trim().to_string();
        item.purchase_price = draft.purchase_price.trim().to_string();
        item.imeis = imeis;
        item.image = image;
        item
    }

    /// Checks record invariants. Catalog membership is not checked.
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::validation("item name cannot be empty"));
        }
        for field in ItemField::PRICES {
            ensure_price(field, self.field(field).unwrap_or_default())?;
        }
        ensure_unique(&self.imeis, "item imeis")?;
        if let Some(image) = self.image.as_deref() {
            ensure_image_data_url(image)?;
        }
        Ok(())
    }

    /// Value selected for `category`.
    pub fn attribute(&self, category: Category) -> &str {
        match category {
            Category::Brand => &self.brand,
            Category::Model => &self.model,
            Category::Color => &self.color,
            Category::Storage => &self.storage,
            Category::Ram => &self.ram,
            Category::Distributor => &self.distributor,
            Category::Dealer => &self.dealer,
            Category::Agent => &self.agent,
        }
    }

    fn attribute_mut(&mut self, category: Category) -> &mut String {
        match category {
            Category::Brand => &mut self.brand,
            Category::Model => &mut self.model,
            Category::Color => &mut self.color,
            Category::Storage => &mut self.storage,
            Category::Ram => &mut self.ram,
            Category::Distributor => &mut self.distributor,
            Category::Dealer => &mut self.dealer,
            Category::Agent => &mut self.agent,
        }
    }

    /// Current text of `field`; `None` for an absent image.
    pub fn field(&self, field: ItemField) -> Option<&str> {
        let value = match field {
            ItemField::Name => self.name.as_str(),
            ItemField::Description => self.description.as_str(),
            ItemField::Attribute(category) => self.attribute(category),
            ItemField::DistributorPrice => self.distributor_price.as_str(),
            ItemField::DealerPrice => self.dealer_price.as_str(),
            ItemField::AgentPrice => self.agent_price.as_str(),
            ItemField::Tax => self.tax.as_str(),
            ItemField::MrpPrice => self.mrp_price.as_str(),
            ItemField::PurchasePrice => self.purchase_price.as_str(),
            ItemField::Image => return self.image.as_deref(),
        };
        Some(value)
    }

    /// Replaces one field after validating the new value.
    ///
    /// On error the item is unchanged. An empty image value detaches the image.
    pub fn set_field(&mut self, field: ItemField, value: &str) -> StoreResult<()> {
        match field {
            ItemField::Name => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(StoreError::validation("item name cannot be empty"));
                }
                self.name = trimmed.to_string();
            }
            ItemField::Description => self.description = value.to_string(),
            ItemField::Attribute(category) => *self.attribute_mut(category) = value.to_string(),
            ItemField::Image => {
                if value.trim().is_empty() {
                    self.image = None;
                } else {
                    ensure_image_data_url(value)?;
                    self.image = Some(value.to_string());
                }
            }
            price => {
                let trimmed = value.trim();
                ensure_price(price, trimmed)?;
                let slot = match price {
                    ItemField::DistributorPrice => &mut self.distributor_price,
                    ItemField::DealerPrice => &mut self.dealer_price,
                    ItemField::AgentPrice => &mut self.agent_price,
                    ItemField::Tax => &mut self.tax,
                    ItemField::MrpPrice => &mut self.mrp_price,
                    _ => &mut self.purchase_price,
                };
                *slot = trimmed.to_string();
            }
        }
        Ok(())
    }
}

/// Editable item field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    Name,
    Description,
    Attribute(Category),
    DistributorPrice,
    DealerPrice,
    AgentPrice,
    Tax,
    MrpPrice,
    PurchasePrice,
    Image,
}

impl ItemField {
    pub const PRICES: [ItemField; 6] = [
        ItemField::DistributorPrice,
        ItemField::DealerPrice,
        ItemField::AgentPrice,
        ItemField::Tax,
        ItemField::MrpPrice,
        ItemField::PurchasePrice,
    ];

    /// JSON key of the field.
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Attribute(category) => category.ui_id(),
            Self::DistributorPrice => "distributorPrice",
            Self::DealerPrice => "dealerPrice",
            Self::AgentPrice => "agentPrice",
            Self::Tax => "tax",
            Self::MrpPrice => "mrpPrice",
            Self::PurchasePrice => "purchasePrice",
            Self::Image => "image",
        }
    }
}

impl Display for ItemField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemField {
    type Err = StoreError;

    /// Parses the exact JSON key (`name`, `mrpPrice`, `brand`, ...).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim();
        let field = match key {
            "name" => Self::Name,
            "description" => Self::Description,
            "distributorPrice" => Self::DistributorPrice,
            "dealerPrice" => Self::DealerPrice,
            "agentPrice" => Self::AgentPrice,
            "tax" => Self::Tax,
            "mrpPrice" => Self::MrpPrice,
            "purchasePrice" => Self::PurchasePrice,
            "image" => Self::Image,
            other => Category::ALL
                .into_iter()
                .find(|category| category.ui_id() == other)
                .map(Self::Attribute)
                .ok_or_else(|| StoreError::UnknownField(value.to_string()))?,
        };
        Ok(field)
    }
}

/// Form state of the item being composed.
///
/// Attribute selections hold the chosen catalog value or `""` when unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub storage: String,
    pub ram: String,
    pub distributor: String,
    pub dealer: String,
    pub agent: String,
    pub distributor_price: String,
    pub dealer_price: String,
    pub agent_price: String,
    pub tax: String,
    pub mrp_price: String,
    pub purchase_price: String,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn selection(&self, category: Category) -> &str {
        match category {
            Category::Brand => &self.brand,
            Category::Model => &self.model,
            Category::Color => &self.color,
            Category::Storage => &self.storage,
            Category::Ram => &self.ram,
            Category::Distributor => &self.distributor,
            Category::Dealer => &self.dealer,
            Category::Agent => &self.agent,
        }
    }

    /// Sets the selected value for `category`; `""` clears the selection.
    pub fn select(&mut self, category: Category, value: impl Into<String>) {
        let slot = match category {
            Category::Brand => &mut self.brand,
            Category::Model => &mut self.model,
            Category::Color => &mut self.color,
            Category::Storage => &mut self.storage,
            Category::Ram => &mut self.ram,
            Category::Distributor => &mut self.distributor,
            Category::Dealer => &mut self.dealer,
            Category::Agent => &mut self.agent,
        };
        *slot = value.into();
    }

    /// Clears every form field back to empty/unselected.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn ensure_price(field: ItemField, value: &str) -> StoreResult<()> {
    if value.is_empty() || PRICE_RE.is_match(value) {
        return Ok(());
    }
    Err(StoreError::validation(format!(
        "{field} must be a number, got `{value}`"
    )))
}

#[cfg(test)]
mod tests {
    use super::{Item, ItemDraft, ItemField};
    use crate::error::ErrorKind;
    use crate::model::category::Category;
    use chrono::{TimeZone, Utc};

    fn sample_item() -> Item {
        Item::new("Pixel 7", Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let mut item = sample_item();
        item.mrp_price = "499.99".to_string();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["mrpPrice"], "499.99");
        assert_eq!(json["dateCreated"], "2024-05-01T09:30:00Z");
        assert!(json["image"].is_null());
    }

    #[test]
    fn legacy_record_without_optional_keys_decodes() {
        let raw = r#"{
            "id": "7d5b3c56-8f0a-4d0e-9a83-0f6a8c1c2b11",
            "name": "A",
            "brand": "Acme",
            "dateCreated": "2024-05-01T09:30:00.000Z"
        }"#;
        let item: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(item.brand, "Acme");
        assert!(item.imeis.is_empty());
        assert_eq!(item.image, None);
        assert_eq!(item.description, "");
    }

    #[test]
    fn field_names_round_trip() {
        for name in ["name", "brand", "ram", "mrpPrice", "image", "description"] {
            let field: ItemField = name.parse().unwrap();
            assert_eq!(field.name(), name);
        }
        assert_eq!(
            "dateCreated".parse::<ItemField>().unwrap_err().kind(),
            ErrorKind::UnknownField
        );
    }

    #[test]
    fn set_field_validates_prices_and_name() {
        let mut item = sample_item();
        item.set_field(ItemField::Tax, " 18 ").unwrap();
        assert_eq!(item.tax, "18");

        let err = item.set_field(ItemField::Tax, "eighteen").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(item.tax, "18");

        let err = item.set_field(ItemField::Name, "   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(item.name, "Pixel 7");
    }

    #[test]
    fn empty_image_value_detaches_image() {
        let mut item = sample_item();
        item.set_field(ItemField::Image, "data:image/png;base64,AA==")
            .unwrap();
        assert!(item.image.is_some());
        item.set_field(ItemField::Image, "").unwrap();
        assert_eq!(item.image, None);
    }

    #[test]
    fn from_draft_copies_selections_and_trims_name() {
        let mut draft = ItemDraft::new("  Galaxy  ");
        draft.select(Category::Brand, "Samsung");
        draft.select(Category::Agent, "North");
        draft.purchase_price = "300".to_string();

        let item = Item::from_draft(&draft, vec!["1".to_string()], None, Utc::now());
        assert_eq!(item.name, "Galaxy");
        assert_eq!(item.attribute(Category::Brand), "Samsung");
        assert_eq!(item.attribute(Category::Agent), "North");
        assert_eq!(item.purchase_price, "300");
        assert_eq!(item.imeis, vec!["1"]);
        item.validate().unwrap();
    }

    #[test]
    fn validate_rejects_duplicate_imeis() {
        let mut item = sample_item();
        item.imeis = vec!["1".to_string(), "1".to_string()];
        assert_eq!(item.validate().unwrap_err().kind(), ErrorKind::Duplicate);
    }
}

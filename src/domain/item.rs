//! Item Entity
//!
//! A single line on a shopping list.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce;
use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique within its list
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub is_done: bool,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity: None,
            unit: None,
            note: None,
            is_done: false,
        }
    }

    /// Coerce a raw record into the canonical item shape
    pub fn normalize(raw: &Value) -> Self {
        Self {
            id: coerce::text(raw.get("id")),
            name: coerce::text(raw.get("name")),
            quantity: raw.get("quantity").and_then(coerce::number),
            unit: coerce::non_empty(raw.get("unit")),
            note: coerce::non_empty(raw.get("note")),
            is_done: raw.get("isDone").map(coerce::truthy).unwrap_or(false),
        }
    }
}

impl Entity for Item {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Unvalidated input for a new item, as typed into a form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    /// Raw quantity text, parsed when the item is built
    pub quantity: String,
    pub unit: String,
    pub note: String,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Build the item, or None when the name is blank
    ///
    /// Quantity text that is blank or not a number leaves the quantity unset.
    pub fn into_item(self, id: String) -> Option<Item> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Item {
            id,
            name: name.to_string(),
            quantity: coerce::parse_number(&self.quantity),
            unit: blank_to_none(self.unit),
            note: blank_to_none(self.note),
            is_done: false,
        })
    }
}

fn blank_to_none(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

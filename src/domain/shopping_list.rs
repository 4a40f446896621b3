//! Shopping List Entity
//!
//! A named list of items shared between an owner and its members.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce;
use super::entity::{DomainResult, Entity};
use super::item::Item;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: String,
    pub title: String,
    /// The user that created the list
    pub owner: String,
    /// Invited users, the owner is implicit
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub archived: bool,
}

impl ShoppingList {
    /// Create an empty, active list
    pub fn new(id: impl Into<String>, title: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            owner: owner.into(),
            members: Vec::new(),
            items: Vec::new(),
            archived: false,
        }
    }

    /// Coerce a raw record into the canonical list shape
    ///
    /// Never fails: missing or mistyped fields fall back to empty values.
    pub fn normalize(raw: &Value) -> Self {
        let members = match raw.get("members") {
            Some(Value::Array(members)) => members
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        let items = match raw.get("items") {
            Some(Value::Array(items)) => items.iter().map(Item::normalize).collect(),
            _ => Vec::new(),
        };

        Self {
            id: coerce::text(raw.get("id")),
            title: coerce::text(raw.get("title")),
            owner: coerce::text(raw.get("owner")),
            members,
            items,
            archived: raw.get("archived").map(coerce::truthy).unwrap_or(false),
        }
    }

    /// Normalize a raw collection, anything but an array is empty
    pub fn normalize_all(raw: &Value) -> Vec<Self> {
        match raw {
            Value::Array(lists) => lists.iter().map(Self::normalize).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_owned_by(&self, user: &str) -> bool {
        self.owner == user
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    /// Owner or member
    pub fn is_visible_to(&self, user: &str) -> bool {
        self.is_owned_by(user) || self.has_member(user)
    }

    /// Apply a partial update and the store's answer to it
    ///
    /// Precedence is response > patch > current values.
    pub fn merged(&self, patch: &ListPatch, response: &Value) -> DomainResult<Self> {
        let mut record = serde_json::to_value(self)?;
        coerce::overlay(&mut record, &serde_json::to_value(patch)?);
        coerce::overlay(&mut record, response);
        Ok(Self::normalize(&record))
    }

    pub fn done_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_done).count()
    }
}

impl Entity for ShoppingList {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial update body, absent fields are left untouched by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl ListPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn members(members: Vec<String>) -> Self {
        Self {
            members: Some(members),
            ..Default::default()
        }
    }

    pub fn items(items: Vec<Item>) -> Self {
        Self {
            items: Some(items),
            ..Default::default()
        }
    }

    pub fn archived(archived: bool) -> Self {
        Self {
            archived: Some(archived),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.members.is_none() && self.items.is_none() && self.archived.is_none()
    }
}

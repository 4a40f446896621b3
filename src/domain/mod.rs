//! Domain Layer
//!
//! Shopping lists, their items and the coercions that turn raw store records
//! into the canonical in-memory shape.

mod coerce;
mod entity;
mod id;
mod item;
mod shopping_list;

pub use entity::{find_by_id, remove_by_id, replace_by_id, DomainError, DomainResult, Entity};
pub use id::new_id;
pub use item::{Item, ItemDraft};
pub use shopping_list::{ListPatch, ShoppingList};

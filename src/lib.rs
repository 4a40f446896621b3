//! Shopping List Core
//!
//! Layered architecture:
//! - domain: Lists, items and the normalization of raw store records
//! - repository: Remote list store and local mirror abstractions
//! - store: Collection state and its mutation helpers
//! - manager: List collection and per-list item managers
//! - actions: User intents with prompts and confirmations

pub mod actions;
pub mod config;
pub mod context;
pub mod domain;
pub mod manager;
pub mod prompt;
pub mod repository;
pub mod store;

pub use actions::{ActionOutcome, ListAction, ListActions};
pub use config::AppConfig;
pub use context::AppContext;
pub use domain::{DomainError, DomainResult, Item, ItemDraft, ListPatch, ShoppingList};
pub use manager::{ListItems, ShoppingLists};
pub use prompt::{NotificationLog, Notifier, Prompter};

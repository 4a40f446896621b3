//! Repository Layer - Core Traits

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{DomainResult, ListPatch, ShoppingList};

/// The authoritative store of shopping lists
///
/// Records come back raw; normalizing them is the caller's job.
#[async_trait]
pub trait RemoteListStore: Send + Sync {
    /// All list records
    async fn fetch_all(&self) -> DomainResult<Vec<Value>>;

    /// One list record by ID
    async fn fetch_one(&self, id: &str) -> DomainResult<Value>;

    /// Create a list, returns the stored record
    async fn create(&self, list: &ShoppingList) -> DomainResult<Value>;

    /// Partially update a list, returns the updated record (possibly partial)
    async fn update(&self, id: &str, patch: &ListPatch) -> DomainResult<Value>;

    /// Delete a list by ID
    async fn delete(&self, id: &str) -> DomainResult<()>;
}

/// Local persistent key-value cache with string slots
pub trait LocalMirror: Send + Sync {
    fn read(&self, key: &str) -> DomainResult<Option<String>>;

    fn write(&self, key: &str, value: &str) -> DomainResult<()>;

    fn remove(&self, key: &str) -> DomainResult<()>;
}

//! Domain Layer - Core Entity Trait
//!
//! Every entity has a string identifier. The helpers below operate on ordered
//! collections of entities and are shared by lists and items.

use thiserror::Error;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// Returns the entity's unique identifier
    fn id(&self) -> &str;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The store could not be reached at all
    #[error("Network error: {0}")]
    Transport(String),
    /// The store answered with a non-success status
    #[error("{context}: {detail}")]
    Http {
        context: String,
        status: u16,
        detail: String,
    },
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    /// Failures of the remote store, as opposed to rejected user input
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            DomainError::Transport(_) | DomainError::Http { .. } | DomainError::Decode(_)
        )
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Decode(e.to_string())
    }
}

pub fn find_by_id<'a, T: Entity>(entities: &'a [T], id: &str) -> Option<&'a T> {
    entities.iter().find(|entity| entity.id() == id)
}

/// Replace the entity with the same ID, returns false if none matched
pub fn replace_by_id<T: Entity>(entities: &mut [T], updated: T) -> bool {
    match entities.iter_mut().find(|entity| entity.id() == updated.id()) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

/// Remove every entity with the given ID, returns false if none matched
pub fn remove_by_id<T: Entity>(entities: &mut Vec<T>, id: &str) -> bool {
    let before = entities.len();
    entities.retain(|entity| entity.id() != id);
    entities.len() != before
}

//! In-Memory List Store
//!
//! Behaves like the json-server backend the client talks to: records are kept
//! as raw JSON, PATCH merges keys and answers with the full record. Seeded from
//! a `{ "shoppingLists": [...] }` fixture for mock mode, optionally backed by a
//! database file that every successful write rewrites.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use super::traits::RemoteListStore;
use crate::domain::{DomainError, DomainResult, ListPatch, ShoppingList};

pub struct MemoryListStore {
    lists: Mutex<Vec<Value>>,
    writes: AtomicUsize,
    db_path: Option<PathBuf>,
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_fixture(json: &str) -> DomainResult<Vec<Value>> {
    let document: Value = serde_json::from_str(json)?;
    match document {
        Value::Array(lists) => Ok(lists),
        Value::Object(mut root) => match root.remove("shoppingLists") {
            Some(Value::Array(lists)) => Ok(lists),
            _ => Err(DomainError::Decode(
                "fixture has no shoppingLists array".to_string(),
            )),
        },
        _ => Err(DomainError::Decode("fixture is not an object".to_string())),
    }
}

impl MemoryListStore {
    pub fn new(lists: Vec<Value>) -> Self {
        Self {
            lists: Mutex::new(lists),
            writes: AtomicUsize::new(0),
            db_path: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Parse a fixture document, either `{ "shoppingLists": [...] }` or a bare array
    pub fn from_fixture(json: &str) -> DomainResult<Self> {
        Ok(Self::new(parse_fixture(json)?))
    }

    /// Store kept in `db_path`, seeded from `seed` the first time
    ///
    /// The file is only created by the first successful write.
    pub fn persistent(db_path: impl Into<PathBuf>, seed: &str) -> DomainResult<Self> {
        let db_path = db_path.into();
        let lists = match std::fs::read_to_string(&db_path) {
            Ok(contents) => {
                log::info!("Mock store loaded from {}", db_path.display());
                parse_fixture(&contents)?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => parse_fixture(seed)?,
            Err(e) => {
                return Err(DomainError::Storage(format!(
                    "read {}: {}",
                    db_path.display(),
                    e
                )))
            }
        };
        Ok(Self {
            db_path: Some(db_path),
            ..Self::new(lists)
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Snapshot of the stored records
    pub async fn records(&self) -> Vec<Value> {
        self.lists.lock().await.clone()
    }

    /// Number of successful create/update/delete calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn not_found(id: &str) -> DomainError {
        DomainError::NotFound(format!("list {}", id))
    }

    /// Write the database file, if any, before `next` becomes the stored state
    fn commit(&self, lists: &mut Vec<Value>, next: Vec<Value>) -> DomainResult<()> {
        if let Some(path) = &self.db_path {
            let document = serde_json::to_string_pretty(&json!({ "shoppingLists": next }))?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DomainError::Storage(format!("create {}: {}", parent.display(), e))
                })?;
            }
            std::fs::write(path, document)
                .map_err(|e| DomainError::Storage(format!("write {}: {}", path.display(), e)))?;
        }
        *lists = next;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl RemoteListStore for MemoryListStore {
    async fn fetch_all(&self) -> DomainResult<Vec<Value>> {
        Ok(self.lists.lock().await.clone())
    }

    async fn fetch_one(&self, id: &str) -> DomainResult<Value> {
        let lists = self.lists.lock().await;
        lists
            .iter()
            .find(|record| record_id(record).as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, list: &ShoppingList) -> DomainResult<Value> {
        let record = serde_json::to_value(list)?;
        let mut lists = self.lists.lock().await;
        if lists.iter().any(|r| record_id(r).as_deref() == Some(list.id.as_str())) {
            return Err(DomainError::Conflict(format!("list {} already exists", list.id)));
        }
        let mut next = lists.clone();
        next.push(record.clone());
        self.commit(&mut lists, next)?;
        Ok(record)
    }

    async fn update(&self, id: &str, patch: &ListPatch) -> DomainResult<Value> {
        let changes = serde_json::to_value(patch)?;
        let mut lists = self.lists.lock().await;
        let mut next = lists.clone();
        let record = next
            .iter_mut()
            .find(|record| record_id(record).as_deref() == Some(id))
            .ok_or_else(|| Self::not_found(id))?;

        if let (Value::Object(record), Value::Object(changes)) = (&mut *record, changes) {
            record.extend(changes);
        }
        let updated = record.clone();
        self.commit(&mut lists, next)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut lists = self.lists.lock().await;
        let next: Vec<Value> = lists
            .iter()
            .filter(|record| record_id(record).as_deref() != Some(id))
            .cloned()
            .collect();
        if next.len() == lists.len() {
            return Err(Self::not_found(id));
        }
        self.commit(&mut lists, next)
    }
}

//! Local Mirror Implementations

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::traits::LocalMirror;
use crate::domain::{DomainError, DomainResult};

/// One `<key>.json` file per slot inside a data directory
pub struct FileMirror {
    dir: PathBuf,
}

impl FileMirror {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl LocalMirror for FileMirror {
    fn read(&self, key: &str) -> DomainResult<Option<String>> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Storage(format!("read {}: {}", key, e))),
        }
    }

    fn write(&self, key: &str, value: &str) -> DomainResult<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| DomainError::Storage(format!("create {}: {}", self.dir.display(), e)))?;
        std::fs::write(self.slot_path(key), value)
            .map_err(|e| DomainError::Storage(format!("write {}: {}", key, e)))
    }

    fn remove(&self, key: &str) -> DomainResult<()> {
        match std::fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Storage(format!("remove {}: {}", key, e))),
        }
    }
}

/// Process-local mirror
#[derive(Default)]
pub struct MemoryMirror {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror pre-filled with one slot
    pub fn with_slot(key: &str, value: &str) -> Self {
        let mirror = Self::new();
        if let Ok(mut slots) = mirror.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        mirror
    }
}

fn poisoned() -> DomainError {
    DomainError::Storage("mirror lock poisoned".to_string())
}

impl LocalMirror for MemoryMirror {
    fn read(&self, key: &str) -> DomainResult<Option<String>> {
        let slots = self.slots.lock().map_err(|_| poisoned())?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> DomainResult<()> {
        let mut slots = self.slots.lock().map_err(|_| poisoned())?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> DomainResult<()> {
        let mut slots = self.slots.lock().map_err(|_| poisoned())?;
        slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_mirror_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FileMirror::new(dir.path().join("data"));

        assert_eq!(mirror.read("shoppingLists").unwrap(), None);
        mirror.write("shoppingLists", "[]").unwrap();
        assert_eq!(mirror.read("shoppingLists").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data").join("shoppingLists.json").exists());

        mirror.remove("shoppingLists").unwrap();
        mirror.remove("shoppingLists").unwrap();
        assert_eq!(mirror.read("shoppingLists").unwrap(), None);
    }

    #[test]
    fn test_memory_mirror_slots() {
        let mirror = MemoryMirror::with_slot("a", "1");
        assert_eq!(mirror.read("a").unwrap().as_deref(), Some("1"));
        assert_eq!(mirror.read("b").unwrap(), None);
        mirror.write("a", "2").unwrap();
        assert_eq!(mirror.read("a").unwrap().as_deref(), Some("2"));
    }
}

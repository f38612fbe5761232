//! Persistence collaborators.
//!
//! The in-memory document is authoritative; a store is a best-effort mirror.
//! Callers log save failures instead of rolling edits back.

use crate::document::{self, DocumentError};
use crate::model::SchemaGraph;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Stored document is invalid: {0}")]
    Document(#[from] DocumentError),
    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Store callback failed: {0}")]
    Callback(String),
}

pub trait DocumentStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<SchemaGraph>, StoreError>;
    fn save(&self, graph: &SchemaGraph) -> Result<(), StoreError>;
}

/// A JSON file on the local disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl DocumentStore for FileStore {
    fn load(&self) -> Result<Option<SchemaGraph>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        Ok(Some(document::parse(&text)?))
    }

    fn save(&self, graph: &SchemaGraph) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let text = document::to_pretty_json(graph)?;
        fs::write(&self.path, text).map_err(|e| self.io_error(e))
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    saved: Option<SchemaGraph>,
    save_count: usize,
    fail_saves: bool,
}

/// In-process store. Clones share state, so a test can hand one clone to
/// the editor and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(graph: SchemaGraph) -> Self {
        let store = Self::default();
        store.state.borrow_mut().saved = Some(graph);
        store
    }

    pub fn saved(&self) -> Option<SchemaGraph> {
        self.state.borrow().saved.clone()
    }

    pub fn save_count(&self) -> usize {
        self.state.borrow().save_count
    }

    /// Make every later save fail, simulating an unreachable store.
    pub fn fail_saves(&self, fail: bool) {
        self.state.borrow_mut().fail_saves = fail;
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Option<SchemaGraph>, StoreError> {
        Ok(self.state.borrow().saved.clone())
    }

    fn save(&self, graph: &SchemaGraph) -> Result<(), StoreError> {
        let mut state = self.state.borrow_mut();
        if state.fail_saves {
            return Err(StoreError::Callback("memory store is read-only".to_string()));
        }
        state.saved = Some(graph.clone());
        state.save_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;

    fn sample() -> SchemaGraph {
        SchemaGraph {
            tables: vec![Table::new("users")],
            ..Default::default()
        }
    }

    #[test]
    fn test_file_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("graph.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("graph.json"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n  \"tables\""));
    }

    #[test]
    fn test_file_store_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, r#"{ "tables": [] }"#).unwrap();

        let err = FileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Document(DocumentError::MissingField("relations"))));
    }

    #[test]
    fn test_memory_store_shares_state() {
        let store = MemoryStore::new();
        let observer = store.clone();

        store.save(&sample()).unwrap();
        assert_eq!(observer.save_count(), 1);
        assert_eq!(observer.saved(), Some(sample()));

        observer.fail_saves(true);
        assert!(store.save(&sample()).is_err());
        assert_eq!(observer.save_count(), 1);
    }
}

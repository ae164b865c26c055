//! Item Persistence
//!
//! Items live in a single JSON array file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Todo, TodoError};

/// JSON file store for to-do items
#[derive(Debug, Clone)]
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved items, or an empty list when the file is missing or unreadable
    pub fn load(&self) -> Vec<Todo> {
        match self.try_load() {
            Ok(items) => {
                tracing::debug!("loaded {} items from {}", items.len(), self.path.display());
                items
            }
            Err(err) => {
                tracing::warn!("ignoring saved items in {}: {}", self.path.display(), err);
                Vec::new()
            }
        }
    }

    /// Read the file; a missing file is an empty list
    pub fn try_load(&self) -> Result<Vec<Todo>, TodoError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, items: &[Todo]) -> Result<(), TodoError> {
        let json = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> TodoStore {
        let path = std::env::temp_dir().join(format!("wren-store-{}-{}.json", std::process::id(), name));
        let _ = fs::remove_file(&path);
        TodoStore::new(path)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = temp_store("missing");
        assert!(store.try_load().unwrap().is_empty());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = temp_store("save");
        let items = vec![
            Todo {
                id: 0,
                text: "Buy milk".into(),
                completed: false,
            },
            Todo {
                id: 3,
                text: "Walk “dog”".into(),
                completed: true,
            },
        ];
        store.save(&items).unwrap();
        assert_eq!(store.load(), items);
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let store = temp_store("corrupt");
        fs::write(store.path(), "[{\"id\": ").unwrap();
        assert!(matches!(store.try_load(), Err(TodoError::Json(_))));
        assert!(store.load().is_empty());
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let store = TodoStore::new(std::env::temp_dir().join("wren-no-such-dir").join("items.json"));
        assert!(matches!(store.save(&[]), Err(TodoError::Io(_))));
    }
}

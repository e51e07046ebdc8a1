//! Local persistent key-value storage.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::StoreError;

/// String-keyed, string-valued persistent storage.
pub trait KeyValueStore {
    /// Stores `value` under `key`, overwriting any previous value.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    /// Reads the value under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// In-memory store without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }
}

/// Store backed by a single JSON object file.
///
/// The file is read and rewritten whole on every `set`. A missing file is
/// an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let mut map = self.load()?;
        map.insert(key.to_string(), Value::String(value));
        let body = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .load()?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}

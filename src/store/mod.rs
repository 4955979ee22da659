//! Persistence for the imported dataset.
//!
//! The store is deliberately opaque: a string-keyed, string-valued map. The
//! dataset itself lives in a single slot (`salesData`) that every import
//! overwrites wholesale; there is no merging or versioning.

use std::collections::HashMap;
use std::fs::create_dir_all;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::domain::SalesRecord;
use crate::error::AppError;

/// Fixed key under which the most recent import is kept.
pub const DATASET_KEY: &str = "salesData";

/// Minimal key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::input(format!("Failed to read '{}': {e}", path.display()))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        create_dir_all(&self.dir).map_err(|e| {
            AppError::input(format!("Failed to create store dir '{}': {e}", self.dir.display()))
        })?;

        // Temp file in the same dir, renamed over the target.
        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| AppError::input(format!("Failed to create temp file in '{}': {e}", self.dir.display())))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| AppError::input(format!("Failed to write '{}': {e}", path.display())))?;
        tmp.persist(&path)
            .map_err(|e| AppError::input(format!("Failed to replace '{}': {e}", path.display())))?;

        debug!(path = %path.display(), bytes = value.len(), "stored value");
        Ok(())
    }
}

/// In-memory store, handy for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Single-slot register holding the last imported record set.
///
/// The import flow is the only writer; display flows only read.
#[derive(Debug, Clone)]
pub struct DatasetSlot<S> {
    store: S,
}

impl<S: KeyValueStore> DatasetSlot<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Overwrite the slot with `records`.
    pub fn replace(&mut self, records: &[SalesRecord]) -> Result<(), AppError> {
        let json = serde_json::to_string(records)
            .map_err(|e| AppError::input(format!("Failed to serialize dataset: {e}")))?;
        self.store.set(DATASET_KEY, &json)
    }

    /// Read the slot. Unreadable contents count as an empty slot.
    pub fn load(&self) -> Result<Option<Vec<SalesRecord>>, AppError> {
        let Some(text) = self.store.get(DATASET_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Vec<SalesRecord>>(&text) {
            Ok(records) => Ok(Some(records)),
            Err(e) => {
                warn!(error = %e, "stored dataset is not readable; treating as empty");
                Ok(None)
            }
        }
    }
}

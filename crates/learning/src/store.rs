//! Persistence sink/source for the value table.
//!
//! The table is always written and read wholesale as one JSON object; there
//! is no incremental format.

use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{LearningError, Result};
use crate::table::ValueTable;

/// Where the table lives between restarts.
pub trait TableStore: Send + Sync {
    /// Read the whole table. A store that has never been written returns an
    /// empty table; unreadable or corrupt data is an error.
    fn load(&self) -> Result<ValueTable>;

    /// Replace the stored table with `table`.
    fn save(&self, table: &ValueTable) -> Result<()>;

    /// Short description for log lines.
    fn describe(&self) -> String;
}

/// Reject tables that JSON cannot carry. serde_json writes NaN and infinities
/// as `null`, which would then fail to load.
fn ensure_encodable(table: &ValueTable) -> Result<()> {
    match table.first_non_finite() {
        Some(key) => Err(LearningError::NonFiniteValue(key.clone())),
        None => Ok(()),
    }
}

// =============================================================================
// JsonFileStore
// =============================================================================

/// Table stored as a JSON file on disk.
///
/// Saves write a sibling `.tmp` file and rename it over the target, so a
/// crash mid-save leaves the previous table intact.
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

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TableStore for JsonFileStore {
    fn load(&self) -> Result<ValueTable> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no saved table, starting empty");
            return Ok(ValueTable::new());
        }
        let text = fs::read_to_string(&self.path)?;
        let table: ValueTable = serde_json::from_str(&text)?;
        debug!(path = %self.path.display(), states = table.len(), "table read");
        Ok(table)
    }

    fn save(&self, table: &ValueTable) -> Result<()> {
        ensure_encodable(table)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(table)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), states = table.len(), "table written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// Store that keeps the serialized table in memory. Used by tests and for
/// running without a disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    json: Mutex<Option<String>>,
    fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose loads and saves always fail.
    pub fn failing() -> Self {
        Self {
            json: Mutex::new(None),
            fail: true,
        }
    }

    /// A store pre-filled with raw JSON, as if a previous run had saved it.
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Mutex::new(Some(json.into())),
            fail: false,
        }
    }

    /// The last saved JSON, if any.
    pub fn contents(&self) -> Option<String> {
        self.json.lock().clone()
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(LearningError::Io(std::io::Error::other(
                "memory store configured to fail",
            )));
        }
        Ok(())
    }
}

impl TableStore for MemoryStore {
    fn load(&self) -> Result<ValueTable> {
        self.check()?;
        match self.json.lock().as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(ValueTable::new()),
        }
    }

    fn save(&self, table: &ValueTable) -> Result<()> {
        self.check()?;
        ensure_encodable(table)?;
        *self.json.lock() = Some(serde_json::to_string(table)?);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use types::StateKey;

    fn sample_table() -> ValueTable {
        let mut table = ValueTable::new();
        *table.ensure(&StateKey::from("3|0|0|1|0")) = [0.12, 0.0, -0.5, 0.0, 1.25, 0.0];
        *table.ensure(&StateKey::from("0|1|4|0|1")) = [0.0, 0.3, 0.0, 0.0, 0.0, -2.0];
        table
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_persist_then_reload() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/dir/qtable.json"));
        let table = sample_table();

        store.save(&table).unwrap();
        assert!(store.path().exists());
        assert!(!store.temp_path().exists());

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_file_store_overwrites_wholesale() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("qtable.json"));
        store.save(&sample_table()).unwrap();

        let mut smaller = ValueTable::new();
        smaller.ensure(&StateKey::from("1|1|1|1|1"));
        store.save(&smaller).unwrap();

        assert_eq!(store.load().unwrap(), smaller);
    }

    #[test]
    fn test_file_store_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("qtable.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(LearningError::Serde(_))));
    }

    #[test]
    fn test_non_finite_table_not_written() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("qtable.json"));
        store.save(&sample_table()).unwrap();

        let mut bad = sample_table();
        bad.ensure(&StateKey::from("3|0|0|1|0"))[0] = f64::INFINITY;
        bad.ensure(&StateKey::from("4|4|4|1|1"))[2] = f64::NAN;
        assert!(matches!(
            store.save(&bad),
            Err(LearningError::NonFiniteValue(_))
        ));

        // previous good table is still on disk and loads
        assert_eq!(store.load().unwrap(), sample_table());
        assert!(!store.temp_path().exists());

        let memory = MemoryStore::new();
        assert!(memory.save(&bad).is_err());
        assert_eq!(memory.contents(), None);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        store.save(&sample_table()).unwrap();
        assert_eq!(store.load().unwrap(), sample_table());
        assert!(store.contents().unwrap().contains("3|0|0|1|0"));
    }

    #[test]
    fn test_failing_memory_store() {
        let store = MemoryStore::failing();
        assert!(store.load().is_err());
        assert!(store.save(&sample_table()).is_err());
    }
}

//! Cart persistence port and stores.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartItem;

/// Current snapshot format version.
pub const CART_SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of a cart as written to a [`CartStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Cart items in insertion order
    pub items: Vec<CartItem>,
}

impl CartSnapshot {
    /// Snapshot the given items at the current format version.
    pub fn new(items: Vec<CartItem>) -> Self {
        Self {
            version: CART_SNAPSHOT_VERSION,
            items,
        }
    }
}

/// Errors raised by cart stores.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Reading or writing the backing medium failed.
    #[error("cart store i/o failed: {0}")]
    Io(#[from] io::Error),

    /// The snapshot could not be encoded or decoded.
    #[error("cart snapshot is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store cannot be used right now.
    #[error("cart store unavailable: {0}")]
    Unavailable(String),
}

/// Read/write port for a serialized cart snapshot.
pub trait CartStore {
    /// Read the stored snapshot, or `None` when nothing has been written yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or holds malformed data.
    fn read(&self) -> Result<Option<CartSnapshot>, CartStoreError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn write(&self, snapshot: &CartSnapshot) -> Result<(), CartStoreError>;
}

/// In-process store holding the serialized snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    contents: Mutex<Option<String>>,
    failing: bool,
}

impl MemoryCartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose reads and writes always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            contents: Mutex::new(None),
            failing: true,
        }
    }

    /// Create a store pre-loaded with raw serialized contents.
    #[must_use]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
            failing: false,
        }
    }

    /// Raw serialized contents, if any were written.
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .ok()
            .and_then(|contents| contents.clone())
    }

    fn check(&self) -> Result<(), CartStoreError> {
        if self.failing {
            return Err(CartStoreError::Unavailable(
                "memory store configured to fail".to_string(),
            ));
        }

        Ok(())
    }
}

impl CartStore for MemoryCartStore {
    fn read(&self) -> Result<Option<CartSnapshot>, CartStoreError> {
        self.check()?;

        let contents = self
            .contents
            .lock()
            .map_err(|_poisoned| CartStoreError::Unavailable("lock poisoned".to_string()))?;

        contents
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(CartStoreError::from)
    }

    fn write(&self, snapshot: &CartSnapshot) -> Result<(), CartStoreError> {
        self.check()?;

        let encoded = serde_json::to_string(snapshot)?;

        let mut contents = self
            .contents
            .lock()
            .map_err(|_poisoned| CartStoreError::Unavailable("lock poisoned".to_string()))?;

        *contents = Some(encoded);

        Ok(())
    }
}

/// Store keeping the snapshot as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    path: PathBuf,
}

impl FileCartStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStore for FileCartStore {
    fn read(&self) -> Result<Option<CartSnapshot>, CartStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn write(&self, snapshot: &CartSnapshot) -> Result<(), CartStoreError> {
        let encoded = serde_json::to_vec_pretty(snapshot)?;

        // Write beside the target and rename so readers never see a torn file.
        let staging = self.path.with_extension("tmp");

        fs::write(&staging, encoded)?;
        fs::rename(&staging, &self.path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn snapshot() -> CartSnapshot {
        CartSnapshot::new(vec![CartItem {
            font_id: "regular".to_string(),
            typeface_slug: "grotesk".to_string(),
            studio_id: "studio-1".to_string(),
            studio_slug: "north-type".to_string(),
            price: 12_00,
        }])
    }

    #[test]
    fn memory_store_starts_empty() -> TestResult {
        assert_eq!(MemoryCartStore::new().read()?, None);

        Ok(())
    }

    #[test]
    fn memory_store_returns_what_was_written() -> TestResult {
        let store = MemoryCartStore::new();

        store.write(&snapshot())?;

        assert_eq!(store.read()?, Some(snapshot()));

        Ok(())
    }

    #[test]
    fn memory_store_reports_malformed_contents() {
        let store = MemoryCartStore::with_contents("{not json");

        assert!(matches!(
            store.read(),
            Err(CartStoreError::Serialization(_))
        ));
    }

    #[test]
    fn failing_store_errors_on_read_and_write() {
        let store = MemoryCartStore::failing();

        assert!(matches!(store.read(), Err(CartStoreError::Unavailable(_))));
        assert!(matches!(
            store.write(&snapshot()),
            Err(CartStoreError::Unavailable(_))
        ));
    }

    #[test]
    fn file_store_missing_file_reads_as_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileCartStore::new(dir.path().join("cart.json"));

        assert_eq!(store.read()?, None);

        Ok(())
    }

    #[test]
    fn file_store_persists_between_instances() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cart.json");

        FileCartStore::new(&path).write(&snapshot())?;

        assert_eq!(FileCartStore::new(&path).read()?, Some(snapshot()));

        Ok(())
    }
}

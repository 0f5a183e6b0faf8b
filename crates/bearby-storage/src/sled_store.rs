//! Durable [`Storage`] backend on sled.
//!
//! Every mutation is followed by a flush, so an acknowledged write
//! survives a crash of the process.

use std::path::Path;

use bearby_types::{BearbyError, Result};

use crate::Storage;

/// sled tree holding all wallet records.
const TREE_NAME: &str = "bearby";

/// Durable key-value store backed by a single sled tree.
pub struct SledStorage {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledStorage {
    /// Opens (or creates) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BearbyError::StorageError`] if the database or its tree
    /// cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path).map_err(|e| BearbyError::StorageError {
            reason: format!("failed to open sled database at {}: {e}", path.display()),
        })?;
        tracing::debug!(path = %path.display(), "opened sled storage");
        Self::from_db(db)
    }

    /// Opens a database that is deleted when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BearbyError::StorageError`] if sled fails to start.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| BearbyError::StorageError {
                reason: format!("failed to open temporary sled database: {e}"),
            })?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let tree = db.open_tree(TREE_NAME).map_err(|e| BearbyError::StorageError {
            reason: format!("failed to open tree '{TREE_NAME}': {e}"),
        })?;
        Ok(Self { db, tree })
    }

    /// Flushes all pending writes to disk.
    ///
    /// # Errors
    ///
    /// Returns [`BearbyError::StorageError`] if the flush fails.
    pub fn flush(&self) -> Result<()> {
        self.db.flush().map_err(|e| BearbyError::StorageError {
            reason: format!("failed to flush database: {e}"),
        })?;
        Ok(())
    }
}

fn sled_error(op: &str, key: &str, e: sled::Error) -> BearbyError {
    BearbyError::StorageError {
        reason: format!("{op} '{key}' failed: {e}"),
    }
}

impl Storage for SledStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .tree
            .get(key.as_bytes())
            .map_err(|e| sled_error("get", key, e))?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.tree
            .insert(key.as_bytes(), value)
            .map_err(|e| sled_error("set", key, e))?;
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.tree
            .remove(key.as_bytes())
            .map_err(|e| sled_error("remove", key, e))?;
        self.flush()
    }

    fn clear(&self) -> Result<()> {
        self.tree.clear().map_err(|e| sled_error("clear", TREE_NAME, e))?;
        self.flush()
    }
}

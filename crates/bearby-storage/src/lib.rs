//! Key-value storage collaborator for the Bearby wallet core.
//!
//! The core persists a handful of small records (encrypted vault,
//! account ledger, network configuration) as opaque byte blobs under
//! string keys. Any backend implementing [`Storage`] can hold them;
//! two are provided:
//!
//! - [`MemoryStorage`] — process-local map for tests and ephemeral runs.
//! - [`SledStorage`] — durable sled database, flushed after every write.
//!
//! A call that returns `Ok` is durable for the backend's notion of
//! durability. Namespacing is owned by the caller; see [`keys`].

pub mod keys;
pub mod memory;
pub mod sled_store;

use bearby_types::{BearbyError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use memory::MemoryStorage;
pub use sled_store::SledStorage;

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Byte-blob store with get/set/remove/clear.
pub trait Storage: Send + Sync {
    /// Returns the value at `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` at `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Removes every key.
    fn clear(&self) -> Result<()>;

    /// Returns `true` if `key` holds a value.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

/// Reads and deserializes a JSON record.
///
/// # Errors
///
/// Returns `StorageError` if the backend fails or the stored bytes are
/// not a valid `T`.
pub fn read_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<T>> {
    match storage.get(key)? {
        Some(raw) => serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| BearbyError::StorageError {
                reason: format!("corrupt record '{key}': {e}"),
            }),
        None => Ok(None),
    }
}

/// Serializes `value` as JSON and stores it at `key`.
///
/// # Errors
///
/// Returns `StorageError` if serialization or the write fails.
pub fn write_json<T: Serialize + ?Sized>(storage: &dyn Storage, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_vec(value).map_err(|e| BearbyError::StorageError {
        reason: format!("failed to encode record '{key}': {e}"),
    })?;
    storage.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn json_helpers_roundtrip() -> std::result::Result<(), BearbyError> {
        let storage = MemoryStorage::new();
        let mut record = BTreeMap::new();
        record.insert("mainnet".to_string(), 3u32);

        write_json(&storage, "record", &record)?;
        let back: Option<BTreeMap<String, u32>> = read_json(&storage, "record")?;
        assert_eq!(back, Some(record));
        Ok(())
    }

    #[test]
    fn missing_record_is_none() -> std::result::Result<(), BearbyError> {
        let storage = MemoryStorage::new();
        let value: Option<u32> = read_json(&storage, "absent")?;
        assert!(value.is_none());
        assert!(!storage.contains("absent")?);
        Ok(())
    }

    #[test]
    fn corrupt_record_is_storage_error() -> std::result::Result<(), BearbyError> {
        let storage = MemoryStorage::new();
        storage.set("record", b"{not json")?;
        let result: Result<Option<u32>> = read_json(&storage, "record");
        assert!(matches!(result, Err(BearbyError::StorageError { .. })));
        Ok(())
    }
}

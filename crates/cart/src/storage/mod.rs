//! Local key-value persistence for the cart.
//!
//! The cart occupies a single slot (one key) holding its encoded snapshot.
//! Writes are last-write-wins; there is no locking across processes.
//!
//! - [`FileKv`] - all keys in one JSON file on disk
//! - [`MemoryKv`] - process-local map, for tests

mod file;
mod memory;

pub use file::FileKv;
pub use memory::MemoryKv;

use std::sync::Arc;

use thiserror::Error;

/// Errors from the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("Storage file is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Durable single-key storage used to survive process restarts.
pub trait PersistentKv: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: PersistentKv + ?Sized> PersistentKv for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

//! Error types for the storage engine.

use crate::types::PageId;
use thiserror::Error;

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur in the storage engine.
///
/// `KeyNotFound`-style "not found" and duplicate-key-on-insert are not
/// represented here at all: both are ordinary, successful outcomes
/// (`search` returns `None`, `insert` silently overwrites) and never
/// produce a `StorageError`. Every variant below is fatal to the
/// operation that raised it.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error from the underlying file system.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Buffer pool has no free or unpinned frame to satisfy a fetch.
    ///
    /// Every pinned page is a guard still in scope somewhere; this
    /// indicates either a pool sized too small for the working set or a
    /// pin leak, never ordinary backpressure.
    #[error("buffer pool exhausted: all frames pinned")]
    PoolExhausted,

    /// On-disk structure violates an invariant the tree relies on:
    /// an out-of-range child pointer, a leaf-chain cycle, a node whose
    /// decoded size exceeds its capacity, or a depth bound exceeded
    /// while descending (see spec's leaf-chain walk safety bound).
    #[error("structural corruption: {0}")]
    Corruption(String),
}

impl StorageError {
    /// Create a corruption error with a message.
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }
}

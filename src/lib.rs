//! # bptree-kv
//!
//! An embedded, single-writer, paged B+ tree key/value index. Keys are
//! 32-bit integers derived from item names (see [`btree::key`]); values
//! are fixed-width [`Record`]s. Leaves carry an embedded Bloom filter so
//! a miss can usually be rejected without a linear scan of the leaf.
//!
//! ## Architecture
//!
//! - **Page layer** (`page`): fixed, non-slotted node layout, one node per page
//! - **Storage layer** (`storage`): paged file I/O and the tree header
//! - **Buffer pool** (`buffer`): fixed-size frame array, first-fit eviction
//! - **B+ tree layer** (`btree`): insert/split, delete/borrow/merge, range scans
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bptree_kv::{Db, Config, Record};
//!
//! let db = Db::open(Config::new("items.db"))?;
//! db.put("Banana", Record::new("Banana", 1, 105, 0.30))?;
//! let found = db.get("Banana")?;
//! db.delete("Banana")?;
//! ```

pub mod bloom;
pub mod btree;
pub mod buffer;
pub mod error;
pub mod food;
pub mod page;
pub mod record;
pub mod storage;
pub mod types;

pub use btree::{key::alphabetical_key32, BTree};
pub use buffer::{BufferPool, BufferPoolImpl};
pub use error::{Result, StorageError};
pub use record::Record;
pub use storage::{DiskManager, DiskManagerImpl};
pub use types::{BTreeConfig, PageId, PAGE_SIZE};

use std::path::PathBuf;
use std::sync::Arc;

/// Database configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the database file.
    pub path: PathBuf,
    /// Buffer pool size, in frames (default: 10).
    pub buffer_pool_size: usize,
    /// B+ tree order (default: [`crate::types::MAX_ORDER`]).
    pub btree_config: BTreeConfig,
}

impl Config {
    /// Create a configuration with default settings.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            buffer_pool_size: 10,
            btree_config: BTreeConfig::default(),
        }
    }

    pub fn buffer_pool_size(mut self, size: usize) -> Self {
        self.buffer_pool_size = size;
        self
    }

    pub fn btree_config(mut self, config: BTreeConfig) -> Self {
        self.btree_config = config;
        self
    }
}

/// Database statistics, combining buffer pool activity with tree shape.
#[derive(Debug, Clone, Copy)]
pub struct DbStats {
    pub page_count: u32,
    pub buffer_pool_size: usize,
    pub tree_depth: u32,
    pub pool_fetches: u64,
    pub pool_hits: u64,
    pub pool_misses: u64,
    pub pool_evictions: u64,
    pub pool_writes: u64,
}

/// Main database handle: opens a file, wires the disk manager, buffer
/// pool, and tree together, and exposes the key/value API by name.
///
/// Single-writer: callers are expected to serialize their own writes
/// (e.g. one CLI process), but reads may run concurrently with a write
/// thanks to the per-frame `RwLock` inside the buffer pool. `put` and
/// `delete` take `&mut self` to make that expectation visible in the
/// type.
pub struct Db {
    tree: BTree,
    buffer_pool: Arc<BufferPoolImpl>,
    disk_manager: Arc<DiskManagerImpl>,
}

impl Db {
    /// Open or create a database at the configured path.
    pub fn open(config: Config) -> Result<Self> {
        let disk_manager = Arc::new(DiskManagerImpl::open(&config.path)?);
        let buffer_pool = Arc::new(BufferPoolImpl::new(
            disk_manager.clone(),
            config.buffer_pool_size,
        ));
        let tree = BTree::open(
            disk_manager.clone(),
            buffer_pool.clone(),
            config.btree_config,
        )?;

        Ok(Self {
            tree,
            buffer_pool,
            disk_manager,
        })
    }

    /// Derive the sortable key for `name` and look up its record.
    pub fn get(&self, name: &str) -> Result<Option<Record>> {
        self.tree.search(alphabetical_key32(name))
    }

    /// Insert or overwrite the record stored under `name`.
    pub fn put(&mut self, name: &str, record: Record) -> Result<()> {
        self.tree.insert(alphabetical_key32(name), record)
    }

    /// Remove the record stored under `name`. Returns `false`, not an
    /// error, if it was absent.
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        self.tree.remove(alphabetical_key32(name))
    }

    /// All entries whose name begins with the given letters (inclusive,
    /// case-insensitive range over first letter).
    pub fn browse_by_first_letter(&self, c1: char, c2: char) -> Result<Vec<(i32, Record)>> {
        self.tree.range_search_by_char(c1, c2)
    }

    /// All entries whose name starts with `prefix` (case-insensitive).
    pub fn search_prefix(&self, prefix: &str) -> Result<Vec<(i32, Record)>> {
        self.tree.prefix_search(prefix)
    }

    /// Flush all dirty pages and the header to disk.
    pub fn flush(&self) -> Result<()> {
        self.tree.flush()
    }

    /// A debug dump of the tree's structure.
    pub fn print_tree(&self) -> Result<String> {
        self.tree.print_tree()
    }

    /// Snapshot of buffer pool and tree-shape statistics.
    pub fn stats(&self) -> DbStats {
        let pool_stats = self.buffer_pool.stats();
        DbStats {
            page_count: self.disk_manager.num_pages(),
            buffer_pool_size: self.buffer_pool.capacity(),
            tree_depth: self.tree.compute_tree_depth().unwrap_or(0),
            pool_fetches: pool_stats.fetches,
            pool_hits: pool_stats.hits,
            pool_misses: pool_stats.misses,
            pool_evictions: pool_stats.evictions,
            pool_writes: pool_stats.writes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_basic_put_get_delete() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let mut db = Db::open(Config::new(&path))?;

        db.put("Apple", Record::new("Apple", 0, 52, 0.5))?;
        assert_eq!(db.get("Apple")?.unwrap().calories, 52);

        db.put("Apple", Record::new("Apple", 1, 60, 0.6))?;
        assert_eq!(db.get("Apple")?.unwrap().calories, 60);

        assert!(db.delete("Apple")?);
        assert!(db.get("Apple")?.is_none());
        assert!(!db.delete("Apple")?);

        Ok(())
    }

    #[test]
    fn test_reopen_preserves_data() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let mut db = Db::open(Config::new(&path))?;
            db.put("Banana", Record::new("Banana", 1, 89, 0.3))?;
            db.flush()?;
        }

        {
            let db = Db::open(Config::new(&path))?;
            let rec = db.get("Banana")?.unwrap();
            assert_eq!(rec.name(), "Banana");
            assert_eq!(rec.calories, 89);
        }

        Ok(())
    }

    #[test]
    fn test_browse_and_prefix() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let mut db = Db::open(Config::new(&path))?;

        for name in ["Apple", "Apricot", "Banana", "Cherry"] {
            db.put(name, Record::new(name, 0, 0, 0.0))?;
        }

        let a_items = db.browse_by_first_letter('A', 'A')?;
        assert_eq!(a_items.len(), 2);

        let ap_items = db.search_prefix("ap")?;
        assert_eq!(ap_items.len(), 2);

        Ok(())
    }
}

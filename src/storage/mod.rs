//! Storage layer: disk I/O and the tree header.
//!
//! Pages are fixed-size and addressed by [`crate::types::PageId`]. Page
//! 0 holds the tree header; every other page is a node page owned by
//! the B+ tree engine. There is no free list: a page is only ever
//! zeroed in place (on a merge) and the file never shrinks.

mod disk_manager;

pub use disk_manager::{DiskManager, DiskManagerImpl};

use crate::types::{PageId, PAGE_SIZE};

/// The tree's persistent root pointer, stored uncompressed in page 0.
///
/// No magic number and no version field: the file format is identified
/// by the caller choosing to open it as a tree, not by self-describing
/// bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeHeader {
    pub root_page_id: PageId,
    pub has_root: bool,
}

impl TreeHeader {
    /// The header for a freshly created, empty tree.
    pub const fn empty() -> Self {
        Self {
            root_page_id: PageId::NONE,
            has_root: false,
        }
    }

    pub(crate) fn decode(buf: &[u8; PAGE_SIZE]) -> Self {
        let root_page_id = PageId::new(i32::from_le_bytes(buf[0..4].try_into().unwrap()));
        let has_root = buf[4] != 0;
        Self {
            root_page_id,
            has_root,
        }
    }

    pub(crate) fn encode(&self, buf: &mut [u8; PAGE_SIZE]) {
        buf.fill(0);
        buf[0..4].copy_from_slice(&self.root_page_id.value().to_le_bytes());
        buf[4] = self.has_root as u8;
    }
}

//! Node page layout: a fixed-structure (non-slotted) on-disk image for
//! one B+ tree node, plus the raw page buffer it is decoded from.
//!
//! Every node, leaf or internal, occupies exactly one page and is
//! stored at a fixed offset for every field — there is no cell pointer
//! array and no variable-length encoding. This mirrors the reference
//! `NodePage` struct, which the original simply `reinterpret_cast`s over
//! raw page bytes; here the same bytes are read and written through an
//! explicit little-endian encoding instead, since Rust has no portable
//! equivalent of that cast.

use crate::bloom::{BloomFilter, BLOOM_BYTES};
use crate::error::{Result, StorageError};
use crate::record::Record;
use crate::types::{PageId, CAP_CHILDREN, CAP_KEYS, PAGE_SIZE, RECORD_NAME_LEN};

/// Encoded size of one [`Record`]: name + protein + calories + cost.
const RECORD_BYTES: usize = RECORD_NAME_LEN + 4 + 4 + 8;

/// Encoded size of a [`NodePage`]. Verified at compile time to fit
/// within [`PAGE_SIZE`] for the largest supported order.
pub const NODE_PAGE_BYTES: usize =
    1 + 4 + CAP_KEYS * 4 + CAP_KEYS * RECORD_BYTES + 4 + CAP_CHILDREN * 4 + BLOOM_BYTES;

const _: () = assert!(NODE_PAGE_BYTES <= PAGE_SIZE, "NodePage does not fit in a page");

const OFF_IS_LEAF: usize = 0;
const OFF_SIZE: usize = OFF_IS_LEAF + 1;
const OFF_KEYS: usize = OFF_SIZE + 4;
const OFF_ITEMS: usize = OFF_KEYS + CAP_KEYS * 4;
const OFF_NEXT_LEAF: usize = OFF_ITEMS + CAP_KEYS * RECORD_BYTES;
const OFF_CHILDREN: usize = OFF_NEXT_LEAF + 4;
const OFF_BLOOM: usize = OFF_CHILDREN + CAP_CHILDREN * 4;

/// A raw, fixed-size page buffer as read from or written to disk.
#[derive(Clone)]
pub struct PageBuf {
    data: [u8; PAGE_SIZE],
}

impl PageBuf {
    /// A zeroed page buffer.
    pub fn new() -> Self {
        Self {
            data: [0u8; PAGE_SIZE],
        }
    }
}

impl Default for PageBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for PageBuf {
    type Target = [u8; PAGE_SIZE];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl std::ops::DerefMut for PageBuf {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

/// An in-memory, typed view of one tree node page.
///
/// `size` is the number of live entries in `keys`/`items` (leaf) or the
/// number of keys in an internal node (which then holds `size + 1` live
/// children). Slots beyond `size` (or `size + 1` for children) are
/// unused and hold whatever zero/default value they were created with;
/// callers must never read past `size`.
#[derive(Debug, Clone)]
pub struct NodePage {
    pub is_leaf: bool,
    pub size: usize,
    pub keys: [i32; CAP_KEYS],
    pub items: [Record; CAP_KEYS],
    pub next_leaf: PageId,
    pub children: [PageId; CAP_CHILDREN],
    pub bloom: BloomFilter,
}

impl NodePage {
    /// A freshly allocated, empty leaf node.
    pub fn new_leaf() -> Self {
        Self {
            is_leaf: true,
            size: 0,
            keys: [0; CAP_KEYS],
            items: [Record::empty(); CAP_KEYS],
            next_leaf: PageId::NONE,
            children: [PageId::NONE; CAP_CHILDREN],
            bloom: BloomFilter::new(),
        }
    }

    /// A freshly allocated, empty internal node.
    pub fn new_internal() -> Self {
        Self {
            is_leaf: false,
            ..Self::new_leaf()
        }
    }

    /// Rebuild the embedded Bloom filter from `keys[0..size)`. Only
    /// meaningful for leaves; internal nodes never consult it.
    pub fn rebuild_bloom(&mut self) {
        if self.is_leaf {
            self.bloom.rebuild(&self.keys[..self.size]);
        } else {
            self.bloom.clear();
        }
    }

    /// Decode a node from a raw page buffer.
    pub fn decode(buf: &[u8; PAGE_SIZE]) -> Result<Self> {
        let is_leaf = buf[OFF_IS_LEAF] != 0;
        let size = read_i32(buf, OFF_SIZE) as usize;
        if size > CAP_KEYS {
            return Err(StorageError::corruption(format!(
                "decoded node size {size} exceeds capacity {CAP_KEYS}"
            )));
        }

        let mut keys = [0i32; CAP_KEYS];
        for (i, slot) in keys.iter_mut().enumerate() {
            *slot = read_i32(buf, OFF_KEYS + i * 4);
        }

        let mut items = [Record::empty(); CAP_KEYS];
        for (i, slot) in items.iter_mut().enumerate() {
            let base = OFF_ITEMS + i * RECORD_BYTES;
            let mut name = [0u8; RECORD_NAME_LEN];
            name.copy_from_slice(&buf[base..base + RECORD_NAME_LEN]);
            let protein = read_i32(buf, base + RECORD_NAME_LEN);
            let calories = read_i32(buf, base + RECORD_NAME_LEN + 4);
            let cost = read_f64(buf, base + RECORD_NAME_LEN + 8);
            *slot = Record::from_parts(name, protein, calories, cost);
        }

        let next_leaf = PageId::new(read_i32(buf, OFF_NEXT_LEAF));

        let mut children = [PageId::NONE; CAP_CHILDREN];
        for (i, slot) in children.iter_mut().enumerate() {
            *slot = PageId::new(read_i32(buf, OFF_CHILDREN + i * 4));
        }

        let mut bloom_bytes = [0u8; BLOOM_BYTES];
        bloom_bytes.copy_from_slice(&buf[OFF_BLOOM..OFF_BLOOM + BLOOM_BYTES]);
        let bloom = BloomFilter::from_bytes(bloom_bytes);

        Ok(Self {
            is_leaf,
            size,
            keys,
            items,
            next_leaf,
            children,
            bloom,
        })
    }

    /// Encode this node into a raw page buffer, zeroing the remainder.
    pub fn encode(&self, buf: &mut [u8; PAGE_SIZE]) {
        buf.fill(0);
        buf[OFF_IS_LEAF] = self.is_leaf as u8;
        write_i32(buf, OFF_SIZE, self.size as i32);

        for (i, &k) in self.keys.iter().enumerate() {
            write_i32(buf, OFF_KEYS + i * 4, k);
        }

        for (i, item) in self.items.iter().enumerate() {
            let base = OFF_ITEMS + i * RECORD_BYTES;
            buf[base..base + RECORD_NAME_LEN].copy_from_slice(item.name_bytes());
            write_i32(buf, base + RECORD_NAME_LEN, item.protein);
            write_i32(buf, base + RECORD_NAME_LEN + 4, item.calories);
            write_f64(buf, base + RECORD_NAME_LEN + 8, item.cost);
        }

        write_i32(buf, OFF_NEXT_LEAF, self.next_leaf.value());

        for (i, &c) in self.children.iter().enumerate() {
            write_i32(buf, OFF_CHILDREN + i * 4, c.value());
        }

        buf[OFF_BLOOM..OFF_BLOOM + BLOOM_BYTES].copy_from_slice(self.bloom.as_bytes());
    }
}

fn read_i32(buf: &[u8], off: usize) -> i32 {
    i32::from_le_bytes(buf[off..off + 4].try_into().unwrap())
}

fn write_i32(buf: &mut [u8], off: usize, v: i32) {
    buf[off..off + 4].copy_from_slice(&v.to_le_bytes());
}

fn read_f64(buf: &[u8], off: usize) -> f64 {
    f64::from_le_bytes(buf[off..off + 8].try_into().unwrap())
}

fn write_f64(buf: &mut [u8], off: usize, v: f64) {
    buf[off..off + 8].copy_from_slice(&v.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_leaf() {
        let mut node = NodePage::new_leaf();
        node.keys[0] = 10;
        node.items[0] = Record::new("Apple", 0, 52, 0.5);
        node.keys[1] = 20;
        node.items[1] = Record::new("Banana", 1, 89, 0.3);
        node.size = 2;
        node.next_leaf = PageId::new(7);
        node.rebuild_bloom();

        let mut buf = PageBuf::new();
        node.encode(&mut buf);
        let decoded = NodePage::decode(&buf).unwrap();

        assert!(decoded.is_leaf);
        assert_eq!(decoded.size, 2);
        assert_eq!(decoded.keys[0], 10);
        assert_eq!(decoded.items[0].name(), "Apple");
        assert_eq!(decoded.items[1].name(), "Banana");
        assert_eq!(decoded.next_leaf, PageId::new(7));
        assert!(decoded.bloom.possibly_contains(10));
        assert!(decoded.bloom.possibly_contains(20));
    }

    #[test]
    fn test_round_trip_internal() {
        let mut node = NodePage::new_internal();
        node.keys[0] = 100;
        node.children[0] = PageId::new(1);
        node.children[1] = PageId::new(2);
        node.size = 1;

        let mut buf = PageBuf::new();
        node.encode(&mut buf);
        let decoded = NodePage::decode(&buf).unwrap();

        assert!(!decoded.is_leaf);
        assert_eq!(decoded.size, 1);
        assert_eq!(decoded.children[0], PageId::new(1));
        assert_eq!(decoded.children[1], PageId::new(2));
    }

    #[test]
    fn test_decode_rejects_oversized_count() {
        let mut buf = PageBuf::new();
        write_i32(&mut buf, OFF_SIZE, (CAP_KEYS as i32) + 1);
        assert!(NodePage::decode(&buf).is_err());
    }
}

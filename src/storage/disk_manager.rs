//! Disk manager: reads and writes fixed-size pages to the database file.
//!
//! Page 0 is reserved for the tree header and is never handed to the
//! buffer pool as a node page. There is no magic number and no version
//! field in the header or anywhere else in the file — the format is
//! identified only by the caller choosing to open it as one of these
//! trees.

use crate::error::Result;
use crate::storage::TreeHeader;
use crate::types::{PageId, PAGE_SIZE};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Trait for page-level disk I/O, so the buffer pool can be tested
/// against a non-file-backed fake if ever needed.
pub trait DiskManager: Send + Sync {
    /// Read page `id` into `dst`. Short reads (a page at the very end of
    /// a file that was never fully written) are zero-padded rather than
    /// treated as an error.
    fn read_page(&self, id: PageId, dst: &mut [u8; PAGE_SIZE]) -> Result<()>;

    /// Write `src` to page `id`.
    fn write_page(&self, id: PageId, src: &[u8; PAGE_SIZE]) -> Result<()>;

    /// Allocate the next page id and zero-fill it on disk.
    fn new_page_id(&self) -> Result<PageId>;

    /// Number of pages in the file, including the header page.
    fn num_pages(&self) -> u32;

    /// Read the tree header from page 0.
    fn read_header(&self) -> Result<TreeHeader>;

    /// Write the tree header to page 0.
    fn write_header(&self, header: &TreeHeader) -> Result<()>;
}

/// File-backed [`DiskManager`].
pub struct DiskManagerImpl {
    file: Mutex<File>,
    next_page_id: Mutex<i32>,
}

impl DiskManagerImpl {
    /// Open an existing database file or create a new one.
    ///
    /// A brand-new file gets its header page written immediately
    /// (`root_page_id = -1`, `has_root = false`); an existing file's
    /// page count determines the next page id to hand out.
    pub fn open(path: &Path) -> Result<Self> {
        let existed = path.exists();

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let len = file.metadata()?.len();
        let next_page_id = (len / PAGE_SIZE as u64) as i32;

        let dm = Self {
            file: Mutex::new(file.try_clone()?),
            next_page_id: Mutex::new(next_page_id.max(0)),
        };

        if !existed || len < PAGE_SIZE as u64 {
            file.set_len(0)?;
            *dm.next_page_id.lock() = 0;
            drop(file);
            dm.write_header(&TreeHeader::empty())?;
        }

        Ok(dm)
    }
}

impl DiskManager for DiskManagerImpl {
    fn read_page(&self, id: PageId, dst: &mut [u8; PAGE_SIZE]) -> Result<()> {
        dst.fill(0);
        let offset = id.file_offset(PAGE_SIZE);
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;

        let mut read_total = 0usize;
        loop {
            match file.read(&mut dst[read_total..]) {
                Ok(0) => break,
                Ok(n) => read_total += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn write_page(&self, id: PageId, src: &[u8; PAGE_SIZE]) -> Result<()> {
        let offset = id.file_offset(PAGE_SIZE);
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(src)?;
        file.flush()?;
        Ok(())
    }

    fn new_page_id(&self) -> Result<PageId> {
        let mut next = self.next_page_id.lock();
        let id = PageId::new(*next);
        *next += 1;
        drop(next);

        let zeros = [0u8; PAGE_SIZE];
        self.write_page(id, &zeros)?;
        Ok(id)
    }

    fn num_pages(&self) -> u32 {
        *self.next_page_id.lock() as u32
    }

    fn read_header(&self) -> Result<TreeHeader> {
        let mut buf = [0u8; PAGE_SIZE];
        self.read_page(PageId::HEADER, &mut buf)?;
        Ok(TreeHeader::decode(&buf))
    }

    fn write_header(&self, header: &TreeHeader) -> Result<()> {
        let mut buf = [0u8; PAGE_SIZE];
        header.encode(&mut buf);
        self.write_page(PageId::HEADER, &buf)?;
        {
            let mut next = self.next_page_id.lock();
            if *next < 1 {
                *next = 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_database_has_empty_header() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let dm = DiskManagerImpl::open(&path)?;
        let header = dm.read_header()?;
        assert!(!header.has_root);
        assert_eq!(header.root_page_id, PageId::NONE);
        assert_eq!(dm.num_pages(), 1);

        Ok(())
    }

    #[test]
    fn test_allocate_and_round_trip_page() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let dm = DiskManagerImpl::open(&path)?;

        let id = dm.new_page_id()?;
        assert_eq!(id, PageId::new(1));

        let mut buf = [0u8; PAGE_SIZE];
        buf[0..5].copy_from_slice(b"hello");
        dm.write_page(id, &buf)?;

        let mut out = [0u8; PAGE_SIZE];
        dm.read_page(id, &mut out)?;
        assert_eq!(&out[0..5], b"hello");

        Ok(())
    }

    #[test]
    fn test_reopen_preserves_header_and_pages() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let dm = DiskManagerImpl::open(&path)?;
            let id = dm.new_page_id()?;
            dm.write_header(&TreeHeader {
                root_page_id: id,
                has_root: true,
            })?;
        }

        {
            let dm = DiskManagerImpl::open(&path)?;
            let header = dm.read_header()?;
            assert!(header.has_root);
            assert_eq!(header.root_page_id, PageId::new(1));
            assert_eq!(dm.num_pages(), 2);
        }

        Ok(())
    }

    #[test]
    fn test_read_past_end_zero_pads() -> Result<()> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let dm = DiskManagerImpl::open(&path)?;

        let mut out = [1u8; PAGE_SIZE];
        // page 5 was never allocated through new_page_id
        dm.read_page(PageId::new(5), &mut out)?;
        assert!(out.iter().all(|&b| b == 0));

        Ok(())
    }
}

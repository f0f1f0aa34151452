//! Disk File - a [`PagedFile`] stored in a single file on disk.

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use crate::common::config::PAGE_SIZE;
use crate::common::PageId;
use crate::storage::{Page, PagedFile};

/// Pages laid out back to back in one file.
///
/// # File Layout
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Page 0  │ Page 1  │ Page 2  │  ...    │ Page N  │
/// │ (4KB)   │ (4KB)   │ (4KB)   │         │ (4KB)   │
/// └─────────┴─────────┴─────────┴─────────┴─────────┘
/// Offset:  0      4096     8192    ...    N×4096
/// ```
///
/// # Disposal
/// A disposed page is zeroed on disk and its number goes on a free list;
/// the next [`allocate_page`](PagedFile::allocate_page) hands out the lowest
/// free number before growing the file. The free list lives in memory only,
/// so after reopening, disposed pages read back as zeroed, allocated pages.
///
/// # Durability
/// Every write is followed by `sync_data()`.
pub struct DiskFile {
    file: File,
    /// Number of page slots in the file, disposed ones included.
    page_count: u32,
    /// Disposed page numbers available for reuse.
    free_pages: BTreeSet<u32>,
}

impl DiskFile {
    /// Create a new, empty paged file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        Ok(Self {
            file,
            page_count: 0,
            free_pages: BTreeSet::new(),
        })
    }

    /// Open an existing paged file.
    ///
    /// A trailing partial page, if any, is ignored.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        let file_size = file.metadata()?.len();
        let page_count = u32::try_from(file_size / PAGE_SIZE as u64).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "file holds too many pages")
        })?;

        Ok(Self {
            file,
            page_count,
            free_pages: BTreeSet::new(),
        })
    }

    /// Open an existing paged file, or create it if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Number of page slots in the file, including disposed ones.
    #[inline]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Number of disposed pages waiting to be reused.
    #[inline]
    pub fn free_page_count(&self) -> usize {
        self.free_pages.len()
    }

    #[inline]
    pub fn file_size(&self) -> u64 {
        u64::from(self.page_count) * PAGE_SIZE as u64
    }

    fn check_live(&self, page_id: PageId) -> io::Result<()> {
        if page_id.0 >= self.page_count || self.free_pages.contains(&page_id.0) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not allocated", page_id),
            ));
        }
        Ok(())
    }

    fn write_at(&mut self, page_id: PageId, data: &[u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(page_id.offset(PAGE_SIZE)))?;
        self.file.write_all(data)?;
        self.file.sync_data()
    }
}

impl PagedFile for DiskFile {
    fn read_page(&mut self, page_id: PageId, page: &mut Page) -> io::Result<()> {
        self.check_live(page_id)?;

        self.file.seek(SeekFrom::Start(page_id.offset(PAGE_SIZE)))?;
        self.file.read_exact(page.as_mut_slice())
    }

    fn write_page(&mut self, page_id: PageId, page: &Page) -> io::Result<()> {
        self.check_live(page_id)?;
        self.write_at(page_id, page.as_slice())
    }

    fn allocate_page(&mut self) -> io::Result<PageId> {
        if let Some(reused) = self.free_pages.pop_first() {
            debug!(page = reused, "reusing disposed page");
            return Ok(PageId::new(reused));
        }

        if self.page_count == PageId::INVALID.0 {
            return Err(io::Error::new(
                io::ErrorKind::OutOfMemory,
                "page numbers exhausted",
            ));
        }

        let page_id = PageId::new(self.page_count);
        self.write_at(page_id, &[0u8; PAGE_SIZE])?;
        self.page_count += 1;

        Ok(page_id)
    }

    fn dispose_page(&mut self, page_id: PageId) -> io::Result<()> {
        self.check_live(page_id)?;

        self.write_at(page_id, &[0u8; PAGE_SIZE])?;
        self.free_pages.insert(page_id.0);

        Ok(())
    }
}

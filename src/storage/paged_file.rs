//! The file-handle contract the buffer manager performs I/O through.

use std::fmt;
use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::common::{FileId, PageId};
use crate::storage::Page;

/// An open file addressed in whole pages.
///
/// The file owns page numbering: it decides which number a new page gets
/// and what happens to a number once the page is disposed. Every call may
/// fail; the buffer manager reports those failures as
/// [`Error::Io`](crate::Error::Io) without retrying.
pub trait PagedFile {
    /// Read page `page_id` into `page`.
    fn read_page(&mut self, page_id: PageId, page: &mut Page) -> io::Result<()>;

    /// Write `page` to page `page_id`.
    fn write_page(&mut self, page_id: PageId, page: &Page) -> io::Result<()>;

    /// Allocate a fresh page and return its number.
    fn allocate_page(&mut self) -> io::Result<PageId>;

    /// Give page `page_id` back to the file for reuse.
    fn dispose_page(&mut self, page_id: PageId) -> io::Result<()>;
}

/// A cloneable, identity-carrying handle to an open [`PagedFile`].
///
/// Frame descriptors keep a clone of the handle of the file that owns their
/// page, so a dirty page can always be written back to where it came from.
/// Two handles are the same file iff their [`FileId`]s are equal.
///
/// # Example
/// ```no_run
/// use clockbuf::storage::{DiskFile, SharedFile};
///
/// let file = SharedFile::new(DiskFile::create("table.db").unwrap());
/// let same = file.clone();
/// assert_eq!(file.id(), same.id());
/// ```
#[derive(Clone)]
pub struct SharedFile {
    id: FileId,
    inner: Arc<Mutex<dyn PagedFile + Send>>,
}

impl SharedFile {
    /// Wrap `file` under a freshly minted [`FileId`].
    pub fn new<F: PagedFile + Send + 'static>(file: F) -> Self {
        let inner: Arc<Mutex<dyn PagedFile + Send>> = Arc::new(Mutex::new(file));
        Self {
            id: FileId::next(),
            inner,
        }
    }

    #[inline]
    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn read_page(&self, page_id: PageId, page: &mut Page) -> io::Result<()> {
        self.inner.lock().read_page(page_id, page)
    }

    pub fn write_page(&self, page_id: PageId, page: &Page) -> io::Result<()> {
        self.inner.lock().write_page(page_id, page)
    }

    pub fn allocate_page(&self) -> io::Result<PageId> {
        self.inner.lock().allocate_page()
    }

    pub fn dispose_page(&self, page_id: PageId) -> io::Result<()> {
        self.inner.lock().dispose_page(page_id)
    }
}

impl PartialEq for SharedFile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SharedFile {}

impl fmt::Debug for SharedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedFile").field("id", &self.id).finish()
    }
}

//! File identity and the page key built from it.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use super::PageId;

static NEXT_FILE_ID: AtomicU32 = AtomicU32::new(0);

/// Identity of an open paged file.
///
/// Ids are minted from a process-wide counter, so two handles opened on
/// the same path are still two distinct files to the buffer manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    /// Mint a fresh, never-before-used file id.
    pub fn next() -> Self {
        FileId(NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File({})", self.0)
    }
}

/// Identity of a page across all open files: `(file, page number)`.
///
/// This is the key of the page table. At most one frame may hold a given
/// key at any time.
///
/// # Example
/// ```
/// use clockbuf::{FileId, PageId, PageKey};
///
/// let key = PageKey::new(FileId(1), PageId::new(7));
/// assert_eq!(format!("{}", key), "File(1):Page(7)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey {
    pub file: FileId,
    pub page: PageId,
}

impl PageKey {
    #[inline]
    pub fn new(file: FileId, page: PageId) -> Self {
        Self { file, page }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_ids_are_unique() {
        let a = FileId::next();
        let b = FileId::next();
        let c = FileId::next();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_page_key_distinguishes_files() {
        let page = PageId::new(3);
        assert_ne!(PageKey::new(FileId(1), page), PageKey::new(FileId(2), page));
        assert_eq!(PageKey::new(FileId(1), page), PageKey::new(FileId(1), page));
    }

    #[test]
    fn test_page_key_display() {
        let key = PageKey::new(FileId(4), PageId::new(9));
        assert_eq!(format!("{}", key), "File(4):Page(9)");
    }
}

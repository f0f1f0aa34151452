//! Frame descriptor - bookkeeping for one slot of the buffer pool.
//!
//! A [`FrameDesc`] records which page a frame holds and the state the
//! replacement policy needs:
//! - Owning file and page number
//! - Pin count for reference counting
//! - Dirty flag for write-back tracking
//! - Valid flag (the frame is mapped in the page table)
//! - Reference bit for second-chance replacement

use crate::common::{FrameId, PageId, PageKey};
use crate::storage::SharedFile;

/// Metadata for one frame. The page bytes live in a parallel array owned by
/// the buffer manager, at the same index.
///
/// Descriptors never touch the page table themselves; the buffer manager
/// pairs every [`set`](Self::set) and [`clear`](Self::clear) with the
/// matching page table update.
#[derive(Debug)]
pub struct FrameDesc {
    frame_id: FrameId,
    /// Owning file, or `None` when the slot is unoccupied.
    pub(crate) file: Option<SharedFile>,
    /// Meaningless unless `valid`.
    pub(crate) page_id: PageId,
    pub(crate) pin_count: u32,
    pub(crate) dirty: bool,
    pub(crate) valid: bool,
    pub(crate) ref_bit: bool,
}

impl FrameDesc {
    /// Create an unoccupied descriptor for `frame_id`.
    pub fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            file: None,
            page_id: PageId::INVALID,
            pin_count: 0,
            dirty: false,
            valid: false,
            ref_bit: false,
        }
    }

    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    #[inline]
    pub fn file(&self) -> Option<&SharedFile> {
        self.file.as_ref()
    }

    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    #[inline]
    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pin_count > 0
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn ref_bit(&self) -> bool {
        self.ref_bit
    }

    /// The page this frame holds, if any.
    pub fn key(&self) -> Option<PageKey> {
        match (&self.file, self.valid) {
            (Some(file), true) => Some(PageKey::new(file.id(), self.page_id)),
            _ => None,
        }
    }

    /// Whether this descriptor claims `file` as its owner, valid or not.
    #[inline]
    pub fn is_owned_by(&self, file: &SharedFile) -> bool {
        self.file.as_ref().is_some_and(|owner| owner == file)
    }

    /// Load state: `page_id` of `file` is now resident, pinned once and
    /// recently referenced.
    pub fn set(&mut self, file: SharedFile, page_id: PageId) {
        self.file = Some(file);
        self.page_id = page_id;
        self.pin_count = 1;
        self.dirty = false;
        self.valid = true;
        self.ref_bit = true;
    }

    /// Pin for another holder and mark recently referenced.
    /// Returns the new pin count.
    #[inline]
    pub fn pin(&mut self) -> u32 {
        self.pin_count += 1;
        self.ref_bit = true;
        self.pin_count
    }

    /// Drop one holder, folding `dirty` into the sticky dirty flag.
    ///
    /// Returns the new pin count, or `None` (leaving the descriptor
    /// untouched) if the frame was not pinned.
    pub fn unpin(&mut self, dirty: bool) -> Option<u32> {
        if self.pin_count == 0 {
            return None;
        }

        self.pin_count -= 1;
        if dirty {
            self.dirty = true;
        }
        Some(self.pin_count)
    }

    /// Reset to the unoccupied state, regardless of pins or dirtiness.
    pub fn clear(&mut self) {
        self.file = None;
        self.page_id = PageId::INVALID;
        self.pin_count = 0;
        self.dirty = false;
        self.valid = false;
        self.ref_bit = false;
    }
}

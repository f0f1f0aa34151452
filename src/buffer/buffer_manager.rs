//! Buffer Manager - the page caching layer.
//!
//! The [`BufferManager`] provides:
//! - Page caching between paged files and memory
//! - Pin-based reference counting
//! - CLOCK (second-chance) replacement
//! - Write-back of dirty pages on eviction, flush and shutdown

use std::fmt;

use tracing::{debug, trace, warn};

use crate::buffer::replacer::ClockReplacer;
use crate::buffer::{BufferPoolStats, FrameDesc, PageIndex, PageTable};
use crate::common::{Error, FrameId, PageId, PageKey, Result};
use crate::storage::{Page, SharedFile};

/// Caches pages of any number of open files in a fixed pool of frames.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────────┐
/// │                        BufferManager                         │
/// │  ┌──────────────┐   ┌────────────────────────────────────┐   │
/// │  │  page_table  │   │  frames: Vec<FrameDesc>            │   │
/// │  │ PageKey → Fid│──▶│  [Desc0] [Desc1] [Desc2] ...       │   │
/// │  └──────────────┘   │  pool:   Vec<Page>                 │   │
/// │  ┌──────────────┐   │  [Page0] [Page1] [Page2] ...       │   │
/// │  │    clock     │──▶└────────────────────────────────────┘   │
/// │  │ ClockReplacer│           │ write-back / read             │
/// │  └──────────────┘           ▼                               │
/// │                   SharedFile (one per open file)             │
/// └──────────────────────────────────────────────────────────────┘
/// ```
///
/// # Invariants
/// - A frame is valid iff the page table maps its page to it. Only
///   `install` and `clear_frame` change occupancy, and each updates both.
/// - A page is held by at most one frame.
/// - A pinned frame is never chosen as a victim.
/// - A dirty frame is written back before it is reused.
///
/// # Threading
/// Single-threaded: every operation takes `&mut self` and runs to
/// completion, including any file I/O it performs. Wrap the manager in a
/// lock to share it.
///
/// # Usage
/// ```no_run
/// use clockbuf::storage::{DiskFile, SharedFile};
/// use clockbuf::BufferManager;
///
/// let file = SharedFile::new(DiskFile::create("table.db")?);
/// let mut bufmgr = BufferManager::new(16);
///
/// let (page_id, page) = bufmgr.alloc_page(&file)?;
/// page.as_mut_slice()[0] = 0xAB;
/// bufmgr.unpin_page(&file, page_id, true)?;
///
/// let page = bufmgr.read_page(&file, page_id)?;
/// assert_eq!(page.as_slice()[0], 0xAB);
/// bufmgr.unpin_page(&file, page_id, false)?;
///
/// bufmgr.flush_file(&file)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct BufferManager<I: PageIndex = PageTable> {
    /// One descriptor per frame, indexed by frame number.
    frames: Vec<FrameDesc>,

    /// Page data, parallel to `frames`.
    pool: Vec<Page>,

    /// Maps resident pages to their frames.
    page_table: I,

    /// Victim selection.
    clock: ClockReplacer,

    stats: BufferPoolStats,
}

impl BufferManager<PageTable> {
    /// Create a buffer manager with `pool_size` frames and the default page table.
    ///
    /// # Panics
    /// Panics if `pool_size` is 0.
    pub fn new(pool_size: usize) -> Self {
        Self::with_index(pool_size, PageTable::for_pool(pool_size))
    }
}

impl<I: PageIndex> BufferManager<I> {
    /// Create a buffer manager with `pool_size` frames over `page_table`.
    ///
    /// `page_table` is expected to be empty.
    ///
    /// # Panics
    /// Panics if `pool_size` is 0.
    pub fn with_index(pool_size: usize, page_table: I) -> Self {
        assert!(pool_size > 0, "pool_size must be > 0");

        let frames = (0..pool_size)
            .map(|i| FrameDesc::new(FrameId::new(i)))
            .collect();
        let pool = (0..pool_size).map(|_| Page::new()).collect();

        Self {
            frames,
            pool,
            page_table,
            clock: ClockReplacer::new(pool_size),
            stats: BufferPoolStats::default(),
        }
    }

    // ========================================================================
    // Public API: page access
    // ========================================================================

    /// Fetch page `page_id` of `file`, pinned once more for the caller.
    ///
    /// A resident page is returned without I/O. Otherwise a frame is taken
    /// from the clock and the page is read into it.
    ///
    /// # Errors
    /// - `Error::PoolExhausted` if every frame is pinned
    /// - `Error::Io` if the read, or the write-back of a dirty victim, fails;
    ///   a failed read leaves the frame unoccupied
    /// - `Error::IndexFailure` if the page table refuses the new mapping
    pub fn read_page(&mut self, file: &SharedFile, page_id: PageId) -> Result<&mut Page> {
        let key = PageKey::new(file.id(), page_id);

        if let Some(frame_id) = self.page_table.lookup(key) {
            let pin_count = self.frames[frame_id.0].pin();
            self.stats.cache_hits += 1;
            trace!(%key, %frame_id, pin_count, "cache hit");
            return Ok(&mut self.pool[frame_id.0]);
        }

        self.stats.cache_misses += 1;
        let frame_id = self.alloc_buf()?;

        file.read_page(page_id, &mut self.pool[frame_id.0])?;
        self.stats.pages_read += 1;

        self.install(frame_id, file, page_id)?;
        debug!(%key, %frame_id, "cache miss, page loaded");

        Ok(&mut self.pool[frame_id.0])
    }

    /// Release one pin on page `page_id` of `file`.
    ///
    /// `dirty` marks the page as modified. The dirty flag is sticky: only a
    /// successful write-back clears it.
    ///
    /// # Errors
    /// - `Error::MappingNotFound` if the page is not resident
    /// - `Error::NotPinned` if its pin count is already zero
    pub fn unpin_page(&mut self, file: &SharedFile, page_id: PageId, dirty: bool) -> Result<()> {
        let key = PageKey::new(file.id(), page_id);
        let frame_id = self
            .page_table
            .lookup(key)
            .ok_or(Error::MappingNotFound(key))?;

        let pin_count = self.frames[frame_id.0]
            .unpin(dirty)
            .ok_or(Error::NotPinned(key))?;

        trace!(%key, %frame_id, pin_count, dirty, "unpinned");
        Ok(())
    }

    /// Allocate a new page in `file` and pin it in a frame.
    ///
    /// The page is not read from the file; the frame keeps whatever bytes it
    /// last held and the caller is expected to overwrite them. The page
    /// number is taken from the file before a frame is found, so it stays
    /// allocated in the file even if this call then fails.
    ///
    /// # Errors
    /// - `Error::Io` if the file cannot allocate, or a dirty victim cannot
    ///   be written back
    /// - `Error::PoolExhausted` if every frame is pinned
    /// - `Error::IndexFailure` if the page table refuses the mapping
    pub fn alloc_page(&mut self, file: &SharedFile) -> Result<(PageId, &mut Page)> {
        let page_id = file.allocate_page()?;
        let frame_id = self.alloc_buf()?;

        self.install(frame_id, file, page_id)?;
        debug!(key = %PageKey::new(file.id(), page_id), %frame_id, "new page allocated");

        Ok((page_id, &mut self.pool[frame_id.0]))
    }

    /// Drop page `page_id` from the pool and return it to `file`.
    ///
    /// A resident copy is discarded even if pinned or dirty.
    ///
    /// # Errors
    /// - `Error::Io` if the file fails to dispose the page
    pub fn dispose_page(&mut self, file: &SharedFile, page_id: PageId) -> Result<()> {
        let key = PageKey::new(file.id(), page_id);

        if let Some(frame_id) = self.page_table.lookup(key) {
            self.clear_frame(frame_id)?;
            debug!(%key, %frame_id, "discarded resident copy of disposed page");
        }

        file.dispose_page(page_id)?;
        Ok(())
    }

    /// Write back every dirty page of `file` and evict all its pages.
    ///
    /// All-or-nothing with respect to pins: every frame is checked before
    /// anything is written, so a pinned page leaves the pool untouched.
    ///
    /// # Errors
    /// - `Error::InconsistentFrame` if a frame names `file` but is not valid
    /// - `Error::FramePinned` if any page of `file` is pinned
    /// - `Error::Io` if a write fails; pages handled before the failure stay
    ///   flushed and evicted, the rest stay resident
    pub fn flush_file(&mut self, file: &SharedFile) -> Result<()> {
        for frame in self.frames.iter().filter(|f| f.is_owned_by(file)) {
            if !frame.is_valid() {
                return Err(Error::InconsistentFrame(frame.frame_id()));
            }
            if frame.is_pinned() {
                return Err(Error::FramePinned {
                    key: PageKey::new(file.id(), frame.page_id()),
                    pin_count: frame.pin_count(),
                });
            }
        }

        let mut evicted = 0;
        for i in 0..self.frames.len() {
            if !self.frames[i].is_owned_by(file) {
                continue;
            }

            let frame_id = FrameId::new(i);
            if self.frames[i].is_dirty() {
                self.write_back(frame_id)?;
            }
            self.clear_frame(frame_id)?;
            evicted += 1;
        }

        debug!(file = %file.id(), evicted, "file flushed");
        Ok(())
    }

    /// Write back every dirty, unpinned page without evicting anything.
    ///
    /// # Errors
    /// - `Error::Io` on the first failed write; later pages stay dirty
    pub fn flush_all(&mut self) -> Result<()> {
        for i in 0..self.frames.len() {
            let frame = &self.frames[i];
            if frame.is_valid() && frame.is_dirty() && !frame.is_pinned() {
                self.write_back(FrameId::new(i))?;
            }
        }
        Ok(())
    }

    /// Access a page the caller already has pinned, without pinning it again.
    ///
    /// # Errors
    /// - `Error::MappingNotFound` if the page is not resident
    /// - `Error::NotPinned` if nobody holds a pin on it
    pub fn pinned_page(&self, file: &SharedFile, page_id: PageId) -> Result<&Page> {
        let frame_id = self.pinned_frame(PageKey::new(file.id(), page_id))?;
        Ok(&self.pool[frame_id.0])
    }

    /// Mutable variant of [`pinned_page`](Self::pinned_page).
    ///
    /// Remember to unpin with `dirty = true` after writing.
    pub fn pinned_page_mut(&mut self, file: &SharedFile, page_id: PageId) -> Result<&mut Page> {
        let frame_id = self.pinned_frame(PageKey::new(file.id(), page_id))?;
        Ok(&mut self.pool[frame_id.0])
    }

    // ========================================================================
    // Public API: stats and info
    // ========================================================================

    pub fn stats(&self) -> BufferPoolStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Number of frames in the pool.
    pub fn pool_size(&self) -> usize {
        self.frames.len()
    }

    /// Number of resident pages.
    pub fn page_count(&self) -> usize {
        self.page_table.len()
    }

    /// Number of unoccupied frames.
    pub fn free_frame_count(&self) -> usize {
        self.frames.iter().filter(|f| !f.is_valid()).count()
    }

    /// Pin count of a resident page, or `None` if it is not resident.
    pub fn pin_count(&self, file: &SharedFile, page_id: PageId) -> Option<u32> {
        self.frame_of(file, page_id).map(|f| f.pin_count())
    }

    /// Dirty flag of a resident page, or `None` if it is not resident.
    pub fn is_dirty(&self, file: &SharedFile, page_id: PageId) -> Option<bool> {
        self.frame_of(file, page_id).map(|f| f.is_dirty())
    }

    /// Occupancy of every frame, in frame order.
    pub fn frame_states(&self) -> Vec<FrameState> {
        self.frames.iter().map(FrameState::from).collect()
    }

    // ========================================================================
    // Internal: occupancy changes (page table + descriptor together)
    // ========================================================================

    /// Map `page_id` of `file` to `frame_id` and set up the descriptor.
    ///
    /// On failure the frame stays unoccupied.
    fn install(&mut self, frame_id: FrameId, file: &SharedFile, page_id: PageId) -> Result<()> {
        self.page_table
            .insert(PageKey::new(file.id(), page_id), frame_id)?;
        self.frames[frame_id.0].set(file.clone(), page_id);
        Ok(())
    }

    /// Unmap the frame's page, if any, and reset the descriptor.
    fn clear_frame(&mut self, frame_id: FrameId) -> Result<()> {
        let frame = &mut self.frames[frame_id.0];
        if let Some(key) = frame.key() {
            self.page_table
                .remove(key)
                .map_err(|_| Error::InconsistentFrame(frame_id))?;
        }
        frame.clear();
        Ok(())
    }

    // ========================================================================
    // Internal: frame allocation and write-back
    // ========================================================================

    /// Get an unoccupied frame, evicting the clock's victim if needed.
    ///
    /// A dirty victim triggers write-back of every dirty, unpinned page of
    /// its file. If that fails the victim is left resident and dirty.
    fn alloc_buf(&mut self) -> Result<FrameId> {
        let Some(frame_id) = self.clock.victim(&mut self.frames) else {
            warn!(frames = self.pool_size(), "buffer pool exhausted");
            return Err(Error::PoolExhausted {
                frames: self.pool_size(),
            });
        };

        let victim = &self.frames[frame_id.0];
        let Some(key) = victim.key() else {
            return Ok(frame_id);
        };

        let dirty_owner = if victim.is_dirty() {
            victim.file().cloned()
        } else {
            None
        };
        if let Some(file) = dirty_owner {
            self.write_back_file(&file)?;
        }

        self.clear_frame(frame_id)?;
        self.stats.evictions += 1;
        debug!(%key, %frame_id, "evicted");

        Ok(frame_id)
    }

    /// Write back every dirty, unpinned page of `file`. Pages stay resident.
    fn write_back_file(&mut self, file: &SharedFile) -> Result<()> {
        for i in 0..self.frames.len() {
            let frame = &self.frames[i];
            if frame.is_valid() && frame.is_dirty() && !frame.is_pinned() && frame.is_owned_by(file)
            {
                self.write_back(FrameId::new(i))?;
            }
        }
        Ok(())
    }

    /// Write one frame to its file and clear its dirty flag.
    fn write_back(&mut self, frame_id: FrameId) -> Result<()> {
        let frame = &self.frames[frame_id.0];
        let file = frame.file().ok_or(Error::InconsistentFrame(frame_id))?;
        let page_id = frame.page_id();

        file.write_page(page_id, &self.pool[frame_id.0])?;

        self.frames[frame_id.0].dirty = false;
        self.stats.pages_written += 1;
        debug!(%frame_id, %page_id, "written back");
        Ok(())
    }

    fn pinned_frame(&self, key: PageKey) -> Result<FrameId> {
        let frame_id = self
            .page_table
            .lookup(key)
            .ok_or(Error::MappingNotFound(key))?;

        if !self.frames[frame_id.0].is_pinned() {
            return Err(Error::NotPinned(key));
        }
        Ok(frame_id)
    }

    fn frame_of(&self, file: &SharedFile, page_id: PageId) -> Option<&FrameDesc> {
        self.page_table
            .lookup(PageKey::new(file.id(), page_id))
            .map(|frame_id| &self.frames[frame_id.0])
    }
}

impl<I: PageIndex> Drop for BufferManager<I> {
    /// Best-effort write-back of every dirty page.
    ///
    /// Failures are logged and skipped; the sweep always finishes.
    fn drop(&mut self) {
        for i in 0..self.frames.len() {
            let frame = &self.frames[i];
            if !(frame.is_valid() && frame.is_dirty()) {
                continue;
            }

            let key = frame.key();
            let frame_id = FrameId::new(i);
            if let Err(error) = self.write_back(frame_id) {
                warn!(?key, %frame_id, %error, "shutdown write-back failed, page contents lost");
            }
        }
    }
}

impl<I: PageIndex> fmt::Display for BufferManager<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "BufferManager: {} frames, {} resident, clock at {}",
            self.pool_size(),
            self.page_count(),
            self.clock.hand()
        )?;
        for state in self.frame_states() {
            writeln!(f, "{}", state)?;
        }
        Ok(())
    }
}

/// Point-in-time occupancy of one frame, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameState {
    pub frame_id: FrameId,
    /// Resident page, `None` if the frame is unoccupied.
    pub page: Option<PageKey>,
    pub pin_count: u32,
    pub dirty: bool,
    pub valid: bool,
    pub ref_bit: bool,
}

impl From<&FrameDesc> for FrameState {
    fn from(desc: &FrameDesc) -> Self {
        Self {
            frame_id: desc.frame_id(),
            page: desc.key(),
            pin_count: desc.pin_count(),
            dirty: desc.is_dirty(),
            valid: desc.is_valid(),
            ref_bit: desc.ref_bit(),
        }
    }
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t", self.frame_id.0)?;
        match self.page {
            Some(key) => write!(f, "{}", key)?,
            None => write!(f, "-")?,
        }
        write!(f, "\tpin_count: {}", self.pin_count)?;
        if self.valid {
            write!(f, "\tvalid")?;
        }
        if self.dirty {
            write!(f, "\tdirty")?;
        }
        Ok(())
    }
}

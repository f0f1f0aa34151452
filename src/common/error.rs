//! Error types for the buffer manager.

use thiserror::Error;

use super::{FrameId, PageKey};

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a buffer manager operation can report.
///
/// Failures from the file and the page table are passed up unchanged.
/// Nothing is retried and multi-step operations are not rolled back.
#[derive(Debug, Error)]
pub enum Error {
    /// The clock made its full scan budget without finding a frame to reuse.
    ///
    /// Every frame is pinned (or kept being re-referenced). Recoverable:
    /// unpin something and try again.
    #[error("buffer pool exhausted: no evictable frame among {frames}")]
    PoolExhausted { frames: usize },

    /// The paged file failed a read, write, allocate or dispose.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The page table refused to record a mapping.
    #[error("page table rejected {key}: {reason}")]
    IndexFailure { key: PageKey, reason: &'static str },

    /// No frame holds the page, but the operation needed one to.
    #[error("{0} is not in the buffer pool")]
    MappingNotFound(PageKey),

    /// Unpin of a page whose pin count is already zero.
    ///
    /// This indicates a bug - unpinning should match pinning.
    #[error("{0} is not pinned")]
    NotPinned(PageKey),

    /// Flush of a file while one of its pages is still in use.
    #[error("{key} is pinned ({pin_count} holders); cannot flush its file")]
    FramePinned { key: PageKey, pin_count: u32 },

    /// A frame descriptor names an owning file but holds no valid page.
    ///
    /// The descriptor array and the page table disagree. Not recoverable.
    #[error("{0} claims a file but holds no valid page")]
    InconsistentFrame(FrameId),
}

impl Error {
    /// Whether a caller can reasonably retry or correct and carry on.
    ///
    /// Only an internal invariant violation is considered fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::InconsistentFrame(_))
    }
}

//! Frame identifier type.

use std::fmt;

/// Identifies a frame (slot) in the buffer pool.
///
/// A frame's number is fixed at pool construction and doubles as the index
/// into both the page array and the descriptor array.
///
/// # Example
/// ```
/// use clockbuf::FrameId;
///
/// let frame_id = FrameId::new(5);
/// assert_eq!(frame_id.0, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub usize);

impl FrameId {
    /// Create a new FrameId.
    #[inline]
    pub fn new(id: usize) -> Self {
        FrameId(id)
    }

    /// The frame after this one in a pool of `pool_size` frames, wrapping to 0.
    #[inline]
    pub fn next(self, pool_size: usize) -> Self {
        FrameId((self.0 + 1) % pool_size)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}

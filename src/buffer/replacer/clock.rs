//! CLOCK (second-chance) replacement policy.

use crate::buffer::FrameDesc;
use crate::common::config::CLOCK_PASSES;
use crate::common::FrameId;

/// A clock hand sweeping the frame descriptors in a circle.
///
/// On each step the hand advances one frame and looks at it:
/// - an invalid frame is free and chosen at once;
/// - a set reference bit is cleared and the frame spared for this sweep;
/// - a pinned frame is skipped;
/// - anything else is the victim.
///
/// The scan is capped at [`CLOCK_PASSES`] sweeps of the pool. The first
/// sweep may only clear reference bits, so two are needed before every
/// unpinned frame is guaranteed to be seen with its bit clear; past that,
/// everything left is pinned.
#[derive(Debug)]
pub struct ClockReplacer {
    hand: FrameId,
    pool_size: usize,
}

impl ClockReplacer {
    /// Create a clock over `pool_size` frames.
    ///
    /// The hand starts on the last frame so the first advance lands on 0.
    pub fn new(pool_size: usize) -> Self {
        assert!(pool_size > 0, "pool_size must be > 0");
        Self {
            hand: FrameId::new(pool_size - 1),
            pool_size,
        }
    }

    /// Frame the hand currently points at.
    #[inline]
    pub fn hand(&self) -> FrameId {
        self.hand
    }

    /// Pick a frame to reuse, clearing reference bits on the way.
    ///
    /// The victim's state is left as is; writing it back and unmapping it
    /// is the caller's job. Returns `None` once the scan budget is spent.
    pub fn victim(&mut self, frames: &mut [FrameDesc]) -> Option<FrameId> {
        debug_assert_eq!(frames.len(), self.pool_size);

        for _ in 0..self.pool_size * CLOCK_PASSES {
            self.hand = self.hand.next(self.pool_size);
            let frame = &mut frames[self.hand.0];

            if !frame.is_valid() {
                return Some(self.hand);
            }
            if frame.ref_bit {
                frame.ref_bit = false;
                continue;
            }
            if frame.is_pinned() {
                continue;
            }
            return Some(self.hand);
        }

        None
    }
}

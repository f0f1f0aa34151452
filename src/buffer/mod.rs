//! Buffer pool management.
//!
//! The buffer pool is the in-memory cache between callers and paged files.
//! It manages a fixed pool of frames, each holding one page.
//!
//! # Components
//! - [`BufferManager`] - The page cache and its public API
//! - [`FrameDesc`] - Per-frame bookkeeping (pins, dirty, valid, reference bit)
//! - [`PageIndex`] / [`PageTable`] - Page identity to frame lookup
//! - [`replacer`] - CLOCK victim selection
//! - [`BufferPoolStats`] - Hit/miss and I/O counters

mod buffer_manager;
mod frame;
mod page_table;
pub mod replacer;
mod stats;

pub use buffer_manager::{BufferManager, FrameState};
pub use frame::FrameDesc;
pub use page_table::{PageIndex, PageTable};
pub use stats::BufferPoolStats;

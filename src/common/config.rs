//! Configuration constants for the buffer manager.

/// Size of a page in bytes (4KB).
///
/// Every file handled by the buffer manager uses this page size, and every
/// frame in the pool holds exactly one page of this size.
///
/// # Alignment
/// Pages are aligned to 4096 bytes for efficient Direct I/O (O_DIRECT).
pub const PAGE_SIZE: usize = 4096;

/// Number of full sweeps the clock hand may make before allocation gives up.
///
/// The first sweep may do nothing but clear reference bits, so a victim is
/// only guaranteed to be visible on the second.
pub const CLOCK_PASSES: usize = 2;

/// Ratio of page table slots to buffer frames.
pub const PAGE_TABLE_LOAD_FACTOR: f64 = 1.2;

/// Number of slots to reserve in the page table for a pool of `pool_size` frames.
///
/// Sized to comfortably exceed the number of frames so lookups stay short.
pub fn page_table_capacity(pool_size: usize) -> usize {
    (pool_size as f64 * PAGE_TABLE_LOAD_FACTOR) as usize + 1
}

//! Page table - maps page identities to the frames holding them.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::common::config::page_table_capacity;
use crate::common::{Error, FrameId, PageKey, Result};

/// Identity index consulted by the buffer manager on every page access.
///
/// Implementations must keep keys unique: a second `insert` of a key that
/// is already mapped fails rather than overwriting the first mapping.
pub trait PageIndex {
    /// Frame holding `key`, if it is resident.
    fn lookup(&self, key: PageKey) -> Option<FrameId>;

    /// Record that `frame_id` holds `key`.
    ///
    /// # Errors
    /// - `Error::IndexFailure` if the mapping cannot be recorded
    fn insert(&mut self, key: PageKey, frame_id: FrameId) -> Result<()>;

    /// Forget the mapping for `key`, returning the frame it pointed at.
    ///
    /// # Errors
    /// - `Error::MappingNotFound` if `key` is not mapped
    fn remove(&mut self, key: PageKey) -> Result<FrameId>;

    /// Number of mappings.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default [`PageIndex`]: a `HashMap` sized for the pool up front.
#[derive(Debug, Default)]
pub struct PageTable {
    map: HashMap<PageKey, FrameId>,
}

impl PageTable {
    /// Create a table with room for a pool of `pool_size` frames.
    pub fn for_pool(pool_size: usize) -> Self {
        Self {
            map: HashMap::with_capacity(page_table_capacity(pool_size)),
        }
    }
}

impl PageIndex for PageTable {
    fn lookup(&self, key: PageKey) -> Option<FrameId> {
        self.map.get(&key).copied()
    }

    fn insert(&mut self, key: PageKey, frame_id: FrameId) -> Result<()> {
        match self.map.entry(key) {
            Entry::Occupied(_) => Err(Error::IndexFailure {
                key,
                reason: "key already mapped",
            }),
            Entry::Vacant(slot) => {
                slot.insert(frame_id);
                Ok(())
            }
        }
    }

    fn remove(&mut self, key: PageKey) -> Result<FrameId> {
        self.map.remove(&key).ok_or(Error::MappingNotFound(key))
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

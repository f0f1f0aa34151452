//! clockbuf - a buffer manager for paged files.
//!
//! Callers never touch files directly. They ask for pages by
//! `(file, page number)` and get back a pinned, in-memory frame; the buffer
//! manager decides what to keep resident, reads on a miss, and writes dirty
//! pages back before their frames are reused.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │        Callers (heap files, indexes, record managers)           │
//! └─────────────────────────────────────────────────────────────────┘
//!        read_page / unpin_page / alloc_page / dispose_page / flush_file
//!                              ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Buffer Manager (buffer/)                                       │
//! │    FrameDesc[N] + Page[N]   PageTable   ClockReplacer   Stats   │
//! └─────────────────────────────────────────────────────────────────┘
//!                              ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Storage (storage/)                                             │
//! │    PagedFile trait  →  SharedFile handles  →  DiskFile          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, FileId, Error, config)
//! - [`buffer`] - The buffer manager, frame descriptors, page table, CLOCK
//! - [`storage`] - Pages and the paged-file contract
//!
//! # Logging
//! Events are emitted through [`tracing`]; install a subscriber to see them.
//!
//! # Quick Start
//! ```no_run
//! use clockbuf::storage::{DiskFile, SharedFile};
//! use clockbuf::BufferManager;
//!
//! let file = SharedFile::new(DiskFile::create("my_table.db").unwrap());
//! let mut bufmgr = BufferManager::new(64);
//!
//! let (page_id, page) = bufmgr.alloc_page(&file).unwrap();
//! page.as_mut_slice()[..5].copy_from_slice(b"hello");
//! bufmgr.unpin_page(&file, page_id, true).unwrap();
//! bufmgr.flush_file(&file).unwrap();
//! ```

pub mod buffer;
pub mod common;
pub mod storage;

pub use common::config::PAGE_SIZE;
pub use common::{Error, FileId, FrameId, PageId, PageKey, Result};

pub use buffer::{BufferManager, BufferPoolStats, FrameState, PageIndex, PageTable};
pub use storage::{DiskFile, Page, PagedFile, SharedFile};

//! Common types shared across the crate.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants
//! - Error types
//! - Identifiers (PageId, FrameId, FileId, PageKey)

pub mod config;
pub mod error;
mod file_id;
mod frame_id;
mod page_id;

pub use error::{Error, Result};
pub use file_id::{FileId, PageKey};
pub use frame_id::FrameId;
pub use page_id::PageId;

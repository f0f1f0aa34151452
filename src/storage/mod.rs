//! Storage layer - pages and the files that hold them.
//!
//! The buffer manager consumes storage only through [`PagedFile`]:
//! - [`Page`] - The raw 4KB data container
//! - [`PagedFile`] / [`SharedFile`] - The file-handle contract
//! - [`DiskFile`] - A paged file backed by a real file on disk

mod disk_file;
mod page;
mod paged_file;

pub use disk_file::DiskFile;
pub use page::Page;
pub use paged_file::{PagedFile, SharedFile};

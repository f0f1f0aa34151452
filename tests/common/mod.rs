//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use clockbuf::{Page, PageId, PagedFile, SharedFile, PAGE_SIZE};
use parking_lot::Mutex;

/// Everything a [`MockFile`] was asked to do.
#[derive(Debug, Default)]
pub struct FileLog {
    pub reads: Vec<PageId>,
    /// Successful writes with the bytes written.
    pub writes: Vec<(PageId, Vec<u8>)>,
    pub failed_writes: usize,
    pub disposed: Vec<PageId>,
}

impl FileLog {
    pub fn written_pages(&self) -> Vec<PageId> {
        self.writes.iter().map(|(page_id, _)| *page_id).collect()
    }
}

/// Switches that make the next calls of a [`MockFile`] fail.
#[derive(Debug, Default)]
pub struct Faults {
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub fail_allocate: bool,
    pub fail_dispose: bool,
}

/// In-memory paged file with call logging and fault injection.
pub struct MockFile {
    pages: HashMap<PageId, Vec<u8>>,
    next: u32,
    log: Arc<Mutex<FileLog>>,
    faults: Arc<Mutex<Faults>>,
}

fn injected(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("injected {} failure", what))
}

impl PagedFile for MockFile {
    fn read_page(&mut self, page_id: PageId, page: &mut Page) -> io::Result<()> {
        if self.faults.lock().fail_reads {
            return Err(injected("read"));
        }
        let data = self
            .pages
            .get(&page_id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such page"))?;
        page.as_mut_slice().copy_from_slice(data);
        self.log.lock().reads.push(page_id);
        Ok(())
    }

    fn write_page(&mut self, page_id: PageId, page: &Page) -> io::Result<()> {
        if self.faults.lock().fail_writes {
            self.log.lock().failed_writes += 1;
            return Err(injected("write"));
        }
        self.pages.insert(page_id, page.as_slice().to_vec());
        self.log
            .lock()
            .writes
            .push((page_id, page.as_slice().to_vec()));
        Ok(())
    }

    fn allocate_page(&mut self) -> io::Result<PageId> {
        if self.faults.lock().fail_allocate {
            return Err(injected("allocate"));
        }
        let page_id = PageId::new(self.next);
        self.next += 1;
        self.pages.insert(page_id, vec![0u8; PAGE_SIZE]);
        Ok(page_id)
    }

    fn dispose_page(&mut self, page_id: PageId) -> io::Result<()> {
        if self.faults.lock().fail_dispose {
            return Err(injected("dispose"));
        }
        self.pages.remove(&page_id);
        self.log.lock().disposed.push(page_id);
        Ok(())
    }
}

/// A [`MockFile`] registered as a [`SharedFile`], plus handles on its log
/// and fault switches.
pub struct Mock {
    pub file: SharedFile,
    pub log: Arc<Mutex<FileLog>>,
    pub faults: Arc<Mutex<Faults>>,
}

/// An empty mock file.
pub fn mock_file() -> Mock {
    mock_file_with_pages(0)
}

/// A mock file holding pages `0..n`; byte 0 of page `i` is `i as u8`.
pub fn mock_file_with_pages(n: u32) -> Mock {
    let log = Arc::new(Mutex::new(FileLog::default()));
    let faults = Arc::new(Mutex::new(Faults::default()));

    let pages = (0..n)
        .map(|i| {
            let mut data = vec![0u8; PAGE_SIZE];
            data[0] = i as u8;
            (PageId::new(i), data)
        })
        .collect();

    let file = MockFile {
        pages,
        next: n,
        log: Arc::clone(&log),
        faults: Arc::clone(&faults),
    };

    Mock {
        file: SharedFile::new(file),
        log,
        faults,
    }
}

/// Write a string to page data.
pub fn copy_string(data: &mut [u8], s: &str) {
    let bytes = s.as_bytes();
    data[..bytes.len()].copy_from_slice(bytes);
    data[bytes.len()] = 0; // null terminator
}

/// Read a null-terminated string from page data.
pub fn read_string(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).to_string()
}

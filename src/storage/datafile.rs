//! Data File Reader
//!
//! Shared read-only handle to one data file.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::Result;

/// Read handle for a single data file
///
/// Opened once per file and shared (behind `Arc`) by every key entry that
/// points into it. The seek+read pair is serialised by an internal mutex, so
/// readers only need `&self`.
#[derive(Debug)]
pub struct DataFile {
    id: u64,
    path: PathBuf,
    file: Mutex<File>,
}

impl DataFile {
    /// Open an existing data file for reading
    pub fn open(path: &Path, id: u64) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            id,
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Read exactly `len` bytes starting at `offset`
    ///
    /// A short read (e.g. the file was truncated externally) surfaces as an
    /// `UnexpectedEof` I/O error.
    pub fn read_at(&self, offset: u64, len: u64) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len as usize];

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buf)?;

        Ok(buf)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

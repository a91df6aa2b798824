//! Active File Writer
//!
//! The single writable data file. Every append is fsync'd before it is
//! acknowledged.

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;

use super::{data_file_path, DataFile};

/// Exclusively owned writable handle for the active data file
///
/// Holds the write cursor and a shared read handle to the same file, which is
/// what key entries pointing into this file reference.
#[derive(Debug)]
pub struct ActiveFile {
    id: u64,
    path: PathBuf,
    /// Write handle (never shared)
    file: File,
    /// Byte offset where the next record will be written
    write_offset: u64,
    /// Read handle handed out to key entries
    reader: Arc<DataFile>,
    /// Set when a failed append could not be rolled back
    poisoned: bool,
}

impl ActiveFile {
    /// Create a brand new data file with the given id
    ///
    /// Fails if a file with that id already exists.
    pub fn create(dir: &Path, id: u64) -> Result<Self> {
        let path = data_file_path(dir, id);

        let file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        sync_dir(dir)?;

        let reader = Arc::new(DataFile::open(&path, id)?);

        tracing::debug!("Created data file {}", path.display());

        Ok(Self {
            id,
            path,
            file,
            write_offset: 0,
            reader,
            poisoned: false,
        })
    }

    /// Append `bytes` and fsync. Returns the offset the bytes were written at.
    ///
    /// On failure the file is truncated back to the previous cursor so the log
    /// never holds a partial record. If that also fails, the writer refuses
    /// all further appends.
    pub fn append(&mut self, bytes: &[u8]) -> Result<u64> {
        if self.poisoned {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("data file {} is unusable after a failed write", self.id),
            )
            .into());
        }

        let offset = self.write_offset;

        let written = self.file.write_all(bytes).and_then(|_| self.file.sync_all());
        if let Err(e) = written {
            tracing::error!("Append to data file {} failed at offset {}: {}", self.id, offset, e);
            self.rollback(offset);
            return Err(e.into());
        }

        self.write_offset += bytes.len() as u64;
        Ok(offset)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Would appending `size` more bytes exceed `max_file_size`?
    ///
    /// An empty file never needs rotating, so a record larger than the limit
    /// still lands somewhere.
    pub fn needs_rotation(&self, size: u64, max_file_size: u64) -> bool {
        self.write_offset > 0 && self.write_offset + size > max_file_size
    }

    /// Shared read handle for this file
    pub fn reader(&self) -> Arc<DataFile> {
        Arc::clone(&self.reader)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_offset(&self) -> u64 {
        self.write_offset
    }

    #[cfg(test)]
    pub(crate) fn replace_handle(&mut self, file: File) {
        self.file = file;
    }

    fn rollback(&mut self, offset: u64) {
        let restored = self
            .file
            .set_len(offset)
            .and_then(|_| self.file.seek(SeekFrom::Start(offset)))
            .and_then(|_| self.file.sync_all());

        if let Err(e) = restored {
            tracing::error!("Could not roll back data file {} to offset {}: {}", self.id, offset, e);
            self.poisoned = true;
        }
    }
}

/// Persist a newly created directory entry
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

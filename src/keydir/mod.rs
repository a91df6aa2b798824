//! KeyDir Module
//!
//! In-memory index from key to the on-disk location of its latest record.
//!
//! ## Responsibilities
//! - O(1) key → location lookups
//! - Last write (by append order) wins
//! - Deleted keys are absent
//!
//! ## Data Structure Choice
//! A plain `HashMap` with no internal locking: the engine owns the KeyDir
//! and decides how it is guarded. Values are never cached, only locations.

mod table;

use std::sync::Arc;

pub use table::KeyDir;

use crate::storage::DataFile;

/// Location of a key's current record
#[derive(Debug, Clone)]
pub struct KeyEntry {
    /// Write timestamp (seconds since the Unix epoch)
    pub timestamp: u32,

    /// Shared read handle of the file holding the record
    pub file: Arc<DataFile>,

    /// Byte offset of the record start within `file`
    pub offset: u64,

    /// Total encoded record size (header + key + value)
    pub size: u64,
}

impl KeyEntry {
    pub fn new(timestamp: u32, file: Arc<DataFile>, offset: u64, size: u64) -> Self {
        Self {
            timestamp,
            file,
            offset,
            size,
        }
    }

    /// Id of the data file holding the record
    pub fn file_id(&self) -> u64 {
        self.file.id()
    }
}

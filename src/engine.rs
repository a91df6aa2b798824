//! Engine Module
//!
//! The Bitcask-style storage engine that coordinates all components.
//!
//! ## Responsibilities
//! - Append records to the active data file (fsync before acknowledging)
//! - Rotate the active file when it grows past `max_file_size`
//! - Serve reads through the KeyDir with checksum verification
//! - Rebuild the KeyDir on startup by replaying every data file

use std::collections::BTreeMap;
use std::fs;
use std::mem;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::{Mutex, RwLock};

use crate::config::Config;
use crate::error::{CaskError, Result};
use crate::keydir::{KeyDir, KeyEntry};
use crate::record::Record;
use crate::storage::{self, ActiveFile, DataFile, DataFileIterator, FIRST_FILE_ID};

/// The main storage engine
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (set/delete/rotation): Serialized by the `writer` mutex
///   - Only ONE append at a time
///   - Lock order: writer → keydir (write)
///   - The KeyDir is updated while the writer lock is still held, so index
///     order always equals append order
///
/// - **Reads** (get/list_keys): Never touch the writer lock
///   - KeyDir read lock is held only to clone the entry
///   - File reads go through the entry's shared `DataFile` handle
pub struct DiskStore {
    /// Engine configuration
    config: Config,

    /// Active file and open read handles
    writer: Mutex<WriterState>,

    /// Key → location index
    keydir: RwLock<KeyDir>,

    /// What startup replay found
    replay_stats: ReplayStats,
}

/// State owned by the single writer
struct WriterState {
    /// The only writable data file
    active: ActiveFile,

    /// Read handle for every data file, active one included
    files: BTreeMap<u64, Arc<DataFile>>,
}

/// Result of replaying the data directory at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Number of data files scanned
    pub files_replayed: u64,

    /// Number of records read (live and tombstones)
    pub records_replayed: u64,

    /// Number of tombstones among them
    pub tombstones_replayed: u64,

    /// Keys present in the index once replay finished
    pub live_keys: u64,
}

impl DiskStore {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if it doesn't exist
    /// 2. Replay every data file in ascending id order into the KeyDir
    /// 3. Create a fresh active file with the next id
    ///
    /// Any corrupt or truncated record aborts the open.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        // Step 1: Create data directory if it doesn't exist
        fs::create_dir_all(&config.data_dir)?;

        // Step 2: Replay existing data files, oldest first
        let mut keydir = KeyDir::new();
        let mut files = BTreeMap::new();
        let mut stats = ReplayStats::default();

        for (id, path) in storage::list_data_files(&config.data_dir)? {
            let file = Arc::new(DataFile::open(&path, id)?);
            replay_file(&mut keydir, &file, &mut stats)?;
            files.insert(id, file);
        }
        stats.live_keys = keydir.len() as u64;

        // Step 3: Start a new active file after the newest existing one
        let active_id = match files.keys().next_back() {
            Some(&newest) => next_file_id(newest)?,
            None => FIRST_FILE_ID,
        };
        let active = ActiveFile::create(&config.data_dir, active_id)?;
        files.insert(active_id, active.reader());

        tracing::info!(
            "Opened {}: {} files replayed, {} records ({} tombstones), {} live keys, active file {}",
            config.data_dir.display(),
            stats.files_replayed,
            stats.records_replayed,
            stats.tombstones_replayed,
            stats.live_keys,
            active_id
        );

        Ok(Self {
            config,
            writer: Mutex::new(WriterState {
                active,
                files,
            }),
            keydir: RwLock::new(keydir),
            replay_stats: stats,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let mut config = Config::default();
        config.data_dir = path.to_path_buf();
        Self::open(config)
    }

    /// Get the value stored for a key
    ///
    /// Fails with `KeyNotFound` for keys never written or deleted, and with
    /// `ChecksumMismatch` if the record on disk has been corrupted.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let entry = self.keydir.read().get(key).cloned().ok_or(CaskError::KeyNotFound)?;

        let raw = entry.file.read_at(entry.offset, entry.size)?;
        let record = Record::decode(&raw)?;

        if !record.verify(&raw) {
            return Err(CaskError::ChecksumMismatch {
                file_id: entry.file_id(),
                offset: entry.offset,
            });
        }

        if record.key != key || record.is_tombstone() {
            return Err(CaskError::Decode(format!(
                "Index points at a different record in data file {} at offset {}",
                entry.file_id(),
                entry.offset
            )));
        }

        Ok(record.value)
    }

    /// Store a key-value pair
    ///
    /// Steps:
    /// 1. Validate key and value (no I/O on failure)
    /// 2. Acquire writer lock, rotate if needed
    /// 3. Append + fsync
    /// 4. Point the KeyDir at the new record
    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.validate_key(key)?;
        self.validate_value(value)?;

        let record = Record::new(key.to_vec(), value.to_vec(), unix_timestamp());
        self.append(record)
    }

    /// Delete a key
    ///
    /// Appends a tombstone with the same durability as `set`, then drops the
    /// key from the KeyDir. Deleting an absent key is not an error.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.validate_key(key)?;

        let record = Record::tombstone(key.to_vec(), unix_timestamp());
        self.append(record)
    }

    /// Snapshot of all live keys (no ordering guarantee)
    pub fn list_keys(&self) -> Vec<Vec<u8>> {
        self.keydir.read().keys()
    }

    /// Close the store
    ///
    /// Syncs the active file, then releases every file handle. Handles are
    /// released even if the sync fails; the sync error is returned.
    pub fn close(self) -> Result<()> {
        let DiskStore {
            config,
            writer,
            keydir,
            ..
        } = self;

        let mut writer = writer.into_inner();
        let result = writer.active.sync();
        if let Err(e) = &result {
            tracing::error!("Failed to sync active file {} on close: {}", writer.active.id(), e);
        }

        // Entries hold the last references to rotated files
        drop(keydir);
        drop(writer);

        tracing::info!("Closed {}", config.data_dir.display());
        result
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Id of the file currently receiving writes
    pub fn active_file_id(&self) -> u64 {
        self.writer.lock().active.id()
    }

    /// Number of data files, active one included
    pub fn file_count(&self) -> usize {
        self.writer.lock().files.len()
    }

    /// Number of live keys
    pub fn key_count(&self) -> usize {
        self.keydir.read().len()
    }

    /// What startup replay found
    pub fn replay_stats(&self) -> &ReplayStats {
        &self.replay_stats
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Durably append a record and apply it to the KeyDir
    fn append(&self, record: Record) -> Result<()> {
        let bytes = record.encode();
        let size = bytes.len() as u64;

        let mut writer = self.writer.lock();

        if writer.active.needs_rotation(size, self.config.max_file_size) {
            self.rotate(&mut writer)?;
        }

        let offset = writer.active.append(&bytes)?;

        let mut keydir = self.keydir.write();
        if record.is_tombstone() {
            keydir.remove(&record.key);
            tracing::debug!("Deleted key ({} bytes) at {}:{}", record.key.len(), writer.active.id(), offset);
        } else {
            let entry = KeyEntry::new(record.timestamp(), writer.active.reader(), offset, size);
            keydir.put(record.key, entry);
            tracing::trace!("Wrote {} bytes at {}:{}", size, writer.active.id(), offset);
        }

        Ok(())
    }

    /// Swap in a new active file (called with writer lock held)
    fn rotate(&self, writer: &mut WriterState) -> Result<()> {
        let id = next_file_id(writer.active.id())?;
        let next = ActiveFile::create(&self.config.data_dir, id)?;

        writer.files.insert(id, next.reader());
        let previous = mem::replace(&mut writer.active, next);

        tracing::info!(
            "Rotated data file {} ({} bytes) → {}",
            previous.id(),
            previous.write_offset(),
            id
        );
        Ok(())
    }

    fn validate_key(&self, key: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(CaskError::Validation("key must not be empty".to_string()));
        }
        if key.len() > self.config.max_key_size {
            return Err(CaskError::Validation(format!(
                "key is {} bytes, limit is {}",
                key.len(),
                self.config.max_key_size
            )));
        }
        Ok(())
    }

    fn validate_value(&self, value: &[u8]) -> Result<()> {
        if value.is_empty() {
            return Err(CaskError::Validation("value must not be empty".to_string()));
        }
        if value.len() > self.config.max_value_size {
            return Err(CaskError::Validation(format!(
                "value is {} bytes, limit is {}",
                value.len(),
                self.config.max_value_size
            )));
        }
        Ok(())
    }
}

/// Replay one data file into the KeyDir
///
/// Live records overwrite any earlier entry; tombstones remove the key.
/// Files must be replayed in ascending id order for last-write-wins to hold.
fn replay_file(keydir: &mut KeyDir, file: &Arc<DataFile>, stats: &mut ReplayStats) -> Result<()> {
    let mut records = DataFileIterator::open(file.path(), file.id())?;

    for item in records.by_ref() {
        let (offset, record) = item?;
        stats.records_replayed += 1;

        if record.is_tombstone() {
            stats.tombstones_replayed += 1;
            keydir.remove(&record.key);
        } else {
            let entry = KeyEntry::new(record.timestamp(), Arc::clone(file), offset, record.size());
            keydir.put(record.key, entry);
        }
    }

    stats.files_replayed += 1;
    tracing::debug!("Replayed data file {} ({} bytes)", file.id(), records.offset());
    Ok(())
}

/// Id that follows `id`, failing once the id space is exhausted
fn next_file_id(id: u64) -> Result<u64> {
    id.checked_add(1)
        .ok_or_else(|| CaskError::Decode(format!("data file id {} has no successor", id)))
}

/// Seconds since the Unix epoch, saturating at `u32::MAX`
fn unix_timestamp() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().min(u32::MAX as u64) as u32)
        .unwrap_or(0)
}

//! Storage Module
//!
//! Data files on disk: naming, read handles, the active writer and replay scans.
//!
//! ## Responsibilities
//! - Map numeric file ids to `<id>.bitcask.data` paths and back
//! - Discover existing data files in ascending id order
//! - One shared read-only handle per file (`DataFile`)
//! - One exclusively owned writable handle for the active file (`ActiveFile`)
//! - Sequential record scans for startup replay (`DataFileIterator`)
//!
//! ## Directory Layout
//! ```text
//! {data_dir}/
//!   ├── 1000000000.bitcask.data   ─┐
//!   ├── 1000000001.bitcask.data    │ immutable once rotated
//!   └── 1000000002.bitcask.data   ─┘ active (append + fsync)
//! ```

mod active;
mod datafile;
mod iterator;

use std::fs;
use std::path::{Path, PathBuf};

pub use active::ActiveFile;
pub use datafile::DataFile;
pub use iterator::DataFileIterator;

use crate::error::Result;

/// Suffix shared by every data file
pub const DATA_FILE_SUFFIX: &str = ".bitcask.data";

/// Id given to the first data file of an empty directory
pub const FIRST_FILE_ID: u64 = 1_000_000_000;

/// Path of the data file with the given id
pub fn data_file_path(dir: &Path, id: u64) -> PathBuf {
    dir.join(format!("{}{}", id, DATA_FILE_SUFFIX))
}

/// Parse a data file id from its filename
/// "1000000042.bitcask.data" → Some(1000000042)
pub fn parse_file_id(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let id_str = name.strip_suffix(DATA_FILE_SUFFIX)?;
    if id_str.is_empty() || !id_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // One canonical name per id
    if id_str.len() > 1 && id_str.starts_with('0') {
        return None;
    }
    id_str.parse().ok()
}

/// List data files in `dir`, sorted by ascending id
///
/// Directories are skipped silently; other files that don't parse as data
/// files are skipped with a warning.
pub fn list_data_files(dir: &Path) -> Result<Vec<(u64, PathBuf)>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            continue;
        }

        match parse_file_id(&path) {
            Some(id) => files.push((id, path)),
            None => tracing::warn!("Ignoring unrecognised file in data directory: {}", path.display()),
        }
    }

    files.sort_by_key(|(id, _)| *id);
    Ok(files)
}

//! Record Module
//!
//! On-disk record format shared by the write path, the read path and replay.
//!
//! ## Responsibilities
//! - Fixed-size header so a reader knows the body length without look-ahead
//! - CRC32 checksums for corruption detection
//! - Tombstone flag for deletes
//!
//! ## File Format
//! Records are written back-to-back with no delimiters. All integers are
//! little-endian.
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ Record 1                                                             │
//! │ ┌─────────┬─────────┬─────────┬─────────┬─────────┬───────┬────────┐ │
//! │ │ CRC (4) │ TS (4)  │KeyLen(4)│ValLen(4)│Flags (1)│  Key  │ Value  │ │
//! │ └─────────┴─────────┴─────────┴─────────┴─────────┴───────┴────────┘ │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │ Record 2 ...                                                         │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CRC covers every byte after the CRC field itself: the remaining header
//! fields, the key and the value.

mod entry;
mod header;

pub use entry::Record;
pub use header::{Header, FLAG_TOMBSTONE, HEADER_SIZE};

/// Offset of the first byte covered by the checksum
pub(crate) const CHECKSUM_SIZE: usize = 4;

/// CRC32 over a byte slice
pub fn checksum(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

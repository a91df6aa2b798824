//! Record header
//!
//! Fixed 17-byte header preceding every key/value body.

use bytes::BufMut;

use crate::error::{CaskError, Result};

/// Header size: CRC (4) + Timestamp (4) + KeyLen (4) + ValLen (4) + Flags (1) = 17 bytes
pub const HEADER_SIZE: usize = 17;

/// Flags bit marking a tombstone (deleted key)
pub const FLAG_TOMBSTONE: u8 = 0x01;

/// Decoded record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// CRC32 of everything after this field
    pub checksum: u32,

    /// Seconds since the Unix epoch at write time
    pub timestamp: u32,

    pub key_size: u32,

    /// Zero for tombstones
    pub value_size: u32,

    pub tombstone: bool,
}

impl Header {
    /// Decode a header from the first `HEADER_SIZE` bytes of `bytes`
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CaskError::Decode(format!(
                "Incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let flags = bytes[16];
        if flags & !FLAG_TOMBSTONE != 0 {
            return Err(CaskError::Decode(format!("Unknown header flags: 0x{:02x}", flags)));
        }

        Ok(Self {
            checksum: read_u32(bytes, 0),
            timestamp: read_u32(bytes, 4),
            key_size: read_u32(bytes, 8),
            value_size: read_u32(bytes, 12),
            tombstone: flags & FLAG_TOMBSTONE != 0,
        })
    }

    /// Append the encoded header to `buf`
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u32_le(self.checksum);
        buf.put_u32_le(self.timestamp);
        buf.put_u32_le(self.key_size);
        buf.put_u32_le(self.value_size);
        buf.put_u8(if self.tombstone { FLAG_TOMBSTONE } else { 0 });
    }

    /// Length of key + value following the header
    pub fn body_size(&self) -> u64 {
        self.key_size as u64 + self.value_size as u64
    }

    /// Total encoded size of the record this header describes
    pub fn record_size(&self) -> u64 {
        HEADER_SIZE as u64 + self.body_size()
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

//! Record definitions
//!
//! A single key/value record (or tombstone) and its encode/decode/verify logic.

use crate::error::{CaskError, Result};

use super::{checksum, Header, CHECKSUM_SIZE, HEADER_SIZE};

/// A single record in a data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub header: Header,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Record {
    /// Create a live record. The checksum is filled in here.
    ///
    /// Callers validate sizes beforehand; lengths are stored as u32.
    pub fn new(key: Vec<u8>, value: Vec<u8>, timestamp: u32) -> Self {
        Self::build(key, value, timestamp, false)
    }

    /// Create a tombstone (empty value, deletion flag set)
    pub fn tombstone(key: Vec<u8>, timestamp: u32) -> Self {
        Self::build(key, Vec::new(), timestamp, true)
    }

    fn build(key: Vec<u8>, value: Vec<u8>, timestamp: u32, tombstone: bool) -> Self {
        let header = Header {
            checksum: 0,
            timestamp,
            key_size: key.len() as u32,
            value_size: value.len() as u32,
            tombstone,
        };
        let mut record = Self { header, key, value };
        record.header.checksum = record.compute_checksum();
        record
    }

    /// Serialize to bytes: header, then key, then value
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.size() as usize);
        self.header.encode_into(&mut buf);
        buf.extend_from_slice(&self.key);
        buf.extend_from_slice(&self.value);
        buf
    }

    /// Deserialize a record from the front of `bytes`
    ///
    /// Does not verify the checksum; see [`Record::verify`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = Header::decode(bytes)?;

        let record_size = header.record_size();
        if (bytes.len() as u64) < record_size {
            return Err(CaskError::Decode(format!(
                "Record truncated: header declares {} bytes, got {}",
                record_size,
                bytes.len()
            )));
        }

        let key_end = HEADER_SIZE + header.key_size as usize;
        let value_end = key_end + header.value_size as usize;

        Ok(Self {
            header,
            key: bytes[HEADER_SIZE..key_end].to_vec(),
            value: bytes[key_end..value_end].to_vec(),
        })
    }

    /// Recompute the checksum over `raw` and compare with the embedded one
    pub fn verify(&self, raw: &[u8]) -> bool {
        let size = self.size() as usize;
        if raw.len() < size {
            return false;
        }
        checksum(&raw[CHECKSUM_SIZE..size]) == self.header.checksum
    }

    /// Encoded size in bytes
    pub fn size(&self) -> u64 {
        (HEADER_SIZE + self.key.len() + self.value.len()) as u64
    }

    pub fn is_tombstone(&self) -> bool {
        self.header.tombstone
    }

    pub fn timestamp(&self) -> u32 {
        self.header.timestamp
    }

    /// Checksum over the header fields after the CRC, plus key and value
    fn compute_checksum(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        let mut fields = Vec::with_capacity(HEADER_SIZE);
        self.header.encode_into(&mut fields);
        hasher.update(&fields[CHECKSUM_SIZE..]);
        hasher.update(&self.key);
        hasher.update(&self.value);
        hasher.finalize()
    }
}

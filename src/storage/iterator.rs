//! Data File Iterator
//!
//! Sequential scan over every record in a data file, used by startup replay.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::{CaskError, Result};
use crate::record::{Header, Record, HEADER_SIZE};

/// Iterator over `(offset, record)` pairs in file order
///
/// Every record is checksum-verified. Iteration ends at a clean end of file;
/// a truncated or corrupt record yields one error and then ends.
pub struct DataFileIterator {
    file_id: u64,
    reader: BufReader<File>,
    /// File size at open time (bounds declared record sizes)
    file_len: u64,
    /// Offset of the next record
    current_offset: u64,
    done: bool,
}

impl DataFileIterator {
    /// Open a data file for scanning from offset zero
    pub fn open(path: &Path, file_id: u64) -> Result<Self> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();

        Ok(Self {
            file_id,
            reader: BufReader::new(file),
            file_len,
            current_offset: 0,
            done: false,
        })
    }

    /// Offset just past the last record read
    pub fn offset(&self) -> u64 {
        self.current_offset
    }

    fn read_record(&mut self) -> Result<Option<(u64, Record)>> {
        let offset = self.current_offset;

        let mut header_buf = [0u8; HEADER_SIZE];
        let filled = read_full(&mut self.reader, &mut header_buf)?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < HEADER_SIZE {
            return Err(CaskError::Decode(format!(
                "Truncated header in data file {} at offset {}: {} of {} bytes",
                self.file_id, offset, filled, HEADER_SIZE
            )));
        }

        let header = Header::decode(&header_buf)?;
        let record_size = header.record_size();
        if offset + record_size > self.file_len {
            return Err(CaskError::Decode(format!(
                "Truncated record in data file {} at offset {}: declares {} bytes, {} remain",
                self.file_id,
                offset,
                record_size,
                self.file_len - offset
            )));
        }

        let mut raw = Vec::with_capacity(record_size as usize);
        raw.extend_from_slice(&header_buf);
        raw.resize(record_size as usize, 0);
        self.reader.read_exact(&mut raw[HEADER_SIZE..]).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                CaskError::Decode(format!(
                    "Truncated record in data file {} at offset {}",
                    self.file_id, offset
                ))
            } else {
                CaskError::Io(e)
            }
        })?;

        let record = Record::decode(&raw)?;
        if !record.verify(&raw) {
            return Err(CaskError::ChecksumMismatch {
                file_id: self.file_id,
                offset,
            });
        }

        self.current_offset += record_size;
        Ok(Some((offset, record)))
    }
}

impl Iterator for DataFileIterator {
    type Item = Result<(u64, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_record() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Fill `buf` as far as possible; returns bytes read (0 only at end of file)
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

//! Tests for ActiveFile
//!
//! These tests verify:
//! - Creation refuses to clobber an existing file
//! - Appends return the offset they were written at
//! - Written bytes are visible through the shared read handle
//! - Rotation threshold logic

use std::fs;

use caskkv::record::Record;
use caskkv::storage::{data_file_path, ActiveFile};
use caskkv::CaskError;
use tempfile::TempDir;

// =============================================================================
// Create Tests
// =============================================================================

#[test]
fn test_create_new_file() {
    let temp = TempDir::new().unwrap();

    let active = ActiveFile::create(temp.path(), 1_000_000_000).unwrap();

    assert_eq!(active.id(), 1_000_000_000);
    assert_eq!(active.write_offset(), 0);
    assert!(data_file_path(temp.path(), 1_000_000_000).exists());
    assert_eq!(active.path(), data_file_path(temp.path(), 1_000_000_000));
}

#[test]
fn test_create_refuses_existing_file() {
    let temp = TempDir::new().unwrap();
    fs::write(data_file_path(temp.path(), 5), b"precious").unwrap();

    let result = ActiveFile::create(temp.path(), 5);

    assert!(matches!(result, Err(CaskError::Io(_))));
    assert_eq!(fs::read(data_file_path(temp.path(), 5)).unwrap(), b"precious");
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_append_returns_offsets() {
    let temp = TempDir::new().unwrap();
    let mut active = ActiveFile::create(temp.path(), 1).unwrap();

    let first = Record::new(b"a".to_vec(), b"one".to_vec(), 0).encode();
    let second = Record::new(b"b".to_vec(), b"two".to_vec(), 0).encode();

    assert_eq!(active.append(&first).unwrap(), 0);
    assert_eq!(active.append(&second).unwrap(), first.len() as u64);
    assert_eq!(active.write_offset(), (first.len() + second.len()) as u64);
}

#[test]
fn test_appended_bytes_readable_via_reader() {
    let temp = TempDir::new().unwrap();
    let mut active = ActiveFile::create(temp.path(), 1).unwrap();
    let reader = active.reader();

    let bytes = Record::new(b"key".to_vec(), b"value".to_vec(), 0).encode();
    let offset = active.append(&bytes).unwrap();

    assert_eq!(reader.read_at(offset, bytes.len() as u64).unwrap(), bytes);
    assert_eq!(reader.len().unwrap(), bytes.len() as u64);
}

#[test]
fn test_appended_bytes_on_disk() {
    let temp = TempDir::new().unwrap();
    let mut active = ActiveFile::create(temp.path(), 1).unwrap();

    active.append(b"abc").unwrap();
    active.append(b"def").unwrap();
    active.sync().unwrap();

    assert_eq!(fs::read(active.path()).unwrap(), b"abcdef");
}

// =============================================================================
// Rotation Threshold Tests
// =============================================================================

#[test]
fn test_empty_file_never_needs_rotation() {
    let temp = TempDir::new().unwrap();
    let active = ActiveFile::create(temp.path(), 1).unwrap();

    assert!(!active.needs_rotation(1_000, 10));
}

#[test]
fn test_needs_rotation_when_exceeding_limit() {
    let temp = TempDir::new().unwrap();
    let mut active = ActiveFile::create(temp.path(), 1).unwrap();
    active.append(&[0u8; 60]).unwrap();

    assert!(!active.needs_rotation(40, 100)); // exactly at the limit is fine
    assert!(active.needs_rotation(41, 100));
}

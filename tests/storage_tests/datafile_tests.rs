//! Tests for data file naming and DataFile reads
//!
//! These tests verify:
//! - Discovery of data files in ascending id order
//! - Foreign files and directories are skipped
//! - Positional reads, including short reads

use std::fs;
use std::io::ErrorKind;

use caskkv::storage::{data_file_path, list_data_files, parse_file_id, DataFile, FIRST_FILE_ID};
use caskkv::CaskError;
use tempfile::TempDir;

// =============================================================================
// Naming Tests
// =============================================================================

#[test]
fn test_first_file_id() {
    assert_eq!(FIRST_FILE_ID, 1_000_000_000);
}

#[test]
fn test_data_file_name() {
    let temp = TempDir::new().unwrap();
    let path = data_file_path(temp.path(), FIRST_FILE_ID);

    assert_eq!(path.file_name().unwrap(), "1000000000.bitcask.data");
    assert_eq!(parse_file_id(&path), Some(FIRST_FILE_ID));
}

// =============================================================================
// Discovery Tests
// =============================================================================

#[test]
fn test_list_empty_directory() {
    let temp = TempDir::new().unwrap();
    assert!(list_data_files(temp.path()).unwrap().is_empty());
}

#[test]
fn test_list_sorts_numerically() {
    let temp = TempDir::new().unwrap();
    for id in [12u64, 3, 100, 1_000_000_000] {
        fs::write(data_file_path(temp.path(), id), b"").unwrap();
    }

    let ids: Vec<u64> = list_data_files(temp.path()).unwrap().into_iter().map(|(id, _)| id).collect();

    // Numeric order, not lexicographic ("100" < "12" as strings)
    assert_eq!(ids, vec![3, 12, 100, 1_000_000_000]);
}

#[test]
fn test_list_skips_foreign_files_and_dirs() {
    let temp = TempDir::new().unwrap();
    fs::write(data_file_path(temp.path(), 5), b"").unwrap();
    fs::write(temp.path().join("notes.txt"), b"hello").unwrap();
    fs::create_dir(temp.path().join("7.bitcask.data")).unwrap();

    let files = list_data_files(temp.path()).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].0, 5);
}

// =============================================================================
// Read Tests
// =============================================================================

#[test]
fn test_read_at() {
    let temp = TempDir::new().unwrap();
    let path = data_file_path(temp.path(), 1);
    fs::write(&path, b"0123456789").unwrap();

    let file = DataFile::open(&path, 1).unwrap();

    assert_eq!(file.id(), 1);
    assert_eq!(file.read_at(3, 4).unwrap(), b"3456");
    assert_eq!(file.read_at(0, 10).unwrap(), b"0123456789");
}

#[test]
fn test_read_past_end_is_io_error() {
    let temp = TempDir::new().unwrap();
    let path = data_file_path(temp.path(), 1);
    fs::write(&path, b"short").unwrap();

    let file = DataFile::open(&path, 1).unwrap();
    let result = file.read_at(2, 10);

    match result {
        Err(CaskError::Io(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
        other => panic!("expected UnexpectedEof, got {:?}", other),
    }
}

#[test]
fn test_open_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let result = DataFile::open(&data_file_path(temp.path(), 9), 9);
    assert!(matches!(result, Err(CaskError::Io(_))));
}

//! Tests for data file rotation
//!
//! These tests verify:
//! - A small max file size forces rotation
//! - Reads, overwrites and deletes stay correct across rotation boundaries
//! - A single record never spans two files
//! - Rotated state replays correctly after restart

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use caskkv::record::HEADER_SIZE;
use caskkv::storage::{list_data_files, FIRST_FILE_ID};
use caskkv::{CaskError, Config, DiskStore};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// Each "kNN" → "vNN" record is HEADER_SIZE + 3 + 3 bytes
const RECORD_SIZE: u64 = (HEADER_SIZE + 6) as u64;

fn open_small(dir: &Path, max_file_size: u64) -> DiskStore {
    let config = Config::builder().data_dir(dir).max_file_size(max_file_size).build();
    DiskStore::open(config).unwrap()
}

fn key(i: usize) -> Vec<u8> {
    format!("k{:02}", i).into_bytes()
}

fn value(i: usize) -> Vec<u8> {
    format!("v{:02}", i).into_bytes()
}

// =============================================================================
// Rotation Tests
// =============================================================================

#[test]
fn test_rotation_creates_new_files() {
    let temp = TempDir::new().unwrap();
    // Room for exactly two records per file
    let store = open_small(temp.path(), 2 * RECORD_SIZE);

    for i in 0..5 {
        store.set(&key(i), &value(i)).unwrap();
    }

    assert_eq!(store.file_count(), 3);
    assert_eq!(store.active_file_id(), FIRST_FILE_ID + 2);

    let sizes: Vec<u64> = list_data_files(temp.path())
        .unwrap()
        .iter()
        .map(|(_, path)| fs::metadata(path).unwrap().len())
        .collect();
    assert_eq!(sizes, vec![2 * RECORD_SIZE, 2 * RECORD_SIZE, RECORD_SIZE]);
}

#[test]
fn test_round_trip_across_rotation() {
    let temp = TempDir::new().unwrap();
    let store = open_small(temp.path(), 2 * RECORD_SIZE);

    for i in 0..10 {
        store.set(&key(i), &value(i)).unwrap();
    }

    for i in 0..10 {
        assert_eq!(store.get(&key(i)).unwrap(), value(i));
    }
}

#[test]
fn test_last_write_wins_across_rotation() {
    let temp = TempDir::new().unwrap();
    let store = open_small(temp.path(), 2 * RECORD_SIZE);

    store.set(b"k00", b"old").unwrap();
    for i in 1..6 {
        store.set(&key(i), &value(i)).unwrap();
    }
    store.set(b"k00", b"new").unwrap();

    assert!(store.file_count() > 2);
    assert_eq!(store.get(b"k00").unwrap(), b"new");
}

#[test]
fn test_list_keys_spans_all_files() {
    let temp = TempDir::new().unwrap();
    let store = open_small(temp.path(), 2 * RECORD_SIZE);

    for i in 0..7 {
        store.set(&key(i), &value(i)).unwrap();
    }
    store.delete(&key(3)).unwrap();

    let keys: HashSet<Vec<u8>> = store.list_keys().into_iter().collect();
    let expected: HashSet<Vec<u8>> = (0..7).filter(|&i| i != 3).map(key).collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_oversized_record_gets_own_file() {
    let temp = TempDir::new().unwrap();
    let store = open_small(temp.path(), 64);

    store.set(b"small", b"x").unwrap();
    let big = vec![7u8; 500];
    store.set(b"big", &big).unwrap();
    store.set(b"after", b"y").unwrap();

    assert_eq!(store.get(b"big").unwrap(), big);
    assert_eq!(store.get(b"small").unwrap(), b"x");
    assert_eq!(store.get(b"after").unwrap(), b"y");

    // small | big | after: the big record is never split
    let files = list_data_files(temp.path()).unwrap();
    assert_eq!(files.len(), 3);
    let big_len = fs::metadata(&files[1].1).unwrap().len();
    assert_eq!(big_len, (HEADER_SIZE + 3 + 500) as u64);
}

#[test]
fn test_rotated_state_survives_restart() {
    let temp = TempDir::new().unwrap();

    {
        let store = open_small(temp.path(), 2 * RECORD_SIZE);
        for i in 0..8 {
            store.set(&key(i), &value(i)).unwrap();
        }
        store.set(&key(1), b"x01").unwrap();
        store.delete(&key(2)).unwrap();
        store.close().unwrap();
    }

    let store = open_small(temp.path(), 2 * RECORD_SIZE);
    assert_eq!(store.get(&key(1)).unwrap(), b"x01");
    assert!(matches!(store.get(&key(2)), Err(CaskError::KeyNotFound)));
    assert_eq!(store.get(&key(7)).unwrap(), value(7));
    assert_eq!(store.key_count(), 7);
}

#[test]
fn test_ids_continue_after_restart() {
    let temp = TempDir::new().unwrap();

    let last_id = {
        let store = open_small(temp.path(), RECORD_SIZE);
        for i in 0..3 {
            store.set(&key(i), &value(i)).unwrap();
        }
        let id = store.active_file_id();
        store.close().unwrap();
        id
    };

    let store = open_small(temp.path(), RECORD_SIZE);
    assert_eq!(store.active_file_id(), last_id + 1);
}

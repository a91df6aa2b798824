//! KeyDir implementation
//!
//! HashMap-based index; synchronisation is the caller's job.

use std::collections::HashMap;

use super::KeyEntry;

/// In-memory key → location index
#[derive(Debug, Default)]
pub struct KeyDir {
    entries: HashMap<Vec<u8>, KeyEntry>,
}

impl KeyDir {
    /// Create a new empty KeyDir
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up the current entry for a key
    pub fn get(&self, key: &[u8]) -> Option<&KeyEntry> {
        self.entries.get(key)
    }

    /// Insert or overwrite the entry for a key, returning the previous one
    pub fn put(&mut self, key: Vec<u8>, entry: KeyEntry) -> Option<KeyEntry> {
        self.entries.insert(key, entry)
    }

    /// Remove a key, returning its entry if it was present
    pub fn remove(&mut self, key: &[u8]) -> Option<KeyEntry> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// All present keys (no ordering guarantee)
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Column width cache.
//!
//! Keyed by `(column id, dataset length)`: in-place value edits that keep the
//! row count reuse an entry. Entries are never evicted one by one; a zoom or
//! device-pixel-ratio change clears the whole cache.

use std::collections::HashMap;

/// Cache key: column id plus the dataset length at measurement time.
pub type WidthKey = (String, usize);

/// Measured column widths in whole px.
#[derive(Debug, Default, Clone)]
pub struct ColumnWidthCache {
    entries: HashMap<WidthKey, u32>,
}

impl ColumnWidthCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column_id: &str, dataset_len: usize) -> Option<u32> {
        self.entries
            .get(&(column_id.to_string(), dataset_len))
            .copied()
    }

    /// Insert a width. An existing entry is kept as is.
    ///
    /// Returns `true` if the entry was newly inserted.
    pub fn insert(&mut self, column_id: &str, dataset_len: usize, width: u32) -> bool {
        let key = (column_id.to_string(), dataset_len);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, width);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

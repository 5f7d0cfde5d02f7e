//! Table implementation
//!
//! HashMap-based store; all synchronization lives outside.

use std::collections::HashMap;

use super::Record;

/// Key/value table holding one [`Record`] per key
#[derive(Debug, Default)]
pub struct Table {
    records: HashMap<String, Record>,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, overwriting any existing value for the key
    pub fn insert(&mut self, key: &str, value: u32) {
        match self.records.get_mut(key) {
            Some(record) => record.value = value,
            None => {
                self.records.insert(key.to_string(), Record::new(key, value));
            }
        }
    }

    /// Remove a key if present
    ///
    /// Returns the removed record; an absent key is a no-op.
    pub fn delete(&mut self, key: &str) -> Option<Record> {
        self.records.remove(key)
    }

    /// Look up a key
    pub fn search(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Visit every record in print order: ascending `(hash, key)`
    pub fn for_each_in_print_order<F>(&self, mut f: F)
    where
        F: FnMut(&Record),
    {
        let mut ordered: Vec<&Record> = self.records.values().collect();
        ordered.sort_by(|a, b| (a.hash, &a.key).cmp(&(b.hash, &b.key)));
        for record in ordered {
            f(record);
        }
    }

    /// Owned copy of all records in print order
    pub fn snapshot(&self) -> Vec<Record> {
        let mut out = Vec::with_capacity(self.records.len());
        self.for_each_in_print_order(|r| out.push(r.clone()));
        out
    }
}

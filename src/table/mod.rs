//! Table Module
//!
//! The key/value store protected by the reader-writer lock.
//!
//! ## Responsibilities
//! - Insert-or-overwrite, delete, and point lookups
//! - Deterministic traversal for printing
//!
//! ## Data Structure Choice
//! A `HashMap` keyed by name gives expected O(1) point operations. Print
//! order is `(hash, key)`, computed on demand, so output is reproducible for
//! a fixed table state regardless of the map's internal layout.
//!
//! The table has no synchronization of its own: callers reach it through
//! [`crate::sync::RwLock`] guards only.

mod hash;
mod map;

pub use hash::jenkins_one_at_a_time;
pub use map::Table;

/// A record stored in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Jenkins one-at-a-time hash of `key`
    pub hash: u32,

    /// The record's key
    pub key: String,

    /// The stored value
    pub value: u32,
}

impl Record {
    /// Build a record, computing the key hash
    pub fn new(key: impl Into<String>, value: u32) -> Self {
        let key = key.into();
        Self {
            hash: jenkins_one_at_a_time(key.as_bytes()),
            key,
            value,
        }
    }
}

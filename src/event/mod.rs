//! Event Module
//!
//! Timestamped notifications emitted as commands cross lock and gate
//! boundaries. Events are observability only: nothing in the core reads
//! them back, and a [`NullSink`] runs the same batch unchanged.
//!
//! ## Line Format
//! ```text
//! <timestamp>: <message>
//! ```
//! Multi-line messages (table snapshots) are written as one block.

mod clock;
mod sink;

pub use clock::{Clock, ManualClock, SystemClock};
pub use sink::{EventSink, MemorySink, NullSink, WriterSink};

use std::fmt;

/// What an event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// A command began executing
    Command,

    /// A lock was acquired or released
    Lock,

    /// A thread waited on, or was admitted through, an admission gate
    Admission,

    /// Output produced by a search or print
    Result,
}

/// A single timestamped event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Clock reading when the event was produced
    pub timestamp: u64,

    /// Event category
    pub category: EventCategory,

    /// Human-readable description
    pub message: String,
}

impl Event {
    pub fn new(timestamp: u64, category: EventCategory, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.timestamp, self.message)
    }
}

// =============================================================================
// Well-known Messages
// =============================================================================

pub const READ_LOCK_ACQUIRED: &str = "READ LOCK ACQUIRED";
pub const READ_LOCK_RELEASED: &str = "READ LOCK RELEASED";
pub const WRITE_LOCK_ACQUIRED: &str = "WRITE LOCK ACQUIRED";
pub const WRITE_LOCK_RELEASED: &str = "WRITE LOCK RELEASED";

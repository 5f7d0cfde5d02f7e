//! # GateKV
//!
//! A concurrent batch processor for a shared key-value table:
//! - One thread per command (insert, delete, search, print)
//! - Writer-preferring reader-writer lock built from a mutex and condvars
//! - Per-kind admission gates capping in-flight inserts and deletes at one
//! - Timestamped event log of every gate and lock transition
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Command File / CLI                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one thread per command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Runner                                │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │ insert / delete                  │ search / print
//!            ▼                                  │
//!   ┌─────────────────┐                         │
//!   │ AdmissionGate   │  (one per kind, cap 1)  │
//!   └────────┬────────┘                         │
//!            ▼                                  ▼
//!   ┌──────────────────────────────────────────────────┐
//!   │        RwLock<Table>  (writer preference)        │
//!   └──────────────────────────────────────────────────┘
//!                       │
//!                       ▼
//!                ┌─────────────┐        ┌─────────────┐
//!                │    Table    │        │  EventSink  │ (own mutex)
//!                └─────────────┘        └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod table;
pub mod sync;
pub mod command;
pub mod event;
pub mod runner;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{GateError, Result};
pub use config::Config;
pub use command::{Command, Operation};
pub use runner::{run, Outcome, RunReport, Runner};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of GateKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Error types for GateKV
//!
//! The synchronization core never fails; these errors belong to the
//! surrounding glue (command files, output sinks, thread orchestration).

use thiserror::Error;

/// Result type alias using GateError
pub type Result<T> = std::result::Result<T, GateError>;

/// Unified error type for GateKV operations
#[derive(Debug, Error)]
pub enum GateError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Command File Errors
    // -------------------------------------------------------------------------
    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Command thread panicked: {0}")]
    ThreadPanicked(String),
}

impl GateError {
    /// Build a parse error for a 1-based line number
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        GateError::Parse {
            line,
            reason: reason.into(),
        }
    }
}

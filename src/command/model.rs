//! Command definitions

use std::fmt;
use std::str::FromStr;

/// Operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Insert,
    Delete,
    Search,
    Print,
}

impl Operation {
    /// Whether the operation mutates the table
    pub fn is_write(self) -> bool {
        matches!(self, Operation::Insert | Operation::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Insert => "INSERT",
            Operation::Delete => "DELETE",
            Operation::Search => "SEARCH",
            Operation::Print => "PRINT",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "insert" => Ok(Operation::Insert),
            "delete" => Ok(Operation::Delete),
            "search" => Ok(Operation::Search),
            "print" => Ok(Operation::Print),
            other => Err(format!("unknown operation '{}'", other)),
        }
    }
}

/// A single command, owned by the thread that executes it
///
/// `value` is only meaningful for [`Operation::Insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub operation: Operation,
    pub key: String,
    pub value: u32,
}

impl Command {
    pub fn new(operation: Operation, key: impl Into<String>, value: u32) -> Self {
        Self {
            operation,
            key: key.into(),
            value,
        }
    }

    pub fn insert(key: impl Into<String>, value: u32) -> Self {
        Self::new(Operation::Insert, key, value)
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Self::new(Operation::Delete, key, 0)
    }

    pub fn search(key: impl Into<String>) -> Self {
        Self::new(Operation::Search, key, 0)
    }

    pub fn print() -> Self {
        Self::new(Operation::Print, "", 0)
    }
}

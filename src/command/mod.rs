//! Command Module
//!
//! Command values and the command-file format.
//!
//! ## File Format
//! ```text
//! threads,<count>,0          (optional header)
//! insert,<key>,<value>
//! delete,<key>,0
//! search,<key>,0
//! print,0,0
//! ```
//! Three comma-separated fields per line, whitespace around fields ignored,
//! blank lines skipped, operation names case-insensitive.

mod model;
mod parser;

pub use model::{Command, Operation};
pub use parser::{parse_commands, read_commands, CommandBatch};

//! Command-file parser

use std::fs;
use std::path::Path;

use crate::error::{GateError, Result};

use super::{Command, Operation};

/// Commands read from a file, plus the thread count its header declared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBatch {
    /// Count from a `threads,<count>,0` header, if present
    pub declared_threads: Option<usize>,

    /// Commands in file order
    pub commands: Vec<Command>,
}

/// Read and parse a command file
pub fn read_commands(path: &Path) -> Result<CommandBatch> {
    let text = fs::read_to_string(path)?;
    parse_commands(&text)
}

/// Parse command-file text
pub fn parse_commands(text: &str) -> Result<CommandBatch> {
    let mut batch = CommandBatch::default();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(GateError::parse(
                line_no,
                format!("expected 3 fields, found {}", fields.len()),
            ));
        }

        if fields[0].eq_ignore_ascii_case("threads") {
            if batch.declared_threads.is_some() || !batch.commands.is_empty() {
                return Err(GateError::parse(line_no, "threads header must be the first line"));
            }
            let count = fields[1]
                .parse::<usize>()
                .map_err(|_| GateError::parse(line_no, format!("invalid thread count '{}'", fields[1])))?;
            batch.declared_threads = Some(count);
            continue;
        }

        let operation: Operation = fields[0]
            .parse()
            .map_err(|reason: String| GateError::parse(line_no, reason))?;

        let command = match operation {
            Operation::Insert => {
                let value = fields[2]
                    .parse::<u32>()
                    .map_err(|_| GateError::parse(line_no, format!("invalid value '{}'", fields[2])))?;
                Command::insert(require_key(line_no, fields[1])?, value)
            }
            Operation::Delete => Command::delete(require_key(line_no, fields[1])?),
            Operation::Search => Command::search(require_key(line_no, fields[1])?),
            Operation::Print => Command::print(),
        };
        batch.commands.push(command);
    }

    if let Some(declared) = batch.declared_threads {
        if declared != batch.commands.len() {
            tracing::warn!(
                "Header declares {} threads but file has {} commands",
                declared,
                batch.commands.len()
            );
        }
    }

    Ok(batch)
}

fn require_key(line_no: usize, key: &str) -> Result<String> {
    if key.is_empty() {
        return Err(GateError::parse(line_no, "missing key"));
    }
    Ok(key.to_string())
}

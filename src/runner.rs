//! Runner Module
//!
//! Executes commands against the shared table, one thread per command.
//!
//! ## Responsibilities
//! - Route writes through their admission gate, then the write lock
//! - Route reads through the read lock
//! - Emit a timestamped event at every gate and lock boundary
//! - Drive a whole batch and report lock counters and the final table

use std::any::Any;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use crate::command::{read_commands, Command, Operation};
use crate::config::Config;
use crate::error::{GateError, Result};
use crate::event::{self, Clock, Event, EventCategory, EventSink, SystemClock, WriterSink};
use crate::sync::{Admission, AdmissionGate, LockStats, RwLock, WakeOrder};
use crate::table::{Record, Table};

/// Result of executing one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Insert completed (new key or overwrite)
    Inserted,

    /// Delete completed; `removed` is false when the key was absent
    Deleted { removed: bool },

    /// Search hit
    Found(Record),

    /// Search miss
    NotFound,

    /// Print snapshot, in print order
    Printed(Vec<Record>),
}

/// Per-command execution over a shared table
///
/// ## Concurrency Model: gate, then lock
///
/// - **Writes** (insert/delete): admitted through the gate for their kind
///   (at most one admitted insert and one admitted delete), then take the
///   table lock in writer mode. The gate is left only after the lock is
///   released.
///
/// - **Reads** (search/print): take the table lock in reader mode directly.
///
/// The runner is `Sync`; every entry point may be called from any thread.
pub struct Runner {
    /// The shared table, reachable only through lock guards
    table: RwLock<Table>,

    /// Admission for inserts
    inserts: AdmissionGate,

    /// Admission for deletes
    deletes: AdmissionGate,

    /// Event destination
    sink: Arc<dyn EventSink>,

    /// Event timestamps
    clock: Arc<dyn Clock>,
}

impl Runner {
    /// Create a runner with an empty table
    pub fn new(wake_order: WakeOrder, sink: Arc<dyn EventSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RwLock::new(Table::new()),
            inserts: AdmissionGate::new("inserts", wake_order),
            deletes: AdmissionGate::new("deletes", wake_order),
            sink,
            clock,
        }
    }

    /// Create a runner using the system clock and FIFO admission
    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        Self::new(WakeOrder::default(), sink, Arc::new(SystemClock))
    }

    /// Execute a command
    ///
    /// Routes commands to the matching entry point
    pub fn execute(&self, command: &Command) -> Outcome {
        match command.operation {
            Operation::Insert => {
                self.run_insert(command);
                Outcome::Inserted
            }
            Operation::Delete => Outcome::Deleted {
                removed: self.run_delete(command),
            },
            Operation::Search => match self.run_search(command) {
                Some(record) => Outcome::Found(record),
                None => Outcome::NotFound,
            },
            Operation::Print => Outcome::Printed(self.run_print()),
        }
    }

    /// Insert or overwrite `command.key`
    ///
    /// Steps:
    /// 1. Enter the insert gate
    /// 2. Acquire the write lock
    /// 3. Write to the table
    /// 4. Release the lock, then leave the gate
    pub fn run_insert(&self, command: &Command) {
        let record = Record::new(command.key.as_str(), command.value);
        self.emit(
            EventCategory::Command,
            format!("INSERT,{},{},{}", record.hash, record.key, record.value),
        );

        let admission = self.admit(&self.inserts, Operation::Insert);
        {
            let mut table = self.table.write();
            self.emit(EventCategory::Lock, event::WRITE_LOCK_ACQUIRED);
            table.insert(&command.key, command.value);
        }
        self.emit(EventCategory::Lock, event::WRITE_LOCK_RELEASED);

        drop(admission);
        self.emit(EventCategory::Admission, "INSERT SIGNAL SENT");
    }

    /// Delete `command.key`; returns whether a record was removed
    pub fn run_delete(&self, command: &Command) -> bool {
        self.emit(EventCategory::Command, format!("DELETE,{}", command.key));

        let admission = self.admit(&self.deletes, Operation::Delete);
        let removed = {
            let mut table = self.table.write();
            self.emit(EventCategory::Lock, event::WRITE_LOCK_ACQUIRED);
            table.delete(&command.key).is_some()
        };
        self.emit(EventCategory::Lock, event::WRITE_LOCK_RELEASED);

        drop(admission);
        self.emit(EventCategory::Admission, "DELETE SIGNAL SENT");

        removed
    }

    /// Look up `command.key`
    pub fn run_search(&self, command: &Command) -> Option<Record> {
        self.emit(EventCategory::Command, format!("SEARCH,{}", command.key));

        let found = {
            let table = self.table.read();
            self.emit(EventCategory::Lock, event::READ_LOCK_ACQUIRED);
            table.search(&command.key).cloned()
        };
        self.emit(EventCategory::Lock, event::READ_LOCK_RELEASED);

        match &found {
            Some(record) => self.emit(
                EventCategory::Result,
                format!("{},{},{}", record.hash, record.key, record.value),
            ),
            None => self.emit(EventCategory::Result, "NO RECORD FOUND"),
        }

        found
    }

    /// Snapshot the whole table in print order
    pub fn run_print(&self) -> Vec<Record> {
        self.emit(EventCategory::Command, "PRINT");

        let snapshot = {
            let table = self.table.read();
            self.emit(EventCategory::Lock, event::READ_LOCK_ACQUIRED);
            let snapshot = table.snapshot();
            self.emit(EventCategory::Result, format_snapshot(&snapshot));
            snapshot
        };
        self.emit(EventCategory::Lock, event::READ_LOCK_RELEASED);

        snapshot
    }

    /// Run every command on its own thread and wait for all of them
    ///
    /// Outcomes are returned in command order.
    pub fn run_batch(&self, commands: &[Command]) -> Result<Vec<Outcome>> {
        tracing::debug!("Spawning {} command threads", commands.len());

        let joined = crossbeam::scope(|scope| -> Result<Vec<Outcome>> {
            let mut handles = Vec::with_capacity(commands.len());
            for (id, command) in commands.iter().enumerate() {
                let handle = scope
                    .builder()
                    .name(format!("cmd-{}", id))
                    .spawn(move |_| self.execute(command))?;
                handles.push(handle);
            }

            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .map_err(|e| GateError::ThreadPanicked(panic_message(e.as_ref())))
                })
                .collect::<Result<Vec<_>>>()
        });

        joined.map_err(|e| GateError::ThreadPanicked(panic_message(e.as_ref())))?
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Lock acquisition/release counters
    pub fn lock_stats(&self) -> LockStats {
        self.table.stats()
    }

    /// Current table contents in print order
    pub fn snapshot(&self) -> Vec<Record> {
        self.table.read().snapshot()
    }

    /// End-of-run summary: lock counters followed by the final table
    ///
    /// Reads the table under the lock, so the counters are taken first and
    /// exclude the summary's own read.
    pub fn summary_lines(&self) -> Vec<String> {
        let stats = self.lock_stats();
        let snapshot = self.snapshot();

        let mut lines = Vec::with_capacity(snapshot.len() + 3);
        lines.push(format!("Number of lock acquisitions: {}", stats.acquisitions));
        lines.push(format!("Number of lock releases: {}", stats.releases));
        lines.push("Final Table:".to_string());
        lines.extend(
            snapshot
                .iter()
                .map(|r| format!("{},{},{}", r.hash, r.key, r.value)),
        );
        lines
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// The insert admission gate
    pub fn insert_gate(&self) -> &AdmissionGate {
        &self.inserts
    }

    /// The delete admission gate
    pub fn delete_gate(&self) -> &AdmissionGate {
        &self.deletes
    }

    /// The table lock
    pub fn table_lock(&self) -> &RwLock<Table> {
        &self.table
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn admit<'a>(&self, gate: &'a AdmissionGate, op: Operation) -> Admission<'a> {
        let waiting = match op {
            Operation::Insert => "WAITING ON INSERTS",
            _ => "WAITING ON DELETES",
        };
        let admission = gate.enter_with(|| self.emit(EventCategory::Admission, waiting));
        self.emit(EventCategory::Admission, format!("{} AWAKENED", op));
        admission
    }

    fn emit(&self, category: EventCategory, message: impl Into<String>) {
        let event = Event::new(self.clock.now(), category, message);
        tracing::trace!(category = ?event.category, "{}", event.message);
        self.sink.record(event);
    }
}

fn format_snapshot(records: &[Record]) -> String {
    let mut out = format!("TABLE SNAPSHOT ({} records)", records.len());
    for r in records {
        out.push_str(&format!("\n{},{},{}", r.hash, r.key, r.value));
    }
    out
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

// =============================================================================
// Batch Entry Point
// =============================================================================

/// Statistics from a completed batch
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Outcomes in command order
    pub outcomes: Vec<Outcome>,

    /// Lock counters after the batch
    pub lock_stats: LockStats,

    /// Final table contents in print order
    pub final_table: Vec<Record>,
}

/// Run the command file named by `config`, writing events to its output
pub fn run(config: &Config) -> Result<RunReport> {
    config.validate()?;

    let batch = read_commands(&config.input_path)?;
    tracing::info!(
        "Loaded {} commands from {}",
        batch.commands.len(),
        config.input_path.display()
    );

    let out: Box<dyn Write + Send> = match &config.output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    let sink = Arc::new(WriterSink::new(out));

    let runner = Runner::new(config.wake_order, sink.clone(), Arc::new(SystemClock));
    let outcomes = runner.run_batch(&batch.commands)?;

    let lock_stats = runner.lock_stats();
    if config.write_summary {
        sink.write_lines(runner.summary_lines())?;
    }
    sink.flush();

    tracing::info!(
        "Batch complete: {} lock acquisitions, {} releases",
        lock_stats.acquisitions,
        lock_stats.releases
    );

    Ok(RunReport {
        outcomes,
        lock_stats,
        final_table: runner.snapshot(),
    })
}

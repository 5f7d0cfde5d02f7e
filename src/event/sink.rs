//! Event sinks
//!
//! Every sink serializes its own output with a private mutex, independent of
//! the table lock.

use std::io::Write;

use parking_lot::Mutex;

use super::{Event, EventCategory};

/// Consumer of timestamped events
pub trait EventSink: Send + Sync {
    /// Append one event. Sinks must not fail the caller.
    fn record(&self, event: Event);

    /// Flush buffered output, if any
    fn flush(&self) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: Event) {}
}

/// Collects events in memory, in the order they were recorded
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events recorded so far
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Messages of one category, in recording order
    pub fn messages(&self, category: EventCategory) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: Event) {
        self.events.lock().push(event);
    }
}

/// Writes `<timestamp>: <message>` lines to any `Write`
pub struct WriterSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Write raw lines without a timestamp (used for run summaries)
    pub fn write_lines<I, S>(&self, lines: I) -> std::io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = self.out.lock();
        for line in lines {
            writeln!(out, "{}", line.as_ref())?;
        }
        Ok(())
    }

    /// Consume the sink, returning the writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> EventSink for WriterSink<W> {
    fn record(&self, event: Event) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", event) {
            tracing::warn!("Failed to write event {:?}: {}", event.category, e);
        }
    }

    fn flush(&self) {
        if let Err(e) = self.out.lock().flush() {
            tracing::warn!("Failed to flush event sink: {}", e);
        }
    }
}

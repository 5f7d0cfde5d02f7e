//! Configuration for GateKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{GateError, Result};
use crate::sync::WakeOrder;

/// Main configuration for a GateKV batch run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Input / Output
    // -------------------------------------------------------------------------
    /// Command file to execute
    pub input_path: PathBuf,

    /// Where events are written; `None` writes to stdout
    pub output_path: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Synchronization
    // -------------------------------------------------------------------------
    /// Order in which same-kind writers are admitted through their gate
    pub wake_order: WakeOrder,

    // -------------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------------
    /// Append lock counters and the final table after the batch completes
    pub write_summary: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("commands.txt"),
            output_path: Some(PathBuf::from("output.txt")),
            wake_order: WakeOrder::Fifo,
            write_summary: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the configuration before a run
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(GateError::Config("input path is empty".to_string()));
        }
        if let Some(output) = &self.output_path {
            if output.as_os_str().is_empty() {
                return Err(GateError::Config("output path is empty".to_string()));
            }
            if output == &self.input_path {
                return Err(GateError::Config(
                    "output path must differ from input path".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the command file path
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input_path = path.into();
        self
    }

    /// Set the output file path
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = Some(path.into());
        self
    }

    /// Write events to stdout instead of a file
    pub fn stdout(mut self) -> Self {
        self.config.output_path = None;
        self
    }

    /// Set the admission wake order
    pub fn wake_order(mut self, order: WakeOrder) -> Self {
        self.config.wake_order = order;
        self
    }

    /// Enable or disable the end-of-run summary
    pub fn write_summary(mut self, enabled: bool) -> Self {
        self.config.write_summary = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

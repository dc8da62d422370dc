//! Configuration types for the tracker

use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};

/// Default number of work items dispatched per batch
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// How a run is driven to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Loop over batches in a single call until no queued work remains
    Serial,
    /// One batch per call; the caller schedules follow-up ticks
    Triggered,
}

/// Main tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Execution mode
    pub mode: ExecutionMode,

    /// Maximum number of work items per batch
    pub batch_size: usize,

    /// Whether calls to the green-hosting lookup service are permitted.
    /// Those calls go to a third party, so they are opt-in.
    pub allow_green_domain_calls: bool,
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self {
            mode: ExecutionMode::Serial,
            batch_size: DEFAULT_BATCH_SIZE,
            allow_green_domain_calls: false,
        }
    }

    /// Set the execution mode
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Permit green-hosting lookups
    pub fn allow_green_domain_calls(mut self, allow: bool) -> Self {
        self.allow_green_domain_calls = allow;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(SdkError::ConfigError(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}

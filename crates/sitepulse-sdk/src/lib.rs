//! SitePulse SDK
//!
//! High-level API for configuring and running tracker sweeps.

pub mod builder;
pub mod config;
pub mod error;
pub mod tracker;

// Re-export main types
pub use builder::TrackerBuilder;
pub use config::{ExecutionMode, TrackerConfig, DEFAULT_BATCH_SIZE};
pub use error::{Result, SdkError};
pub use tracker::{RunStatus, Tracker};

// Re-export commonly used types from dependencies
pub use sitepulse_core::{FieldDefinition, ItemStatus, Provider, Value};
pub use sitepulse_runtime::{
    ConfigStore, FileConfigStore, GreenDomainSource, MemoryStore, RecordSink, Transport,
};

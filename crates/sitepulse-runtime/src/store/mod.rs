//! Store collaborator contracts
//!
//! The runtime talks to its configuration source, its tabular result
//! destinations and the green-domain list through these traits. The
//! status column of the configuration store is the single source of
//! truth for what remains to be processed; the pipeline reads a fresh
//! snapshot before every batch and writes statuses back before issuing
//! external calls.

pub mod file;
mod memory;

pub use file::FileConfigStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::normalize::OutputRecord;
use async_trait::async_trait;
use sitepulse_core::{ConfiguredRow, FieldDefinition, ItemStatus, Provider};

/// One line of the extraction debug trail
#[derive(Debug, Clone)]
pub struct DebugEntry {
    /// Processing-date stamp
    pub date: String,
    pub label: String,
    pub url: String,
    pub device: String,
    pub mode: String,
    /// Rendered field error
    pub error: String,
}

/// Tabular read of work-item and field-definition configuration
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the current configuration snapshot, statuses included
    async fn load_rows(&self) -> Result<Vec<ConfiguredRow>>;

    /// Field definitions applicable to one provider
    async fn load_fields(&self, provider: Provider) -> Result<Vec<FieldDefinition>>;

    /// Persist a row's status and annotation
    async fn set_status(&self, row_id: usize, status: ItemStatus, note: Option<String>)
        -> Result<()>;

    /// API key for keyed providers, if configured
    async fn api_key(&self) -> Result<Option<String>>;
}

/// Append-only tabular destination for output records
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Append one record, mapped to the destination's declared column
    /// order; columns the record lacks default to empty
    async fn append(&self, provider: Provider, record: &OutputRecord) -> Result<()>;

    /// Append one line to the extraction debug trail
    async fn append_debug(&self, entry: &DebugEntry) -> Result<()>;
}

/// Supplier of the known sustainably-hosted domains
#[async_trait]
pub trait GreenDomainSource: Send + Sync {
    async fn green_domains(&self) -> Result<Vec<String>>;
}

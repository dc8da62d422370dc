//! SitePulse Runtime - Batch orchestration and field extraction
//!
//! This crate drives the measurement pipeline: it selects bounded batches
//! of work items, issues the external calls as one fan-out/fan-in step,
//! parses the responses, evaluates caller-defined extraction expressions
//! against them, normalizes the results into flat records (fanning
//! history-shaped responses out into one record per sample), and reports
//! per-item status back to the configuration store.

pub mod context;
pub mod controller;
pub mod error;
pub mod eval;
pub mod extract;
pub mod normalize;
pub mod parse;
pub mod provider;
pub mod schedule;
pub mod store;
pub mod transport;

#[cfg(test)]
mod tests;

// Re-export main types
pub use context::ExtractionContext;
pub use controller::RunController;
pub use error::{Result, RuntimeError};
pub use extract::{extract, ExtractionOutcome, FieldFailure};
pub use normalize::{normalize, OutputRecord};
pub use parse::{parse_response, ParseFailure};
pub use provider::{build_request, HttpMethod, RequestSpec};
pub use schedule::{init_statuses, select_batch, BatchSelection};
pub use store::{
    ConfigStore, DebugEntry, FileConfigStore, GreenDomainSource, MemoryStore, RecordSink,
};
pub use transport::{HttpTransport, Transport};

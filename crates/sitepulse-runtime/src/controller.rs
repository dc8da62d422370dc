//! Run controller
//!
//! Drives the pipeline: select a batch, issue the batch's external calls
//! as one fan-out/fan-in step, then per item parse, extract, normalize,
//! persist and report status. Item-level failures never abort the batch;
//! a bad item degrades to an annotated status, never an aborted run.
//!
//! The controller exposes one batch per call (`run_once`) for externally
//! scheduled, resumable execution, and a local loop (`run_to_completion`)
//! for synchronous runs. Batch N+1 is never built before batch N's
//! records are written and its statuses are terminal.

use crate::context::ExtractionContext;
use crate::error::Result;
use crate::extract::extract;
use crate::normalize::normalize;
use crate::parse::parse_response;
use crate::provider::{build_request, RequestSpec};
use crate::schedule::{has_queued_rows, init_statuses, select_batch};
use crate::store::{ConfigStore, DebugEntry, GreenDomainSource, RecordSink};
use crate::transport::Transport;
use sitepulse_core::{ItemStatus, Provider, WorkItem};
use std::sync::Arc;

/// Composes the scheduler, parser, extraction engine and normalizer over
/// the store and transport collaborators
pub struct RunController {
    config_store: Arc<dyn ConfigStore>,
    sink: Arc<dyn RecordSink>,
    green_domains: Arc<dyn GreenDomainSource>,
    transport: Arc<dyn Transport>,
    batch_size: usize,
}

impl RunController {
    pub fn new(
        config_store: Arc<dyn ConfigStore>,
        sink: Arc<dyn RecordSink>,
        green_domains: Arc<dyn GreenDomainSource>,
        transport: Arc<dyn Transport>,
        batch_size: usize,
    ) -> Self {
        Self {
            config_store,
            sink,
            green_domains,
            transport,
            batch_size,
        }
    }

    /// Reset every row for a fresh run and persist the new statuses
    pub async fn initialize(&self) -> Result<()> {
        tracing::info!("initializing run, resetting row statuses");
        let mut rows = self.config_store.load_rows().await?;
        init_statuses(&mut rows);
        for row in &rows {
            self.config_store
                .set_status(row.id, row.status, None)
                .await?;
        }
        Ok(())
    }

    /// Process one batch. Returns whether queued work remains.
    pub async fn run_once(&self, provider: Provider) -> Result<bool> {
        let mut rows = self.config_store.load_rows().await?;
        let selection = select_batch(&mut rows, self.batch_size);

        // Persist the in-flight markers before any external call goes out,
        // so an interrupted batch resumes instead of silently retrying.
        for row_id in &selection.marked_rows {
            self.config_store
                .set_status(*row_id, ItemStatus::InFlight, None)
                .await?;
        }

        if selection.items.is_empty() {
            tracing::info!(provider = %provider, "no queued work items");
            return Ok(false);
        }

        tracing::info!(
            provider = %provider,
            batch_len = selection.items.len(),
            "sending batch"
        );

        let api_key = self.config_store.api_key().await?;
        let fields = self.config_store.load_fields(provider).await?;
        let green = if provider.uses_green_domains() {
            self.green_domains.green_domains().await?
        } else {
            Vec::new()
        };
        let processed_on = today_stamp();

        // Items whose request cannot be built fail individually; the rest
        // of the batch still goes out.
        let mut pending: Vec<(WorkItem, RequestSpec)> = Vec::new();
        for item in selection.items {
            match build_request(provider, &item, api_key.as_deref()) {
                Ok(spec) => pending.push((item, spec)),
                Err(error) => {
                    tracing::warn!(row_id = item.row_id, %error, "cannot build request");
                    self.config_store
                        .set_status(
                            item.row_id,
                            ItemStatus::ProviderError,
                            Some(format!("Error: {}", error)),
                        )
                        .await?;
                }
            }
        }

        let specs: Vec<RequestSpec> = pending.iter().map(|(_, spec)| spec.clone()).collect();
        let responses = self.transport.fetch_all(&specs).await;

        for ((item, _), response) in pending.into_iter().zip(responses) {
            self.process_item(provider, item, response, &fields, &green, &processed_on)
                .await?;
        }

        Ok(has_queued_rows(&rows))
    }

    /// Initialize and loop until the active set is exhausted
    pub async fn run_to_completion(&self, provider: Provider) -> Result<()> {
        self.initialize().await?;
        while self.run_once(provider).await? {}
        tracing::info!(provider = %provider, "run finished");
        Ok(())
    }

    async fn process_item(
        &self,
        provider: Provider,
        item: WorkItem,
        response: Result<String>,
        fields: &[sitepulse_core::FieldDefinition],
        green: &[String],
        processed_on: &str,
    ) -> Result<()> {
        let body = match response {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(row_id = item.row_id, %error, "transport failure");
                self.config_store
                    .set_status(
                        item.row_id,
                        ItemStatus::ProviderError,
                        Some(format!("Error: {}", error)),
                    )
                    .await?;
                return Ok(());
            }
        };

        let content = match parse_response(&body) {
            Ok(content) => content,
            Err(failure) => {
                tracing::warn!(row_id = item.row_id, error = %failure, "unusable response");
                self.config_store
                    .set_status(
                        item.row_id,
                        failure.status(),
                        Some(format!("Error: {}", failure)),
                    )
                    .await?;
                return Ok(());
            }
        };

        let ctx = ExtractionContext::new(content, item.mode).with_green_domains(green);
        let outcome = extract(&ctx, fields);

        for failure in &outcome.failures {
            self.sink
                .append_debug(&DebugEntry {
                    date: processed_on.to_string(),
                    label: item.label.clone(),
                    url: item.target.clone(),
                    device: item.device.as_str().to_string(),
                    mode: item.mode.as_str().to_string(),
                    error: format!("{}: {}", failure.field, failure.error),
                })
                .await?;
        }

        let records = normalize(&outcome.values, &item, provider, processed_on);
        for record in &records {
            self.sink.append(provider, record).await?;
        }

        // Terminal status only after the records are durably written.
        self.config_store
            .set_status(item.row_id, ItemStatus::Succeeded, None)
            .await?;
        tracing::debug!(
            row_id = item.row_id,
            records = records.len(),
            "item completed"
        );
        Ok(())
    }
}

/// Processing-date stamp for output records and the debug trail
fn today_stamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

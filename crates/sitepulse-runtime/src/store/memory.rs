//! In-memory store
//!
//! Implements every store contract in memory. This is the reference
//! semantics for tests and development, not a durable backend.

use super::{ConfigStore, DebugEntry, GreenDomainSource, RecordSink};
use crate::error::{Result, RuntimeError};
use crate::normalize::OutputRecord;
use async_trait::async_trait;
use sitepulse_core::{ConfiguredRow, FieldDefinition, ItemStatus, Provider};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory configuration store, record sink and green-domain source
pub struct MemoryStore {
    api_key: Option<String>,
    rows: RwLock<Vec<ConfiguredRow>>,
    fields: RwLock<Vec<FieldDefinition>>,
    /// Declared column order per destination
    headers: HashMap<Provider, Vec<String>>,
    records: RwLock<Vec<(Provider, Vec<String>)>>,
    debug: RwLock<Vec<DebugEntry>>,
    green: RwLock<Vec<String>>,
}

impl MemoryStore {
    /// Create an empty store with no API key
    pub fn new() -> Self {
        Self {
            api_key: None,
            rows: RwLock::new(Vec::new()),
            fields: RwLock::new(Vec::new()),
            headers: HashMap::new(),
            records: RwLock::new(Vec::new()),
            debug: RwLock::new(Vec::new()),
            green: RwLock::new(Vec::new()),
        }
    }

    /// Set the API key used by keyed providers
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Replace the configuration rows
    pub fn with_rows(mut self, rows: Vec<ConfiguredRow>) -> Self {
        self.rows = RwLock::new(rows);
        self
    }

    /// Replace the field definitions
    pub fn with_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.fields = RwLock::new(fields);
        self
    }

    /// Declare the column order for one destination
    pub fn with_header(mut self, provider: Provider, columns: &[&str]) -> Self {
        self.headers
            .insert(provider, columns.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Seed the green-domain list
    pub fn with_green_domains(mut self, domains: Vec<String>) -> Self {
        self.green = RwLock::new(domains);
        self
    }

    /// Current status of one row (test observability)
    pub async fn row_status(&self, row_id: usize) -> Option<(ItemStatus, Option<String>)> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id == row_id)
            .map(|row| (row.status, row.note.clone()))
    }

    /// Records appended for one destination, as rendered cell rows
    pub async fn appended(&self, provider: Provider) -> Vec<Vec<String>> {
        self.records
            .read()
            .await
            .iter()
            .filter(|(p, _)| *p == provider)
            .map(|(_, cells)| cells.clone())
            .collect()
    }

    /// Debug trail contents (test observability)
    pub async fn debug_entries(&self) -> Vec<DebugEntry> {
        self.debug.read().await.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn load_rows(&self) -> Result<Vec<ConfiguredRow>> {
        Ok(self.rows.read().await.clone())
    }

    async fn load_fields(&self, provider: Provider) -> Result<Vec<FieldDefinition>> {
        Ok(self
            .fields
            .read()
            .await
            .iter()
            .filter(|field| field.provider == provider)
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        row_id: usize,
        status: ItemStatus,
        note: Option<String>,
    ) -> Result<()> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id == row_id)
            .ok_or_else(|| RuntimeError::Store(format!("unknown row id {}", row_id)))?;
        row.status = status;
        row.note = note;
        Ok(())
    }

    async fn api_key(&self) -> Result<Option<String>> {
        Ok(self.api_key.clone())
    }
}

#[async_trait]
impl RecordSink for MemoryStore {
    async fn append(&self, provider: Provider, record: &OutputRecord) -> Result<()> {
        let header = self.headers.get(&provider).ok_or_else(|| {
            RuntimeError::Store(format!("no destination header declared for {}", provider))
        })?;
        let cells = header.iter().map(|column| record.cell(column)).collect();
        self.records.write().await.push((provider, cells));
        Ok(())
    }

    async fn append_debug(&self, entry: &DebugEntry) -> Result<()> {
        self.debug.write().await.push(entry.clone());
        Ok(())
    }
}

#[async_trait]
impl GreenDomainSource for MemoryStore {
    async fn green_domains(&self) -> Result<Vec<String>> {
        Ok(self.green.read().await.clone())
    }
}

//! YAML-backed configuration store
//!
//! Loads work-item rows, field definitions and the API key from a YAML
//! file. Row ids are assigned from file order. Statuses are held in
//! memory; the file itself is never written.
//!
//! ```yaml
//! api_key: "your-key"
//! items:
//!   - label: Home
//!     target: https://example.com/
//!     devices: Mobile and Desktop
//!     mode: URL
//!     active: true
//! fields:
//!   - provider: psi_api
//!     name: LCP
//!     expression: content.lighthouseResult.audits["largest-contentful-paint"].numericValue
//! ```

use super::ConfigStore;
use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use serde::Deserialize;
use sitepulse_core::{ConfiguredRow, FieldDefinition, ItemStatus, Provider, QueryMode};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    items: Vec<ItemSpec>,
    #[serde(default)]
    fields: Vec<FieldDefinition>,
}

#[derive(Debug, Deserialize)]
struct ItemSpec {
    #[serde(default)]
    label: String,
    target: String,
    devices: String,
    mode: QueryMode,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

/// Read-only configuration store over a YAML file
pub struct FileConfigStore {
    api_key: Option<String>,
    rows: Vec<ConfiguredRow>,
    fields: Vec<FieldDefinition>,
    /// Status overlay, keyed by row id
    statuses: RwLock<HashMap<usize, (ItemStatus, Option<String>)>>,
}

impl FileConfigStore {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| RuntimeError::Store(format!("cannot read config file: {}", e)))?;
        Self::from_yaml(&text)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: FileConfig = serde_yaml::from_str(text)
            .map_err(|e| RuntimeError::Store(format!("invalid config file: {}", e)))?;

        let rows = config
            .items
            .into_iter()
            .enumerate()
            .map(|(id, item)| ConfiguredRow {
                id,
                label: item.label,
                target: item.target,
                devices: item.devices,
                mode: item.mode,
                active: item.active,
                status: ItemStatus::Idle,
                note: None,
            })
            .collect();

        Ok(Self {
            api_key: config.api_key,
            rows,
            fields: config.fields,
            statuses: RwLock::new(HashMap::new()),
        })
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load_rows(&self) -> Result<Vec<ConfiguredRow>> {
        let statuses = self.statuses.read().await;
        Ok(self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                if let Some((status, note)) = statuses.get(&row.id) {
                    row.status = *status;
                    row.note = note.clone();
                }
                row
            })
            .collect())
    }

    async fn load_fields(&self, provider: Provider) -> Result<Vec<FieldDefinition>> {
        Ok(self
            .fields
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
        if row_id >= self.rows.len() {
            return Err(RuntimeError::Store(format!("unknown row id {}", row_id)));
        }
        self.statuses.write().await.insert(row_id, (status, note));
        Ok(())
    }

    async fn api_key(&self) -> Result<Option<String>> {
        Ok(self.api_key.clone())
    }
}

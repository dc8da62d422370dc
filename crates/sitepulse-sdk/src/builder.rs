//! Builder pattern for Tracker

use crate::config::TrackerConfig;
use crate::error::{Result, SdkError};
use crate::tracker::Tracker;
use sitepulse_runtime::{
    ConfigStore, FileConfigStore, GreenDomainSource, HttpTransport, MemoryStore, RecordSink,
    RunController, Transport,
};
use std::path::Path;
use std::sync::Arc;

/// Builder for Tracker
///
/// # Example
///
/// ```rust,ignore
/// use sitepulse_sdk::{TrackerBuilder, TrackerConfig};
///
/// let tracker = TrackerBuilder::new()
///     .with_config_file("tracker.yaml")?
///     .with_sink(sheet_sink)
///     .build()?;
/// tracker.run(Provider::PsiApi).await?;
/// ```
pub struct TrackerBuilder {
    config: TrackerConfig,
    config_store: Option<Arc<dyn ConfigStore>>,
    sink: Option<Arc<dyn RecordSink>>,
    green_domains: Option<Arc<dyn GreenDomainSource>>,
    transport: Option<Arc<dyn Transport>>,
}

impl TrackerBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: TrackerConfig::default(),
            config_store: None,
            sink: None,
            green_domains: None,
            transport: None,
        }
    }

    /// Set the tracker configuration
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the configuration store (rows, field definitions, API key)
    pub fn with_config_store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    /// Load the configuration store from a YAML file
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let store = FileConfigStore::load(path.as_ref())?;
        self.config_store = Some(Arc::new(store));
        Ok(self)
    }

    /// Set the destination for output records and debug entries
    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the source of known green-hosted domains
    pub fn with_green_domains(mut self, source: Arc<dyn GreenDomainSource>) -> Self {
        self.green_domains = Some(source);
        self
    }

    /// Override the transport (tests use a scripted one)
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Wire everything together
    pub fn build(self) -> Result<Tracker> {
        self.config.validate()?;

        let config_store = self
            .config_store
            .ok_or_else(|| SdkError::ConfigError("no configuration store set".to_string()))?;
        let sink = self
            .sink
            .ok_or_else(|| SdkError::ConfigError("no record sink set".to_string()))?;
        let green_domains = self
            .green_domains
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };

        let controller = RunController::new(
            config_store,
            sink,
            green_domains,
            transport,
            self.config.batch_size,
        );
        Ok(Tracker::new(self.config, controller))
    }
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

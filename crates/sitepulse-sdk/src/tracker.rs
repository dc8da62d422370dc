//! High-level tracker API

use crate::config::{ExecutionMode, TrackerConfig};
use crate::error::{Result, SdkError};
use sitepulse_core::Provider;
use sitepulse_runtime::RunController;

/// Outcome of a single `run` or `resume` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No queued work remains for this provider
    Completed,
    /// At least one row is still queued; call `resume` to continue
    Pending,
}

/// Drives tracker sweeps for one provider at a time
pub struct Tracker {
    config: TrackerConfig,
    controller: RunController,
}

impl Tracker {
    pub(crate) fn new(config: TrackerConfig, controller: RunController) -> Self {
        Self {
            config,
            controller,
        }
    }

    /// Start a sweep: reset row statuses, then process batches.
    ///
    /// In serial mode this loops until every queued row is done and always
    /// returns `Completed`. In triggered mode it processes one batch and
    /// returns `Pending` when queued rows remain, leaving the rest for
    /// `resume` calls driven by an external scheduler.
    pub async fn run(&self, provider: Provider) -> Result<RunStatus> {
        self.check_provider(provider)?;
        tracing::info!(provider = %provider, mode = ?self.config.mode, "starting sweep");

        match self.config.mode {
            ExecutionMode::Serial => {
                self.controller.run_to_completion(provider).await?;
                Ok(RunStatus::Completed)
            }
            ExecutionMode::Triggered => {
                self.controller.initialize().await?;
                self.step(provider).await
            }
        }
    }

    /// Process one more batch of an already-started sweep. Statuses are not
    /// reset, so rows finished by earlier calls stay finished.
    pub async fn resume(&self, provider: Provider) -> Result<RunStatus> {
        self.check_provider(provider)?;
        self.step(provider).await
    }

    async fn step(&self, provider: Provider) -> Result<RunStatus> {
        let has_more = self.controller.run_once(provider).await?;
        if has_more {
            Ok(RunStatus::Pending)
        } else {
            Ok(RunStatus::Completed)
        }
    }

    /// The green-hosting lookup calls a third-party service, which is
    /// opt-in via the configuration.
    fn check_provider(&self, provider: Provider) -> Result<()> {
        if provider == Provider::GreenDomain && !self.config.allow_green_domain_calls {
            return Err(SdkError::ProviderNotEnabled(provider.to_string()));
        }
        Ok(())
    }
}

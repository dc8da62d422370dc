//! Work item definitions and the per-row status lifecycle
//!
//! A configuration row describes one target to measure; selecting a row
//! into a batch expands it into one `WorkItem` per requested device.
//! Status lives on the row and is the single source of truth for what
//! remains to be processed across resumable runs.

use serde::{Deserialize, Serialize};

/// Device a measurement is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Device {
    Mobile,
    Desktop,
}

impl Device {
    /// Canonical name used in output records and PSI-style requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Mobile => "MOBILE",
            Device::Desktop => "DESKTOP",
        }
    }

    /// Form factor name on the CrUX wire ("MOBILE" maps to "PHONE")
    pub fn crux_form_factor(&self) -> &'static str {
        match self {
            Device::Mobile => "PHONE",
            Device::Desktop => "DESKTOP",
        }
    }
}

/// Whether a target is queried at URL or origin granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryMode {
    #[serde(rename = "URL")]
    Url,
    Origin,
}

impl QueryMode {
    /// Name used in output records and extraction contexts
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Url => "URL",
            QueryMode::Origin => "Origin",
        }
    }
}

/// Lifecycle status of a configuration row
///
/// Presentation glyphs exist only at the persistence boundary; everywhere
/// else the enum is the state encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Inactive or empty row, not part of the current run
    Idle,
    /// Waiting for a free batch slot
    Queued,
    /// Selected into a batch, request issued
    InFlight,
    /// Record durably written
    Succeeded,
    /// Response body carried an error payload
    ProviderError,
    /// Transport succeeded but the body did not parse
    Malformed,
}

impl ItemStatus {
    /// Glyph written to the status column of the configuration store
    pub fn glyph(&self) -> &'static str {
        match self {
            ItemStatus::Idle => "",
            ItemStatus::Queued => "⏳",
            ItemStatus::InFlight => "🔄",
            ItemStatus::Succeeded => "✅",
            ItemStatus::ProviderError => "❌",
            ItemStatus::Malformed => "🟥",
        }
    }

    /// Parse a status column glyph back into a status
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        match glyph {
            "" => Some(ItemStatus::Idle),
            "⏳" => Some(ItemStatus::Queued),
            "🔄" => Some(ItemStatus::InFlight),
            "✅" => Some(ItemStatus::Succeeded),
            "❌" => Some(ItemStatus::ProviderError),
            "🟥" => Some(ItemStatus::Malformed),
            _ => None,
        }
    }

    /// Whether this status ends the row's participation in the run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ItemStatus::Succeeded | ItemStatus::ProviderError | ItemStatus::Malformed
        )
    }
}

/// One row of the tracking configuration
///
/// `devices` is the raw device request string ("Mobile", "Desktop",
/// "Mobile and Desktop", ...) and is expanded at batch-selection time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfiguredRow {
    /// Stable row identity within a configuration snapshot
    pub id: usize,
    /// Free-form label carried into output records
    #[serde(default)]
    pub label: String,
    /// URL or origin to measure
    pub target: String,
    /// Raw device request string, matched by substring
    pub devices: String,
    /// URL vs origin granularity
    pub mode: QueryMode,
    /// Inactive rows are never selected
    #[serde(default = "default_active")]
    pub active: bool,
    /// Lifecycle status, reset at run initialization
    #[serde(default = "default_status", skip_serializing)]
    pub status: ItemStatus,
    /// Human-readable annotation for the last failure, if any
    #[serde(default, skip_serializing)]
    pub note: Option<String>,
}

fn default_active() -> bool {
    true
}

fn default_status() -> ItemStatus {
    ItemStatus::Idle
}

impl ConfiguredRow {
    /// Whether the row takes part in runs at all
    pub fn eligible(&self) -> bool {
        self.active && !self.target.trim().is_empty()
    }

    /// Devices requested by this row, in mobile-then-desktop order.
    ///
    /// Matching is by case-insensitive substring ("phone" counts as
    /// mobile). A string matching neither yields an empty list, which the
    /// scheduler treats as a caller-configuration defect.
    pub fn requested_devices(&self) -> Vec<Device> {
        let lower = self.devices.to_lowercase();
        let mut devices = Vec::new();
        if lower.contains("mobile") || lower.contains("phone") {
            devices.push(Device::Mobile);
        }
        if lower.contains("desktop") {
            devices.push(Device::Desktop);
        }
        devices
    }
}

/// One (row, device) pair selected into a batch
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    /// Back-reference to the configuration row
    pub row_id: usize,
    pub label: String,
    pub target: String,
    pub device: Device,
    pub mode: QueryMode,
}

impl WorkItem {
    /// Expand a configuration row into its per-device work items
    pub fn expand(row: &ConfiguredRow) -> Vec<WorkItem> {
        row.requested_devices()
            .into_iter()
            .map(|device| WorkItem {
                row_id: row.id,
                label: row.label.clone(),
                target: row.target.clone(),
                device,
                mode: row.mode,
            })
            .collect()
    }
}

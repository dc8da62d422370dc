//! Field definitions and the measurement provider catalogue
//!
//! A `FieldDefinition` is one rule for computing a named output column
//! from a parsed response: (provider, column name, extraction expression).
//! Definitions are configuration data and can be loaded from YAML.

use serde::{Deserialize, Serialize};

/// External measurement API a field definition applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// PageSpeed Insights
    PsiApi,
    /// Chrome User Experience Report
    Crux,
    /// Chrome User Experience Report, history endpoint
    CruxHistory,
    /// Green Web Foundation green-domain check
    GreenDomain,
    /// Accessibility audit (PSI, accessibility category)
    Accessibility,
    /// Sustainability estimation over PSI results
    Sustainability,
}

impl Provider {
    /// Human-readable name, used for logging and sink routing
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::PsiApi => "PSI API",
            Provider::Crux => "CrUX",
            Provider::CruxHistory => "CrUX History",
            Provider::GreenDomain => "Green Domain",
            Provider::Accessibility => "Accessibility",
            Provider::Sustainability => "Sustainability",
        }
    }

    /// History-shaped providers fan one response out into one record per
    /// historical sample
    pub fn is_history(&self) -> bool {
        matches!(self, Provider::CruxHistory)
    }

    /// Whether extraction contexts for this provider carry the
    /// green-domain list
    pub fn uses_green_domains(&self) -> bool {
        matches!(self, Provider::Sustainability)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One rule for computing a named output column from a parsed response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Provider this rule applies to
    pub provider: Provider,
    /// Output column name
    pub name: String,
    /// Extraction expression, parsed by `sitepulse_core::expr`
    pub expression: String,
}

impl FieldDefinition {
    /// Create a new field definition
    pub fn new(
        provider: Provider,
        name: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            name: name.into(),
            expression: expression.into(),
        }
    }
}

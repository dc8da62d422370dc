//! Extraction context
//!
//! The fixed set of variables visible to field expressions: the parsed
//! response document (`content`), the work item's query mode (`mode`),
//! and the green-domain list (`green_domains`, populated only for
//! sustainability-flavored providers).

use sitepulse_core::{QueryMode, Value};

/// Variables a field expression can reference
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    content: Value,
    mode: Value,
    green_domains: Value,
}

impl ExtractionContext {
    /// Create a context for a parsed document; the green-domain list
    /// starts empty
    pub fn new(content: Value, mode: QueryMode) -> Self {
        Self {
            content,
            mode: Value::String(mode.as_str().to_string()),
            green_domains: Value::Array(Vec::new()),
        }
    }

    /// Attach the externally supplied green-domain list
    pub fn with_green_domains(mut self, domains: &[String]) -> Self {
        self.green_domains = Value::Array(
            domains
                .iter()
                .map(|d| Value::String(d.clone()))
                .collect(),
        );
        self
    }

    /// Resolve a root variable name
    pub fn root(&self, name: &str) -> Option<&Value> {
        match name {
            "content" => Some(&self.content),
            "mode" => Some(&self.mode),
            "green_domains" => Some(&self.green_domains),
            _ => None,
        }
    }
}

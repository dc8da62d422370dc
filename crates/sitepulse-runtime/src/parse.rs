//! Result parsing
//!
//! Turns a raw transport response body into a parsed document or a typed
//! parse failure. A body that decodes but carries a top-level `error`
//! field is a provider-reported error, distinct from a decode failure;
//! both short-circuit further processing for the item.

use sitepulse_core::Value;
use thiserror::Error;

/// Why a response body could not be turned into a usable document
#[derive(Error, Debug)]
pub enum ParseFailure {
    /// The body was not decodable as JSON
    #[error("Malformed response: {source}")]
    Malformed {
        /// Raw body text, kept for the status note
        raw: String,
        source: serde_json::Error,
    },

    /// The body decoded but carries an error payload
    #[error("Provider error: {message}")]
    Provider {
        /// The provider's `error` payload, surfaced verbatim
        payload: Value,
        message: String,
    },
}

impl ParseFailure {
    /// Which terminal status this failure maps to
    pub fn status(&self) -> sitepulse_core::ItemStatus {
        match self {
            ParseFailure::Malformed { .. } => sitepulse_core::ItemStatus::Malformed,
            ParseFailure::Provider { .. } => sitepulse_core::ItemStatus::ProviderError,
        }
    }
}

/// Parse a raw response body into a document
pub fn parse_response(raw: &str) -> Result<Value, ParseFailure> {
    let content: Value = serde_json::from_str(raw).map_err(|source| ParseFailure::Malformed {
        raw: raw.to_string(),
        source,
    })?;

    if let Some(payload) = content.as_object().and_then(|map| map.get("error")) {
        let message = payload
            .as_object()
            .and_then(|map| map.get("message"))
            .and_then(|m| m.as_str())
            .map(|m| m.to_string())
            .unwrap_or_else(|| payload.render_cell());
        return Err(ParseFailure::Provider {
            payload: payload.clone(),
            message,
        });
    }

    Ok(content)
}

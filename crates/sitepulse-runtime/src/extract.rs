//! Field extraction engine
//!
//! Evaluates every applicable field definition against the extraction
//! context. Failures are isolated per field: one bad expression (for
//! example one that indexes into a nested key the provider omitted) sets
//! that field to an empty value and records the failure, without
//! touching the other fields of the row.

use crate::context::ExtractionContext;
use crate::eval::evaluate;
use sitepulse_core::{parse_expression, FieldDefinition, Value};
use std::collections::HashMap;

/// One isolated per-field failure
#[derive(Debug, Clone)]
pub struct FieldFailure {
    /// Output column name of the failing definition
    pub field: String,
    /// Rendered parse or evaluation error
    pub error: String,
}

/// Result of extracting all fields for one item
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    /// Extracted values by output column name; failed fields are `Null`
    pub values: HashMap<String, Value>,
    /// Per-field failures, for the debug trail
    pub failures: Vec<FieldFailure>,
}

/// Extract every field definition against the context
pub fn extract(ctx: &ExtractionContext, fields: &[FieldDefinition]) -> ExtractionOutcome {
    let mut outcome = ExtractionOutcome::default();

    for field in fields {
        let result = parse_expression(&field.expression)
            .map_err(crate::error::RuntimeError::Core)
            .and_then(|expr| evaluate(&expr, ctx));

        match result {
            Ok(value) => {
                outcome.values.insert(field.name.clone(), value);
            }
            Err(error) => {
                tracing::debug!(field = %field.name, %error, "field extraction failed");
                outcome.values.insert(field.name.clone(), Value::Null);
                outcome.failures.push(FieldFailure {
                    field: field.name.clone(),
                    error: error.to_string(),
                });
            }
        }
    }

    outcome
}

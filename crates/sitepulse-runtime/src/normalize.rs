//! Record normalization and history fan-out
//!
//! Merges extracted field values with the fixed metadata columns into
//! flat output records. History-shaped providers report many samples per
//! response: their extracted `Date` field is an array, and one record is
//! produced per index, with other array-valued fields indexed
//! positionally and scalar fields copied unchanged.

use sitepulse_core::{Provider, Value, WorkItem};
use std::collections::HashMap;

/// Metadata column names shared by every destination
pub const COL_DATE: &str = "Date";
pub const COL_LABEL: &str = "Label";
pub const COL_URL: &str = "URL";
pub const COL_DEVICE: &str = "Device";
pub const COL_MODE: &str = "URL / Origin";

/// One flat output row, keyed by destination column name
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    /// Back-reference to the configuration row, kept out of the columns
    pub row_id: usize,
    /// Column name to value
    pub columns: HashMap<String, Value>,
}

impl OutputRecord {
    /// Value for a destination column, empty when no field produced one
    pub fn cell(&self, column: &str) -> String {
        self.columns
            .get(column)
            .map(|v| v.render_cell())
            .unwrap_or_default()
    }
}

/// Convert one extracted field map into output records.
///
/// `processed_on` is the processing-date stamp (YYYY-MM-DD); it fills the
/// `Date` column unless a field definition produced one (history
/// providers overwrite it with the sample date array).
pub fn normalize(
    extracted: &HashMap<String, Value>,
    item: &WorkItem,
    provider: Provider,
    processed_on: &str,
) -> Vec<OutputRecord> {
    let mut columns: HashMap<String, Value> = HashMap::new();
    columns.insert(COL_DATE.to_string(), Value::String(processed_on.to_string()));
    columns.insert(COL_LABEL.to_string(), Value::String(item.label.clone()));
    columns.insert(COL_URL.to_string(), Value::String(item.target.clone()));
    columns.insert(
        COL_DEVICE.to_string(),
        Value::String(item.device.as_str().to_string()),
    );
    columns.insert(
        COL_MODE.to_string(),
        Value::String(item.mode.as_str().to_string()),
    );

    // Extracted fields win on name collision (notably "Date" for history)
    for (name, value) in extracted {
        columns.insert(name.clone(), value.clone());
    }

    if !provider.is_history() {
        return vec![OutputRecord {
            row_id: item.row_id,
            columns,
        }];
    }

    fan_out_history(columns, item.row_id)
}

/// Expand one history-shaped record into one record per date sample
fn fan_out_history(columns: HashMap<String, Value>, row_id: usize) -> Vec<OutputRecord> {
    let dates = match columns.get(COL_DATE) {
        Some(Value::Array(dates)) => dates.clone(),
        Some(other) => {
            tracing::warn!(
                row_id,
                ?other,
                "history response without a date array, producing no records"
            );
            return Vec::new();
        }
        None => return Vec::new(),
    };

    for (name, value) in &columns {
        if name == COL_DATE {
            continue;
        }
        if let Value::Array(items) = value {
            if items.len() != dates.len() {
                tracing::warn!(
                    field = %name,
                    field_len = items.len(),
                    date_len = dates.len(),
                    "history field length differs from date array, padding with empty values"
                );
            }
        }
    }

    dates
        .iter()
        .enumerate()
        .map(|(index, date)| {
            let mut expanded: HashMap<String, Value> = HashMap::new();
            for (name, value) in &columns {
                let cell = match value {
                    // Array-valued fields are indexed by sample position;
                    // an index past the end degrades to an empty value
                    Value::Array(items) => items.get(index).cloned().unwrap_or(Value::Null),
                    other => other.clone(),
                };
                expanded.insert(name.clone(), cell);
            }
            expanded.insert(COL_DATE.to_string(), date.clone());
            OutputRecord {
                row_id,
                columns: expanded,
            }
        })
        .collect()
}

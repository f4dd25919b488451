//! Batch normalization of assessment payloads
//!
//! List endpoints return either a bare array or a paginated envelope
//! (`{"count": .., "results": [..]}`). Both are accepted; anything else
//! yields an empty batch.

use crate::raw::RawAssessment;
use crate::report::{to_view_model_with_thresholds, AssessmentViewModel};
use crate::risk::RiskThresholds;
use rayon::prelude::*;
use serde_json::Value;

/// Extract the list of records from a payload
pub fn unwrap_records(payload: &Value) -> &[Value] {
    if let Some(Value::Array(results)) = payload.get("results") {
        return results;
    }
    match payload {
        Value::Array(records) => records,
        other => {
            tracing::debug!(
                "payload is neither a list nor a results envelope ({}); treating as empty",
                json_kind(other)
            );
            &[]
        }
    }
}

/// Normalize a payload with default thresholds
pub fn to_view_model_batch(payload: &Value) -> Vec<AssessmentViewModel> {
    to_view_model_batch_with_thresholds(payload, &RiskThresholds::default())
}

/// Normalize a payload with custom thresholds, preserving input order
pub fn to_view_model_batch_with_thresholds(
    payload: &Value,
    thresholds: &RiskThresholds,
) -> Vec<AssessmentViewModel> {
    unwrap_records(payload)
        .par_iter()
        .map(|record| to_view_model_with_thresholds(&RawAssessment::from_value(record), thresholds))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

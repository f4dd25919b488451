//! riskview core library - normalization and scoring of risk assessment records

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Normalization is total: no record shape causes an error or panic
// - One view model per raw record, in input order unless sorting is requested
// - No global mutable state
// - Identical input yields byte-for-byte identical output

pub mod batch;
pub mod config;
pub mod discover;
pub mod filter;
pub mod raw;
pub mod report;
pub mod resolve;
pub mod risk;
pub mod summary;

pub use batch::{to_view_model_batch, to_view_model_batch_with_thresholds};
pub use config::ResolvedConfig;
pub use filter::{apply_filters, FilterOptions, FilterOverrides};
pub use raw::RawAssessment;
pub use report::{render_json, render_jsonl, render_text, to_view_model, AssessmentViewModel};
pub use risk::{Level, RiskThresholds};
pub use summary::{render_summary_text, summarize, AssessmentSummary};

use anyhow::{Context, Result};
use std::path::Path;

/// Normalize payload files at the given path with default configuration
pub fn normalize(path: &Path, options: &FilterOptions) -> Result<Vec<AssessmentViewModel>> {
    normalize_with_config(path, options, None)
}

/// Normalize payload files at the given path with optional resolved configuration
///
/// Files that cannot be read or parsed are skipped with a warning. Records
/// from all files are concatenated in file order before filtering.
pub fn normalize_with_config(
    path: &Path,
    options: &FilterOptions,
    resolved_config: Option<&ResolvedConfig>,
) -> Result<Vec<AssessmentViewModel>> {
    let thresholds = resolved_config
        .map(|c| c.thresholds)
        .unwrap_or_default();

    let payload_files = discover::collect_payload_files(path)?;
    let walked_dir = path.is_dir();

    let mut view_models = Vec::new();
    let mut skipped_files: usize = 0;
    for file_path in payload_files {
        // Include/exclude patterns apply to discovered files, relative to the walked root
        if let (true, Some(config)) = (walked_dir, resolved_config) {
            let relative = file_path.strip_prefix(path).unwrap_or(&file_path);
            if !config.should_include(relative) {
                tracing::debug!("excluded by config: {}", file_path.display());
                continue;
            }
        }

        match read_payload(&file_path) {
            Ok(payload) => {
                let batch = to_view_model_batch_with_thresholds(&payload, &thresholds);
                tracing::debug!(
                    "{}: {} assessment(s)",
                    file_path.display(),
                    batch.len()
                );
                view_models.extend(batch);
            }
            Err(e) => {
                tracing::warn!("skipping file {}: {:#}", file_path.display(), e);
                skipped_files += 1;
            }
        }
    }
    if skipped_files > 0 {
        tracing::warn!("skipped {} file(s) due to read or parse errors", skipped_files);
    }

    Ok(apply_filters(view_models, options))
}

/// Normalize an already-parsed JSON payload with default thresholds
///
/// Accepts an envelope (`{"results": [...]}`), a bare list, or anything else
/// (which yields an empty batch). Never fails.
pub fn normalize_value(payload: &serde_json::Value) -> Vec<AssessmentViewModel> {
    normalize_value_with_thresholds(payload, &RiskThresholds::default())
}

/// Normalize an already-parsed JSON payload with custom thresholds
pub fn normalize_value_with_thresholds(
    payload: &serde_json::Value,
    thresholds: &RiskThresholds,
) -> Vec<AssessmentViewModel> {
    to_view_model_batch_with_thresholds(payload, thresholds)
}

/// Normalize a JSON payload given as text with default thresholds
///
/// The only error is text that is not JSON; any JSON value normalizes.
pub fn normalize_str(json: &str) -> Result<Vec<AssessmentViewModel>> {
    normalize_str_with_thresholds(json, &RiskThresholds::default())
}

/// Normalize a JSON payload given as text with custom thresholds
pub fn normalize_str_with_thresholds(
    json: &str,
    thresholds: &RiskThresholds,
) -> Result<Vec<AssessmentViewModel>> {
    let payload: serde_json::Value =
        serde_json::from_str(json).context("payload is not valid JSON")?;
    Ok(normalize_value_with_thresholds(&payload, thresholds))
}

fn read_payload(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_str_envelope() {
        let vms = normalize_str(r#"{"results": [{"id": "a"}, {"id": "b"}]}"#).unwrap();
        assert_eq!(vms.len(), 2);
        assert_eq!(vms[1].id, "b");
    }

    #[test]
    fn test_normalize_value_accepts_any_shape() {
        let list = serde_json::json!([{"id": 7}, {"id": "x"}]);
        let ids: Vec<String> = normalize_value(&list).into_iter().map(|vm| vm.id).collect();
        assert_eq!(ids, vec!["7", "x"]);

        assert!(normalize_value(&serde_json::json!("not a batch")).is_empty());
        assert!(normalize_value(&serde_json::json!({"results": 3})).is_empty());
    }

    #[test]
    fn test_normalize_value_with_thresholds() {
        let payload = serde_json::json!([{
            "id": "a",
            "likelihood_score": 4, "financial_impact_score": 4,
            "schedule_impact_score": 4, "quality_impact_score": 4,
            "reputation_impact_score": 4, "overall_impact_score": 4
        }]);
        assert_eq!(normalize_value(&payload)[0].risk_level, Level::High);

        let strict = RiskThresholds {
            risk_high: 90,
            ..RiskThresholds::default()
        };
        let vms = normalize_value_with_thresholds(&payload, &strict);
        assert_eq!(vms[0].risk_score, Some(80));
        assert_eq!(vms[0].risk_level, Level::Medium);
    }

    #[test]
    fn test_normalize_str_null_is_empty() {
        assert!(normalize_str("null").unwrap().is_empty());
    }

    #[test]
    fn test_normalize_str_rejects_non_json() {
        assert!(normalize_str("<html>502 Bad Gateway</html>").is_err());
    }
}

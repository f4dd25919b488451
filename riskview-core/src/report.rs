//! View models and output generation
//!
//! Global invariants enforced:
//! - Exactly one view model per raw assessment
//! - Rendering never reorders unless asked to
//! - Byte-for-byte identical output across runs

use crate::raw::RawAssessment;
use crate::resolve::{resolve_display_name, resolve_risk_description, resolve_risk_title};
use crate::risk::{self, Level, RiskThresholds};
use serde::{Deserialize, Serialize};

/// Status used when the record carries none
pub const DEFAULT_STATUS: &str = "pending";

/// Mitigation progress of an assessment
///
/// Assessment records do not carry this field, so every view model starts
/// at `NotStarted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationStatus {
    #[default]
    NotStarted,
}

impl MitigationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MitigationStatus::NotStarted => "not_started",
        }
    }
}

/// Flat, display-ready assessment row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AssessmentViewModel {
    pub id: String,
    pub risk_title: String,
    pub risk_description: String,
    pub assessor: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assessment_date: Option<String>,
    pub status: String,
    /// `None` when any sub-score was missing from the record
    pub risk_score: Option<i64>,
    pub impact_level: Level,
    pub probability_level: Level,
    pub risk_level: Level,
    pub mitigation_status: MitigationStatus,
    pub recommended_actions: Vec<String>,
    pub approved_by: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub approved_date: Option<String>,
}

/// Build a view model with default thresholds
pub fn to_view_model(raw: &RawAssessment) -> AssessmentViewModel {
    to_view_model_with_thresholds(raw, &RiskThresholds::default())
}

/// Build a view model with custom thresholds
pub fn to_view_model_with_thresholds(
    raw: &RawAssessment,
    thresholds: &RiskThresholds,
) -> AssessmentViewModel {
    let risk_score = risk::composite_score(raw);
    if risk_score.is_none() {
        tracing::debug!("assessment {:?} is missing sub-scores; score left empty", raw.id);
    }

    let ordinal_level = |score: Option<f64>| {
        score.map_or(Level::Low, |s| {
            risk::ordinal_to_level_with_thresholds(s, thresholds)
        })
    };

    AssessmentViewModel {
        id: raw.id.clone(),
        risk_title: resolve_risk_title(raw.risk.as_ref()),
        risk_description: resolve_risk_description(raw.risk.as_ref()),
        assessor: resolve_display_name(raw.assessor.as_ref()),
        assessment_date: raw.assessment_date.clone(),
        status: raw
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STATUS)
            .to_string(),
        risk_score,
        impact_level: ordinal_level(raw.overall_impact_score),
        probability_level: ordinal_level(raw.likelihood_score),
        risk_level: risk_score.map_or(Level::Low, |s| {
            risk::risk_level_from_score_with_thresholds(s, thresholds)
        }),
        mitigation_status: MitigationStatus::NotStarted,
        recommended_actions: raw
            .treatment_recommendation
            .iter()
            .filter(|r| !r.is_empty())
            .cloned()
            .collect(),
        approved_by: resolve_display_name(raw.approved_by.as_ref()),
        approved_date: raw.approval_date.clone(),
    }
}

/// Sort view models for presentation
///
/// 1. Risk score descending (unscored last)
/// 2. Id ascending
pub fn sort_view_models(mut view_models: Vec<AssessmentViewModel>) -> Vec<AssessmentViewModel> {
    view_models.sort_by(|a, b| {
        b.risk_score
            .cmp(&a.risk_score)
            .then_with(|| a.id.cmp(&b.id))
    });
    view_models
}

/// Render view models as a fixed-width text table
pub fn render_text(view_models: &[AssessmentViewModel]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<6} {:<7} {:<7} {:<7} {:<10} {:<11} {}\n",
        "SCORE", "LEVEL", "IMPACT", "PROB", "STATUS", "DATE", "TITLE"
    ));

    for vm in view_models {
        let score_str = vm
            .risk_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let date_str = vm
            .assessment_date
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:<6} {:<7} {:<7} {:<7} {:<10} {:<11} {}\n",
            score_str,
            vm.risk_level.as_str(),
            vm.impact_level.as_str(),
            vm.probability_level.as_str(),
            truncate_or_pad(&vm.status, 10),
            date_str,
            truncate(&vm.risk_title, 48),
        ));
    }

    output
}

/// Render view models as a pretty JSON array
pub fn render_json(view_models: &[AssessmentViewModel]) -> String {
    serde_json::to_string_pretty(view_models).unwrap_or_else(|_| "[]".to_string())
}

/// Render view models as JSON Lines, one object per line
pub fn render_jsonl(view_models: &[AssessmentViewModel]) -> String {
    let mut output = String::new();
    for vm in view_models {
        if let Ok(line) = serde_json::to_string(vm) {
            output.push_str(&line);
            output.push('\n');
        }
    }
    output
}

/// Show RFC 3339 timestamps as a calendar date; anything else verbatim
fn format_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

/// Truncate or pad string to fixed width (counted in chars)
fn truncate_or_pad(s: &str, width: usize) -> String {
    let truncated = truncate(s, width);
    let pad = width.saturating_sub(truncated.chars().count());
    format!("{}{}", truncated, " ".repeat(pad))
}

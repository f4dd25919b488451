//! Batch-level aggregates for summary cards
//!
//! Global invariants enforced:
//! - Deterministic key ordering (BTreeMap)
//! - Ties for the highest score resolve to the first in input order

use crate::report::AssessmentViewModel;
use crate::risk::Level;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Count of assessments per risk level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl LevelCounts {
    fn record(&mut self, level: Level) {
        match level {
            Level::Low => self.low += 1,
            Level::Medium => self.medium += 1,
            Level::High => self.high += 1,
        }
    }
}

/// The highest-scoring assessment in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopAssessment {
    pub id: String,
    pub risk_title: String,
    pub risk_score: i64,
}

/// Aggregates over a batch of view models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AssessmentSummary {
    pub total: usize,
    pub by_risk_level: LevelCounts,
    pub by_status: BTreeMap<String, usize>,
    /// Mean of present scores, one decimal place
    pub average_score: Option<f64>,
    pub unscored: usize,
    pub highest: Option<TopAssessment>,
}

/// Summarize a batch of view models
pub fn summarize(view_models: &[AssessmentViewModel]) -> AssessmentSummary {
    let mut by_risk_level = LevelCounts::default();
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    // Scores saturate at the i64 bounds, so two of them can overflow an i64 sum
    let mut score_sum: i128 = 0;
    let mut scored: usize = 0;
    let mut highest: Option<&AssessmentViewModel> = None;

    for vm in view_models {
        by_risk_level.record(vm.risk_level);
        *by_status.entry(vm.status.clone()).or_default() += 1;

        if let Some(score) = vm.risk_score {
            score_sum += i128::from(score);
            scored += 1;
            let is_new_max = highest
                .and_then(|h| h.risk_score)
                .map_or(true, |best| score > best);
            if is_new_max {
                highest = Some(vm);
            }
        }
    }

    let average_score = (scored > 0).then(|| {
        let mean = score_sum as f64 / scored as f64;
        (mean * 10.0).round() / 10.0
    });

    AssessmentSummary {
        total: view_models.len(),
        by_risk_level,
        by_status,
        average_score,
        unscored: view_models.len() - scored,
        highest: highest.and_then(|vm| {
            vm.risk_score.map(|risk_score| TopAssessment {
                id: vm.id.clone(),
                risk_title: vm.risk_title.clone(),
                risk_score,
            })
        }),
    }
}

/// Render a summary as a human-readable block
pub fn render_summary_text(summary: &AssessmentSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("Assessments: {}\n", summary.total));
    output.push_str(&format!(
        "Risk levels: high {}, medium {}, low {}\n",
        summary.by_risk_level.high, summary.by_risk_level.medium, summary.by_risk_level.low
    ));
    output.push_str(&format!(
        "Average score: {}\n",
        summary
            .average_score
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| "n/a".to_string())
    ));
    if summary.unscored > 0 {
        output.push_str(&format!("Unscored: {}\n", summary.unscored));
    }
    if let Some(ref top) = summary.highest {
        output.push_str(&format!(
            "Highest: {} ({}) score {}\n",
            top.risk_title, top.id, top.risk_score
        ));
    }

    if !summary.by_status.is_empty() {
        output.push_str("\nBy status:\n");
        for (status, count) in &summary.by_status {
            output.push_str(&format!("  {:<12} {}\n", status, count));
        }
    }

    output
}

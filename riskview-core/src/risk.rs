//! Composite risk score and level classification
//!
//! Global invariants enforced:
//! - Deterministic risk calculations
//! - Exactly three levels; no fourth category
//! - Ordinal and score thresholds are independent of each other

use crate::raw::RawAssessment;
use serde::{Deserialize, Serialize};

/// Maximum value of the 1-5 ordinal rating scale
pub const ORDINAL_SCALE_MAX: f64 = 5.0;

/// Ordinal rating at or above which a sub-score is high
pub const ORDINAL_HIGH: f64 = 4.0;

/// Ordinal rating that is medium (a single point, not a range)
pub const ORDINAL_MEDIUM: f64 = 3.0;

/// Composite score at or above which an assessment is high risk
pub const RISK_HIGH: i64 = 75;

/// Composite score at or above which an assessment is medium risk
pub const RISK_MEDIUM: i64 = 45;

/// Level classification shared by risk, impact and probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

/// Configurable classification thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub ordinal_high: f64,
    pub ordinal_medium: f64,
    pub risk_high: i64,
    pub risk_medium: i64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            ordinal_high: ORDINAL_HIGH,
            ordinal_medium: ORDINAL_MEDIUM,
            risk_high: RISK_HIGH,
            risk_medium: RISK_MEDIUM,
        }
    }
}

/// Bucket a single 1-5 rating with default thresholds
pub fn ordinal_to_level(score: f64) -> Level {
    ordinal_to_level_with_thresholds(score, &RiskThresholds::default())
}

/// Bucket a single rating with custom thresholds
///
/// Evaluated in order: `>= high` is high, `== medium` is medium, anything
/// else (including fractional, negative and NaN) is low.
pub fn ordinal_to_level_with_thresholds(score: f64, thresholds: &RiskThresholds) -> Level {
    if score >= thresholds.ordinal_high {
        Level::High
    } else if score == thresholds.ordinal_medium {
        Level::Medium
    } else {
        Level::Low
    }
}

/// Composite 0-100 score from the six sub-scores
///
/// Formula:
/// score = round_half_up(mean(sub_scores) / 5 * 100)
///
/// Out-of-range sub-scores scale proportionally and are not clamped to
/// 0-100. Scores beyond the `i64` range saturate at `i64::MIN`/`i64::MAX`.
/// Returns `None` when any sub-score is absent.
pub fn composite_score(assessment: &RawAssessment) -> Option<i64> {
    let scores = assessment.sub_scores()?;
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let normalized = mean / ORDINAL_SCALE_MAX * 100.0;
    Some(round_half_up(normalized))
}

/// Assign a risk level to a composite score with default thresholds
pub fn risk_level_from_score(score: i64) -> Level {
    risk_level_from_score_with_thresholds(score, &RiskThresholds::default())
}

/// Assign a risk level with custom thresholds
pub fn risk_level_from_score_with_thresholds(score: i64, thresholds: &RiskThresholds) -> Level {
    if score >= thresholds.risk_high {
        Level::High
    } else if score >= thresholds.risk_medium {
        Level::Medium
    } else {
        Level::Low
    }
}

/// Saturates at the `i64` bounds (float-to-int `as` semantics)
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment_with(scores: [f64; 6]) -> RawAssessment {
        RawAssessment {
            likelihood_score: Some(scores[0]),
            financial_impact_score: Some(scores[1]),
            schedule_impact_score: Some(scores[2]),
            quality_impact_score: Some(scores[3]),
            reputation_impact_score: Some(scores[4]),
            overall_impact_score: Some(scores[5]),
            ..Default::default()
        }
    }

    #[test]
    fn test_composite_score_bounds() {
        assert_eq!(composite_score(&assessment_with([5.0; 6])), Some(100));
        assert_eq!(composite_score(&assessment_with([1.0; 6])), Some(20));
        assert_eq!(composite_score(&assessment_with([0.0; 6])), Some(0));
    }

    #[test]
    fn test_composite_score_rounds_to_nearest() {
        // mean 4.333.. -> 86.67 -> 87
        let a = assessment_with([3.0, 5.0, 4.0, 4.0, 5.0, 5.0]);
        assert_eq!(composite_score(&a), Some(87));

        // mean 1.1666.. -> 23.33 -> 23
        let b = assessment_with([1.0, 1.0, 1.0, 1.0, 1.0, 2.0]);
        assert_eq!(composite_score(&b), Some(23));

        // mean 2.333.. -> 46.67 -> 47
        let c = assessment_with([2.0, 2.0, 2.0, 2.0, 3.0, 3.0]);
        assert_eq!(composite_score(&c), Some(47));
    }

    #[test]
    fn test_composite_score_out_of_range_not_clamped() {
        assert_eq!(composite_score(&assessment_with([10.0; 6])), Some(200));
        assert_eq!(composite_score(&assessment_with([-1.0; 6])), Some(-20));
    }

    #[test]
    fn test_composite_score_saturates_at_i64_bounds() {
        assert_eq!(composite_score(&assessment_with([1e300; 6])), Some(i64::MAX));
        assert_eq!(composite_score(&assessment_with([-1e300; 6])), Some(i64::MIN));
    }

    #[test]
    fn test_composite_score_missing_sub_score() {
        let mut a = assessment_with([3.0; 6]);
        a.overall_impact_score = None;
        assert_eq!(composite_score(&a), None);
    }

    #[test]
    fn test_ordinal_to_level() {
        assert_eq!(ordinal_to_level(5.0), Level::High);
        assert_eq!(ordinal_to_level(4.0), Level::High);
        assert_eq!(ordinal_to_level(3.0), Level::Medium);
        assert_eq!(ordinal_to_level(2.0), Level::Low);
        assert_eq!(ordinal_to_level(1.0), Level::Low);
    }

    #[test]
    fn test_ordinal_to_level_medium_is_single_point() {
        assert_eq!(ordinal_to_level(3.5), Level::Low);
        assert_eq!(ordinal_to_level(2.9), Level::Low);
        assert_eq!(ordinal_to_level(-2.0), Level::Low);
        assert_eq!(ordinal_to_level(f64::NAN), Level::Low);
    }

    #[test]
    fn test_risk_level_from_score_boundaries() {
        assert_eq!(risk_level_from_score(100), Level::High);
        assert_eq!(risk_level_from_score(75), Level::High);
        assert_eq!(risk_level_from_score(74), Level::Medium);
        assert_eq!(risk_level_from_score(45), Level::Medium);
        assert_eq!(risk_level_from_score(44), Level::Low);
        assert_eq!(risk_level_from_score(0), Level::Low);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = RiskThresholds {
            ordinal_high: 5.0,
            ordinal_medium: 4.0,
            risk_high: 90,
            risk_medium: 60,
        };
        assert_eq!(ordinal_to_level_with_thresholds(4.0, &thresholds), Level::Medium);
        assert_eq!(ordinal_to_level_with_thresholds(3.0, &thresholds), Level::Low);
        assert_eq!(risk_level_from_score_with_thresholds(87, &thresholds), Level::Medium);
        assert_eq!(risk_level_from_score_with_thresholds(59, &thresholds), Level::Low);
    }

    #[test]
    fn test_level_as_str() {
        assert_eq!(Level::Low.as_str(), "low");
        assert_eq!(Level::Medium.as_str(), "medium");
        assert_eq!(Level::High.as_str(), "high");
    }
}

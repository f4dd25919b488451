//! Invariant tests
//!
//! Normalization must stay total over any JSON input and keep every level
//! within the three known buckets.

use riskview_core::{normalize_str, summarize, to_view_model_batch, Level};
use serde_json::{json, Value};

fn odd_payloads() -> Vec<Value> {
    vec![
        json!(null),
        json!(true),
        json!(3.5),
        json!("results"),
        json!({}),
        json!({"results": null}),
        json!({"results": {}}),
        json!([]),
        json!([[], {}, 1, "x", null]),
        json!([{"id": "e", "risk": "", "assessor": "", "approved_by": ""}]),
        json!([{
            "id": {"nested": true},
            "risk": {"title": 5, "name": ["n"]},
            "assessor": {"name": "", "full_name": "", "username": "", "email": ""},
            "approved_by": 42,
            "status": null,
            "likelihood_score": 9,
            "financial_impact_score": -3,
            "schedule_impact_score": 2.5,
            "quality_impact_score": 1e9,
            "reputation_impact_score": 0,
            "overall_impact_score": 3.0
        }]),
    ]
}

#[test]
fn test_normalization_is_total() {
    for payload in odd_payloads() {
        let vms = to_view_model_batch(&payload);
        for vm in &vms {
            assert!(!vm.status.is_empty());
            for level in [vm.risk_level, vm.impact_level, vm.probability_level] {
                assert!(matches!(level, Level::Low | Level::Medium | Level::High));
            }
        }
    }
}

#[test]
fn test_one_view_model_per_record() {
    let payload = json!([[], {}, 1, "x", null]);
    assert_eq!(to_view_model_batch(&payload).len(), 5);
}

#[test]
fn test_out_of_range_scores_propagate() {
    let vms = to_view_model_batch(&json!([{
        "id": "big",
        "likelihood_score": 10,
        "financial_impact_score": 10,
        "schedule_impact_score": 10,
        "quality_impact_score": 10,
        "reputation_impact_score": 10,
        "overall_impact_score": 10
    }]));
    assert_eq!(vms[0].risk_score, Some(200), "scores are not clamped");
    assert_eq!(vms[0].risk_level, Level::High);
}

#[test]
fn test_placeholders_for_unresolvable_entities() {
    let vms = normalize_str(
        r#"[{"id": "p", "risk": {"title": 5}, "assessor": {"name": ""}, "approved_by": 42}]"#,
    )
    .unwrap();
    assert_eq!(vms[0].risk_title, "—");
    assert_eq!(vms[0].assessor, "—");
    assert_eq!(vms[0].approved_by, "—");
    assert_eq!(vms[0].status, "pending");
}

#[test]
fn test_empty_identifiers_pass_through() {
    let vms = to_view_model_batch(&json!([
        {"id": "e", "risk": "", "assessor": "", "approved_by": ""}
    ]));
    assert_eq!(vms[0].risk_title, "");
    assert_eq!(vms[0].risk_description, "");
    assert_eq!(vms[0].assessor, "");
    assert_eq!(vms[0].approved_by, "");
}

#[test]
fn test_extreme_scores_saturate_and_summarize() {
    let record = json!({
        "id": "huge",
        "likelihood_score": 1e300,
        "financial_impact_score": 1e300,
        "schedule_impact_score": 1e300,
        "quality_impact_score": 1e300,
        "reputation_impact_score": 1e300,
        "overall_impact_score": 1e300
    });
    let vms = to_view_model_batch(&json!([record.clone(), record]));
    assert_eq!(vms[0].risk_score, Some(i64::MAX));

    let summary = summarize(&vms);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.by_risk_level.high, 2);
    assert!(summary.average_score.is_some_and(|avg| avg > 0.0));
}

//! Raw assessment records as received from the assessments endpoint
//!
//! Global invariants enforced:
//! - Decoding is total: every JSON shape yields a `RawAssessment`
//! - Relational fields are either a bare identifier or an embedded entity
//! - Fields with an unexpected JSON type decode as absent

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A relational field that the API either expands or leaves as an identifier
#[derive(Debug, Clone, PartialEq)]
pub enum Reference<T> {
    /// Bare identifier (usually a UUID or an email)
    Identifier(String),
    /// Expanded related object
    Entity(T),
}

/// Person-like related object (`assessor`, `approved_by`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NamedEntity {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
}

/// Expanded `risk` object
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RiskEntity {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

/// One risk assessment exactly as the upstream API shaped it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAssessment {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_reference")]
    pub risk: Option<Reference<RiskEntity>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub assessment_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub likelihood_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub financial_impact_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub schedule_impact_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quality_impact_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub reputation_impact_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub overall_impact_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub treatment_recommendation: Option<String>,
    #[serde(default, deserialize_with = "lenient_reference")]
    pub approved_by: Option<Reference<NamedEntity>>,
    #[serde(default, deserialize_with = "lenient_reference")]
    pub assessor: Option<Reference<NamedEntity>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub approval_date: Option<String>,
}

impl RawAssessment {
    /// Decode a record from any JSON value
    ///
    /// Non-object values produce an empty record, which normalizes to a row
    /// of placeholders.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => RawAssessment::deserialize(value).unwrap_or_else(|e| {
                tracing::debug!("assessment record fell back to defaults: {}", e);
                RawAssessment::default()
            }),
            _ => RawAssessment::default(),
        }
    }

    /// The six sub-scores in fixed order, or `None` if any is absent
    ///
    /// Order: likelihood, financial, schedule, quality, reputation, overall.
    pub fn sub_scores(&self) -> Option<[f64; 6]> {
        Some([
            self.likelihood_score?,
            self.financial_impact_score?,
            self.schedule_impact_score?,
            self.quality_impact_score?,
            self.reputation_impact_score?,
            self.overall_impact_score?,
        ])
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

/// Ids arrive as strings or integers depending on the backend model
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_reference<'de, D, T>(deserializer: D) -> Result<Option<Reference<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: for<'a> Deserialize<'a>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(Reference::Identifier(s)),
        value @ Value::Object(_) => T::deserialize(&value).ok().map(Reference::Entity),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_expanded_references() {
        let raw = RawAssessment::from_value(&json!({
            "id": "1",
            "risk": {"title": "Data Breach", "description": "Customer data exposure"},
            "assessor": {"full_name": "Bob Lee"},
            "approved_by": "user-42"
        }));

        assert_eq!(raw.id, "1");
        assert_eq!(
            raw.risk,
            Some(Reference::Entity(RiskEntity {
                title: Some("Data Breach".to_string()),
                name: None,
                description: Some("Customer data exposure".to_string()),
            }))
        );
        assert_eq!(
            raw.approved_by,
            Some(Reference::Identifier("user-42".to_string()))
        );
        match raw.assessor {
            Some(Reference::Entity(ref e)) => assert_eq!(e.full_name.as_deref(), Some("Bob Lee")),
            ref other => panic!("expected entity assessor, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_numeric_id() {
        let raw = RawAssessment::from_value(&json!({"id": 17}));
        assert_eq!(raw.id, "17");
    }

    #[test]
    fn test_decode_wrong_types_as_absent() {
        let raw = RawAssessment::from_value(&json!({
            "id": true,
            "risk": 12,
            "status": 3,
            "likelihood_score": "4",
            "assessor": ["a", "b"],
            "approved_by": {"name": 99, "email": "a@x.com"}
        }));

        assert_eq!(raw.id, "");
        assert!(raw.risk.is_none());
        assert!(raw.status.is_none());
        assert!(raw.likelihood_score.is_none());
        assert!(raw.assessor.is_none());
        match raw.approved_by {
            Some(Reference::Entity(ref e)) => {
                assert!(e.name.is_none());
                assert_eq!(e.email.as_deref(), Some("a@x.com"));
            }
            ref other => panic!("expected entity approver, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_non_object_is_default() {
        assert_eq!(RawAssessment::from_value(&json!(null)), RawAssessment::default());
        assert_eq!(RawAssessment::from_value(&json!("abc")), RawAssessment::default());
        assert_eq!(RawAssessment::from_value(&json!([1, 2])), RawAssessment::default());
    }

    #[test]
    fn test_sub_scores_requires_all_six() {
        let mut raw = RawAssessment::from_value(&json!({
            "likelihood_score": 3,
            "financial_impact_score": 5,
            "schedule_impact_score": 4,
            "quality_impact_score": 4,
            "reputation_impact_score": 5,
            "overall_impact_score": 5
        }));
        assert_eq!(raw.sub_scores(), Some([3.0, 5.0, 4.0, 4.0, 5.0, 5.0]));

        raw.quality_impact_score = None;
        assert_eq!(raw.sub_scores(), None);
    }
}

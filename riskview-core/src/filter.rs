//! Selection of view models for output
//!
//! Applied in a fixed order: status, minimum score, optional sort, top N.

use crate::report::{sort_view_models, AssessmentViewModel};

/// Output selection options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// Keep only view models scoring at least this much (unscored rows dropped)
    pub min_score: Option<i64>,
    /// Keep only these statuses (exact match); empty keeps all
    pub statuses: Vec<String>,
    /// Truncate to the first N rows after filtering and sorting
    pub top_n: Option<usize>,
    /// Sort by risk score descending instead of keeping input order
    pub sort_by_score: bool,
}

/// Caller-supplied values that take precedence over configured filter options
///
/// `None` (or an empty status list) keeps the configured value. `sort_by_score`
/// is tri-state so that `Some(false)` can turn off sorting enabled in config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOverrides {
    pub min_score: Option<i64>,
    pub statuses: Vec<String>,
    pub top_n: Option<usize>,
    pub sort_by_score: Option<bool>,
}

impl FilterOptions {
    /// Merge overrides on top of these options, field by field
    pub fn with_overrides(self, overrides: FilterOverrides) -> FilterOptions {
        FilterOptions {
            min_score: overrides.min_score.or(self.min_score),
            statuses: if overrides.statuses.is_empty() {
                self.statuses
            } else {
                overrides.statuses
            },
            top_n: overrides.top_n.or(self.top_n),
            sort_by_score: overrides.sort_by_score.unwrap_or(self.sort_by_score),
        }
    }
}

/// Apply filter options to a batch of view models
pub fn apply_filters(
    view_models: Vec<AssessmentViewModel>,
    options: &FilterOptions,
) -> Vec<AssessmentViewModel> {
    let filtered: Vec<AssessmentViewModel> = view_models
        .into_iter()
        .filter(|vm| options.statuses.is_empty() || options.statuses.contains(&vm.status))
        .filter(|vm| match options.min_score {
            Some(min) => vm.risk_score.is_some_and(|s| s >= min),
            None => true,
        })
        .collect();

    let ordered = if options.sort_by_score {
        sort_view_models(filtered)
    } else {
        filtered
    };

    match options.top_n {
        Some(top_n) => ordered.into_iter().take(top_n).collect(),
        None => ordered,
    }
}

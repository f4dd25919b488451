//! Display-string resolution for relational fields
//!
//! Every resolver is total: any input shape maps to a defined string.

use crate::raw::{NamedEntity, Reference, RiskEntity};

/// Placeholder shown when a value cannot be resolved
pub const PLACEHOLDER: &str = "—";

/// Resolve a person reference to a display name
///
/// Identifiers are displayed as-is; no directory lookup is performed.
/// Entities use the first non-empty of `name`, `full_name`, `username`, `email`.
pub fn resolve_display_name(value: Option<&Reference<NamedEntity>>) -> String {
    match value {
        None => PLACEHOLDER.to_string(),
        Some(Reference::Identifier(id)) => id.clone(),
        Some(Reference::Entity(entity)) => first_non_empty([
            entity.name.as_deref(),
            entity.full_name.as_deref(),
            entity.username.as_deref(),
            entity.email.as_deref(),
        ])
        .unwrap_or(PLACEHOLDER)
        .to_string(),
    }
}

/// Resolve a risk reference to its title (`title`, then `name`)
pub fn resolve_risk_title(risk: Option<&Reference<RiskEntity>>) -> String {
    match risk {
        None => PLACEHOLDER.to_string(),
        Some(Reference::Identifier(id)) => id.clone(),
        Some(Reference::Entity(entity)) => {
            first_non_empty([entity.title.as_deref(), entity.name.as_deref()])
                .unwrap_or(PLACEHOLDER)
                .to_string()
        }
    }
}

/// Resolve a risk reference to its description
///
/// A bare identifier carries no description, so it resolves to "".
pub fn resolve_risk_description(risk: Option<&Reference<RiskEntity>>) -> String {
    match risk {
        Some(Reference::Entity(entity)) => entity.description.clone().unwrap_or_default(),
        Some(Reference::Identifier(_)) | None => String::new(),
    }
}

fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

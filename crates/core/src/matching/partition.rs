use crate::domain::desk::Desk;
use crate::domain::preferences::EffectivePreferences;
use crate::matching::filters::contains_ci;

/// Stable two-way split: desks whose zone name contains any adjacency
/// token (case-insensitive substring) come out on the preferred side.
/// Relative order within each side is preserved for the ranker.
pub fn split_by_adjacency(
    desks: Vec<Desk>,
    prefs: &EffectivePreferences,
) -> (Vec<Desk>, Vec<Desk>) {
    let tokens: Vec<&str> = prefs
        .adjacency_preferences
        .iter()
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.is_empty() {
        return (Vec::new(), desks);
    }

    desks.into_iter().partition(|desk| tokens.iter().any(|token| contains_ci(&desk.zone, token)))
}

/// Final output order: the ranked adjacency-preferred partition always
/// precedes the ranked remainder.
pub fn assemble(preferred: Vec<Desk>, other: Vec<Desk>) -> Vec<Desk> {
    let mut result = preferred;
    result.extend(other);
    result
}

use serde::{Deserialize, Serialize};

use crate::domain::desk::DeskType;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

/// Stored per-employee defaults. An employee without a record behaves as an
/// all-empty set of defaults; that is not an error condition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePreferences {
    pub employee_id: EmployeeId,
    #[serde(default)]
    pub desk_preferences: Vec<String>,
    #[serde(default)]
    pub equipment_needs: Vec<String>,
    #[serde(default)]
    pub adjacency_preferences: Vec<String>,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub accessibility_needs: Option<String>,
}

/// Preference object produced by the NLP collaborator from free text.
///
/// Any field may be empty. `preferred_days` and `team` ride along for the
/// collaborator contract but do not participate in filtering or ranking.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQueryPreferences {
    #[serde(default)]
    pub desk_preferences: Vec<String>,
    #[serde(default)]
    pub equipment_needs: Vec<String>,
    #[serde(default)]
    pub preferred_days: Vec<String>,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub accessibility_needs: Option<String>,
    #[serde(default)]
    pub adjacency_preferences: Vec<String>,
    #[serde(default)]
    pub team: Option<String>,
}

/// The merged preference set driving filtering and ranking. Computed once
/// per request by the normalizer and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectivePreferences {
    pub desk_type: Option<DeskType>,
    pub desk_preferences: Vec<String>,
    pub equipment_needs: Vec<String>,
    pub adjacency_preferences: Vec<String>,
    pub preferred_location: Option<String>,
    pub accessibility_needs: Option<String>,
}

impl EffectivePreferences {
    /// Standing desks are opt-in: they are only eligible when the merged
    /// desk-preference list carries the `standing` token, even if type
    /// enforcement was triggered by another token.
    pub fn standing_requested(&self) -> bool {
        self.desk_preferences.iter().any(|token| token.trim().eq_ignore_ascii_case("standing"))
    }
}

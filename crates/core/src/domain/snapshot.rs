use serde::{Deserialize, Serialize};

use crate::domain::desk::Desk;
use crate::domain::policy::Policy;
use crate::domain::preferences::{EmployeeId, EmployeePreferences};
use crate::domain::space::Space;
use crate::domain::telemetry::{MetricsRecord, OccupancyRecord, SensorRecord};

/// Per-request immutable bundle of the reference data collections.
///
/// The pipeline never mutates these records; everything derived from them
/// is request-scoped and discarded with the response. Loading a fresh
/// snapshot per request is what isolates concurrent refreshes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSnapshot {
    #[serde(default)]
    pub desks: Vec<Desk>,
    #[serde(default)]
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub employee_preferences: Vec<EmployeePreferences>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub occupancy: Vec<OccupancyRecord>,
    #[serde(default)]
    pub metrics: Vec<MetricsRecord>,
    #[serde(default)]
    pub sensors: Vec<SensorRecord>,
}

impl ReferenceSnapshot {
    /// Stored defaults for an employee; an absent record yields all-empty
    /// preferences rather than an error.
    pub fn stored_preferences(&self, employee_id: &EmployeeId) -> EmployeePreferences {
        self.employee_preferences
            .iter()
            .find(|prefs| prefs.employee_id == *employee_id)
            .cloned()
            .unwrap_or_else(|| EmployeePreferences {
                employee_id: employee_id.clone(),
                ..EmployeePreferences::default()
            })
    }
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyId(pub String);

/// Capacity cap: areas at or above the occupancy threshold reject desks.
pub const CAPACITY_POLICY: &str = "POL-005";
/// Sanitization cooldown: desks used within the cooldown window reject.
pub const SANITIZATION_POLICY: &str = "POL-002";

/// A named organizational rule. The mere presence of its id in the active
/// set toggles the corresponding eligibility filter; parameters beyond the
/// id are descriptive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The set of policy ids currently in force.
#[derive(Clone, Debug, Default)]
pub struct ActivePolicies(HashSet<String>);

impl ActivePolicies {
    pub fn from_policies(policies: &[Policy]) -> Self {
        Self(policies.iter().map(|policy| policy.id.0.clone()).collect())
    }

    pub fn contains(&self, policy_id: &str) -> bool {
        self.0.contains(policy_id)
    }
}

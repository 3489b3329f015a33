//! The desk-matching pipeline: normalize preferences, index reference
//! data, filter, partition, rank, assemble. Pure computation over an
//! immutable per-request snapshot apart from the interpreter call.

pub mod filters;
pub mod index;
pub mod normalizer;
pub mod partition;
pub mod rank;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::MatchingConfig;
use crate::domain::desk::Desk;
use crate::domain::policy::ActivePolicies;
use crate::domain::preferences::{EmployeeId, EmployeePreferences};
use crate::domain::snapshot::ReferenceSnapshot;
use crate::domain::space::SpaceIndex;
use crate::interpreter::QueryInterpreter;
use crate::matching::index::ReferenceIndex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecommendationRequest {
    pub employee_id: Option<EmployeeId>,
    pub query: String,
}

pub struct DeskMatcher {
    interpreter: Arc<dyn QueryInterpreter>,
    config: MatchingConfig,
}

impl DeskMatcher {
    pub fn new(interpreter: Arc<dyn QueryInterpreter>, config: MatchingConfig) -> Self {
        Self { interpreter, config }
    }

    /// Produce the ordered recommendation list for one request. An empty
    /// list is a valid outcome, not an error.
    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
        snapshot: &ReferenceSnapshot,
        now: DateTime<Utc>,
    ) -> Vec<Desk> {
        let stored = match &request.employee_id {
            Some(employee_id) => snapshot.stored_preferences(employee_id),
            None => EmployeePreferences::default(),
        };
        let prefs = normalizer::normalize(self.interpreter.as_ref(), &stored, &request.query).await;

        let index =
            ReferenceIndex::build(&snapshot.occupancy, &snapshot.metrics, &snapshot.sensors);
        let spaces = SpaceIndex::build(&snapshot.spaces);
        let policies = ActivePolicies::from_policies(&snapshot.policies);

        let mut eligible = Vec::with_capacity(snapshot.desks.len());
        for desk in &snapshot.desks {
            match filters::evaluate(desk, &prefs, &index, &spaces, &policies, now, &self.config) {
                None => eligible.push(desk.clone()),
                Some(rejection) => {
                    debug!(
                        event_name = "matching.filter.rejected",
                        desk_id = %desk.id.0,
                        rejection = ?rejection,
                        "desk excluded from eligibility"
                    );
                }
            }
        }

        let (mut preferred, mut other) = partition::split_by_adjacency(eligible, &prefs);
        rank::rank(&mut preferred, &prefs, &index);
        rank::rank(&mut other, &prefs, &index);
        partition::assemble(preferred, other)
    }
}

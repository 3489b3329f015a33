pub mod config;
pub mod domain;
pub mod interpreter;
pub mod matching;

pub use domain::desk::{AreaId, Desk, DeskId, DeskStatus, DeskType};
pub use domain::policy::{
    ActivePolicies, Policy, PolicyId, CAPACITY_POLICY, SANITIZATION_POLICY,
};
pub use domain::preferences::{
    EffectivePreferences, EmployeeId, EmployeePreferences, ParsedQueryPreferences,
};
pub use domain::snapshot::ReferenceSnapshot;
pub use domain::space::{Space, SpaceId, SpaceIndex};
pub use domain::telemetry::{MetricsRecord, OccupancyRecord, SensorRecord, SensorStatus};
pub use interpreter::{InterpreterError, QueryInterpreter};
pub use matching::{DeskMatcher, RecommendationRequest};

use chrono::{DateTime, Utc};

use crate::config::MatchingConfig;
use crate::domain::desk::{Desk, DeskStatus, DeskType};
use crate::domain::policy::{ActivePolicies, CAPACITY_POLICY, SANITIZATION_POLICY};
use crate::domain::preferences::EffectivePreferences;
use crate::domain::space::SpaceIndex;
use crate::domain::telemetry::SensorStatus;
use crate::matching::index::ReferenceIndex;

/// Why a desk fell out of the cascade.
///
/// Predicates run in a fixed order and the first failure wins. Each
/// predicate is independent, so the order changes which reason gets
/// reported, never the surviving set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    Unavailable,
    TypeMismatch,
    StandingNotRequested,
    MissingEquipment(String),
    LocationMismatch,
    AreaAtCapacity,
    SanitizationCooldown,
    AccessibilityUnmet,
    SensorUnhealthy,
    SensorStale,
}

/// Evaluate the full cascade for one desk. `None` means eligible.
pub fn evaluate(
    desk: &Desk,
    prefs: &EffectivePreferences,
    index: &ReferenceIndex,
    spaces: &SpaceIndex<'_>,
    policies: &ActivePolicies,
    now: DateTime<Utc>,
    config: &MatchingConfig,
) -> Option<Rejection> {
    if desk.status != DeskStatus::Available {
        return Some(Rejection::Unavailable);
    }

    if let Some(enforced) = prefs.desk_type {
        if desk.desk_type != enforced {
            return Some(Rejection::TypeMismatch);
        }
    }

    if desk.desk_type == DeskType::Standing && !prefs.standing_requested() {
        return Some(Rejection::StandingNotRequested);
    }

    // subset test only; partial credit happens later in ranking
    for tag in &prefs.equipment_needs {
        if !desk.has_feature(tag) {
            return Some(Rejection::MissingEquipment(tag.clone()));
        }
    }

    if let Some(preferred) = prefs.preferred_location.as_deref() {
        if !matches_location(desk, preferred, spaces) {
            return Some(Rejection::LocationMismatch);
        }
    }

    if policies.contains(CAPACITY_POLICY) {
        if let Some(occupancy_pct) = index.occupancy_pct(&desk.area_id) {
            if occupancy_pct >= config.capacity_threshold_pct {
                return Some(Rejection::AreaAtCapacity);
            }
        }
    }

    if policies.contains(SANITIZATION_POLICY) {
        if let Some(last_used) = desk.last_used {
            if now.signed_duration_since(last_used) < config.sanitize_cooldown() {
                return Some(Rejection::SanitizationCooldown);
            }
        }
    }

    if let Some(need) = prefs.accessibility_needs.as_deref() {
        if !satisfies_accessibility(desk, need) {
            return Some(Rejection::AccessibilityUnmet);
        }
    }

    // Absence of monitoring is not disqualifying; a present sensor is
    // authoritative and its reading age is always enforced.
    if let Some(sensor) = index.sensor(&desk.area_id) {
        if sensor.status != SensorStatus::Active {
            return Some(Rejection::SensorUnhealthy);
        }
        if now.signed_duration_since(sensor.last_reading) > config.sensor_recency() {
            return Some(Rejection::SensorStale);
        }
    }

    None
}

/// Eligible when the desk's own zone name matches, or the zone's parent
/// floor name matches. A zone with no resolvable parent and no direct
/// match is ineligible.
fn matches_location(desk: &Desk, preferred: &str, spaces: &SpaceIndex<'_>) -> bool {
    let preferred = preferred.trim();
    if desk.zone.trim().eq_ignore_ascii_case(preferred) {
        return true;
    }
    spaces
        .floor_of(&desk.zone)
        .map(|floor| floor.trim().eq_ignore_ascii_case(preferred))
        .unwrap_or(false)
}

fn satisfies_accessibility(desk: &Desk, need: &str) -> bool {
    desk.has_feature(need) || contains_ci(&desk.location, need)
}

pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(&needle.trim().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{evaluate, Rejection};
    use crate::config::{AppConfig, MatchingConfig};
    use crate::domain::desk::{AreaId, Desk, DeskId, DeskStatus, DeskType};
    use crate::domain::policy::{
        ActivePolicies, Policy, PolicyId, CAPACITY_POLICY, SANITIZATION_POLICY,
    };
    use crate::domain::preferences::EffectivePreferences;
    use crate::domain::space::{Space, SpaceId, SpaceIndex};
    use crate::domain::telemetry::{MetricsRecord, OccupancyRecord, SensorRecord, SensorStatus};
    use crate::matching::index::ReferenceIndex;

    fn config() -> MatchingConfig {
        AppConfig::default().matching
    }

    fn desk() -> Desk {
        Desk {
            id: DeskId("D-304".to_string()),
            desk_type: DeskType::Standing,
            area_id: AreaId("AR-MKT".to_string()),
            zone: "Marketing Zone".to_string(),
            floor: 3,
            location: "window row, wheelchair accessible".to_string(),
            features: vec!["monitor".to_string(), "docking station".to_string()],
            status: DeskStatus::Available,
            last_used: Some(Utc::now() - Duration::hours(6)),
        }
    }

    fn spaces() -> Vec<Space> {
        vec![
            Space { id: SpaceId("SP-F3".to_string()), name: "3rd Floor".to_string(), parent_id: None },
            Space {
                id: SpaceId("SP-MKT".to_string()),
                name: "Marketing Zone".to_string(),
                parent_id: Some(SpaceId("SP-F3".to_string())),
            },
        ]
    }

    fn prefs() -> EffectivePreferences {
        EffectivePreferences {
            desk_type: Some(DeskType::Standing),
            desk_preferences: vec!["standing".to_string()],
            equipment_needs: vec!["monitor".to_string()],
            ..EffectivePreferences::default()
        }
    }

    fn policy(id: &str) -> Policy {
        Policy { id: PolicyId(id.to_string()), name: id.to_string(), description: None }
    }

    fn eligible_with(
        desk: &Desk,
        prefs: &EffectivePreferences,
        index: &ReferenceIndex,
        policies: &ActivePolicies,
    ) -> Option<Rejection> {
        let spaces = spaces();
        let space_index = SpaceIndex::build(&spaces);
        evaluate(desk, prefs, index, &space_index, policies, Utc::now(), &config())
    }

    #[test]
    fn fully_matching_desk_passes_the_whole_cascade() {
        let index = ReferenceIndex::build(&[], &[], &[]);
        assert_eq!(eligible_with(&desk(), &prefs(), &index, &ActivePolicies::default()), None);
    }

    #[test]
    fn unavailable_desk_is_rejected_first() {
        let mut desk = desk();
        desk.status = DeskStatus::Occupied;
        let index = ReferenceIndex::build(&[], &[], &[]);

        assert_eq!(
            eligible_with(&desk, &prefs(), &index, &ActivePolicies::default()),
            Some(Rejection::Unavailable)
        );
    }

    #[test]
    fn enforced_type_must_match_exactly() {
        let mut desk = desk();
        desk.desk_type = DeskType::Regular;
        let index = ReferenceIndex::build(&[], &[], &[]);

        assert_eq!(
            eligible_with(&desk, &prefs(), &index, &ActivePolicies::default()),
            Some(Rejection::TypeMismatch)
        );
    }

    #[test]
    fn standing_desk_requires_the_standing_token_even_without_enforcement() {
        let mut prefs = prefs();
        prefs.desk_type = None;
        prefs.desk_preferences = vec!["quiet".to_string()];
        let index = ReferenceIndex::build(&[], &[], &[]);

        assert_eq!(
            eligible_with(&desk(), &prefs, &index, &ActivePolicies::default()),
            Some(Rejection::StandingNotRequested)
        );
    }

    #[test]
    fn every_requested_equipment_tag_must_be_present() {
        let mut prefs = prefs();
        prefs.equipment_needs.push("webcam".to_string());
        let index = ReferenceIndex::build(&[], &[], &[]);

        assert_eq!(
            eligible_with(&desk(), &prefs, &index, &ActivePolicies::default()),
            Some(Rejection::MissingEquipment("webcam".to_string()))
        );
    }

    #[test]
    fn location_matches_zone_name_or_parent_floor_name() {
        let index = ReferenceIndex::build(&[], &[], &[]);

        let mut prefs = prefs();
        prefs.preferred_location = Some("marketing zone".to_string());
        assert_eq!(eligible_with(&desk(), &prefs, &index, &ActivePolicies::default()), None);

        prefs.preferred_location = Some("3rd Floor".to_string());
        assert_eq!(eligible_with(&desk(), &prefs, &index, &ActivePolicies::default()), None);

        prefs.preferred_location = Some("1st Floor".to_string());
        assert_eq!(
            eligible_with(&desk(), &prefs, &index, &ActivePolicies::default()),
            Some(Rejection::LocationMismatch)
        );
    }

    #[test]
    fn unresolvable_zone_without_direct_match_is_ineligible() {
        let mut desk = desk();
        desk.zone = "Unmapped Zone".to_string();
        let mut prefs = prefs();
        prefs.preferred_location = Some("3rd Floor".to_string());
        let index = ReferenceIndex::build(&[], &[], &[]);

        assert_eq!(
            eligible_with(&desk, &prefs, &index, &ActivePolicies::default()),
            Some(Rejection::LocationMismatch)
        );
    }

    #[test]
    fn capacity_policy_rejects_full_areas_only_when_active() {
        let index = ReferenceIndex::build(
            &[OccupancyRecord { area_id: AreaId("AR-MKT".to_string()), occupancy_pct: 80.0 }],
            &[],
            &[],
        );

        assert_eq!(eligible_with(&desk(), &prefs(), &index, &ActivePolicies::default()), None);

        let active = ActivePolicies::from_policies(&[policy(CAPACITY_POLICY)]);
        assert_eq!(
            eligible_with(&desk(), &prefs(), &index, &active),
            Some(Rejection::AreaAtCapacity)
        );
    }

    #[test]
    fn sanitization_policy_rejects_desks_inside_the_cooldown() {
        let mut desk = desk();
        desk.last_used = Some(Utc::now() - Duration::hours(1));
        let index = ReferenceIndex::build(&[], &[], &[]);

        assert_eq!(eligible_with(&desk, &prefs(), &index, &ActivePolicies::default()), None);

        let active = ActivePolicies::from_policies(&[policy(SANITIZATION_POLICY)]);
        assert_eq!(
            eligible_with(&desk, &prefs(), &index, &active),
            Some(Rejection::SanitizationCooldown)
        );

        desk.last_used = None;
        assert_eq!(eligible_with(&desk, &prefs(), &index, &active), None);
    }

    #[test]
    fn accessibility_need_matches_feature_tag_or_location_text() {
        let index = ReferenceIndex::build(&[], &[], &[]);
        let mut prefs = prefs();
        prefs.accessibility_needs = Some("Wheelchair Accessible".to_string());

        assert_eq!(eligible_with(&desk(), &prefs, &index, &ActivePolicies::default()), None);

        let mut desk = desk();
        desk.location = "window row".to_string();
        assert_eq!(
            eligible_with(&desk, &prefs, &index, &ActivePolicies::default()),
            Some(Rejection::AccessibilityUnmet)
        );

        desk.features.push("wheelchair accessible".to_string());
        assert_eq!(eligible_with(&desk, &prefs, &index, &ActivePolicies::default()), None);
    }

    #[test]
    fn sensor_record_must_be_active_and_recent() {
        let now = Utc::now();
        let stale = ReferenceIndex::build(
            &[],
            &[],
            &[SensorRecord {
                area_id: AreaId("AR-MKT".to_string()),
                status: SensorStatus::Active,
                last_reading: now - Duration::hours(2),
            }],
        );
        assert_eq!(
            eligible_with(&desk(), &prefs(), &stale, &ActivePolicies::default()),
            Some(Rejection::SensorStale)
        );

        let faulty = ReferenceIndex::build(
            &[],
            &[],
            &[SensorRecord {
                area_id: AreaId("AR-MKT".to_string()),
                status: SensorStatus::Faulty,
                last_reading: now,
            }],
        );
        assert_eq!(
            eligible_with(&desk(), &prefs(), &faulty, &ActivePolicies::default()),
            Some(Rejection::SensorUnhealthy)
        );

        let fresh = ReferenceIndex::build(
            &[],
            &[],
            &[SensorRecord {
                area_id: AreaId("AR-MKT".to_string()),
                status: SensorStatus::Active,
                last_reading: now - Duration::minutes(10),
            }],
        );
        assert_eq!(eligible_with(&desk(), &prefs(), &fresh, &ActivePolicies::default()), None);
    }

    #[test]
    fn desks_without_telemetry_records_pass_permissively() {
        let mut desk = desk();
        desk.area_id = AreaId("AR-UNMONITORED".to_string());
        let index = ReferenceIndex::build(
            &[OccupancyRecord { area_id: AreaId("AR-MKT".to_string()), occupancy_pct: 99.0 }],
            &[MetricsRecord {
                area_id: AreaId("AR-MKT".to_string()),
                date: Utc::now(),
                utilization_rate: 0.9,
            }],
            &[SensorRecord {
                area_id: AreaId("AR-MKT".to_string()),
                status: SensorStatus::Faulty,
                last_reading: Utc::now(),
            }],
        );
        let active =
            ActivePolicies::from_policies(&[policy(CAPACITY_POLICY), policy(SANITIZATION_POLICY)]);

        assert_eq!(eligible_with(&desk, &prefs(), &index, &active), None);
    }
}

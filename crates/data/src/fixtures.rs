//! Deterministic demo data for seeding and tests.
//!
//! The fixture models one floor of a small office: a marketing zone, an
//! engineering zone, and a quiet zone, with both active workspace policies
//! in force and telemetry that exercises every filter in the cascade.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use deskmatch_core::{
    AreaId, Desk, DeskId, DeskStatus, DeskType, EmployeeId, EmployeePreferences, MetricsRecord,
    OccupancyRecord, Policy, PolicyId, ReferenceSnapshot, SensorRecord, SensorStatus, Space,
    SpaceId, CAPACITY_POLICY, SANITIZATION_POLICY,
};
use serde::Serialize;

use crate::json_store;
use crate::provider::DataError;

pub fn demo_snapshot(now: DateTime<Utc>) -> ReferenceSnapshot {
    ReferenceSnapshot {
        desks: vec![
            desk(
                "D-304",
                DeskType::Standing,
                "AR-MKT",
                "Marketing Zone",
                "north window bank",
                &["monitor", "docking station"],
                DeskStatus::Available,
                Some(now - Duration::hours(26)),
            ),
            desk(
                "D-305",
                DeskType::Standing,
                "AR-MKT",
                "Marketing Zone",
                "north window bank",
                &["monitor"],
                DeskStatus::Available,
                Some(now - Duration::hours(6)),
            ),
            desk(
                "D-306",
                DeskType::Regular,
                "AR-MKT",
                "Marketing Zone",
                "center aisle",
                &["monitor", "keyboard"],
                DeskStatus::Occupied,
                Some(now - Duration::hours(1)),
            ),
            desk(
                "D-310",
                DeskType::Standing,
                "AR-ENG",
                "Engineering Zone",
                "east wall",
                &["monitor", "docking station", "webcam"],
                DeskStatus::Available,
                None,
            ),
            desk(
                "D-311",
                DeskType::Regular,
                "AR-ENG",
                "Engineering Zone",
                "east wall",
                &["monitor"],
                DeskStatus::Maintenance,
                Some(now - Duration::days(3)),
            ),
            desk(
                "D-101",
                DeskType::Regular,
                "AR-QUIET",
                "Quiet Zone",
                "wheelchair accessible corner",
                &["monitor", "height-adjustable"],
                DeskStatus::Available,
                Some(now - Duration::hours(30)),
            ),
            // cooled down in two hours; useful for sanitization tests
            desk(
                "D-102",
                DeskType::Regular,
                "AR-QUIET",
                "Quiet Zone",
                "back corner",
                &[],
                DeskStatus::Available,
                Some(now - Duration::hours(2)),
            ),
        ],
        spaces: vec![
            space("SP-F3", "3rd Floor", None),
            space("SP-MKT", "Marketing Zone", Some("SP-F3")),
            space("SP-ENG", "Engineering Zone", Some("SP-F3")),
            space("SP-QUIET", "Quiet Zone", Some("SP-F3")),
        ],
        employee_preferences: vec![
            EmployeePreferences {
                employee_id: EmployeeId("EMP-042".to_string()),
                desk_preferences: vec!["standing".to_string()],
                equipment_needs: vec!["monitor".to_string()],
                adjacency_preferences: vec!["marketing".to_string()],
                preferred_location: Some("3rd Floor".to_string()),
                accessibility_needs: None,
            },
            EmployeePreferences {
                employee_id: EmployeeId("EMP-077".to_string()),
                desk_preferences: Vec::new(),
                equipment_needs: Vec::new(),
                adjacency_preferences: Vec::new(),
                preferred_location: None,
                accessibility_needs: Some("wheelchair accessible".to_string()),
            },
        ],
        policies: vec![
            Policy {
                id: PolicyId(SANITIZATION_POLICY.to_string()),
                name: "Post-use sanitization window".to_string(),
                description: Some("Desks rest after use before reassignment.".to_string()),
            },
            Policy {
                id: PolicyId(CAPACITY_POLICY.to_string()),
                name: "Area capacity cap".to_string(),
                description: Some("No assignments into areas at or over capacity.".to_string()),
            },
        ],
        occupancy: vec![
            OccupancyRecord { area_id: AreaId("AR-MKT".to_string()), occupancy_pct: 55.0 },
            OccupancyRecord { area_id: AreaId("AR-ENG".to_string()), occupancy_pct: 72.5 },
            OccupancyRecord { area_id: AreaId("AR-QUIET".to_string()), occupancy_pct: 20.0 },
        ],
        metrics: vec![
            MetricsRecord {
                area_id: AreaId("AR-MKT".to_string()),
                date: now - Duration::days(1),
                utilization_rate: 0.48,
            },
            MetricsRecord {
                area_id: AreaId("AR-ENG".to_string()),
                date: now - Duration::days(1),
                utilization_rate: 0.66,
            },
            MetricsRecord {
                area_id: AreaId("AR-QUIET".to_string()),
                date: now - Duration::days(2),
                utilization_rate: 0.15,
            },
        ],
        sensors: vec![
            SensorRecord {
                area_id: AreaId("AR-MKT".to_string()),
                status: SensorStatus::Active,
                last_reading: now - Duration::minutes(4),
            },
            SensorRecord {
                area_id: AreaId("AR-ENG".to_string()),
                status: SensorStatus::Active,
                last_reading: now - Duration::minutes(12),
            },
            SensorRecord {
                area_id: AreaId("AR-QUIET".to_string()),
                status: SensorStatus::Active,
                last_reading: now - Duration::minutes(30),
            },
        ],
    }
}

/// Write every collection of the snapshot into its JSON file under `dir`.
pub async fn write_snapshot(dir: &Path, snapshot: &ReferenceSnapshot) -> Result<(), DataError> {
    write_collection(dir, json_store::DESKS_FILE, &snapshot.desks).await?;
    write_collection(dir, json_store::SPACES_FILE, &snapshot.spaces).await?;
    write_collection(
        dir,
        json_store::EMPLOYEE_PREFERENCES_FILE,
        &snapshot.employee_preferences,
    )
    .await?;
    write_collection(dir, json_store::POLICIES_FILE, &snapshot.policies).await?;
    write_collection(dir, json_store::OCCUPANCY_FILE, &snapshot.occupancy).await?;
    write_collection(dir, json_store::METRICS_FILE, &snapshot.metrics).await?;
    write_collection(dir, json_store::SENSORS_FILE, &snapshot.sensors).await?;
    Ok(())
}

async fn write_collection<T: Serialize>(
    dir: &Path,
    file_name: &str,
    items: &[T],
) -> Result<(), DataError> {
    let path = dir.join(file_name);
    let encoded = serde_json::to_vec_pretty(items)
        .map_err(|source| DataError::EncodeFile { path: path.clone(), source })?;
    tokio::fs::write(&path, encoded)
        .await
        .map_err(|source| DataError::WriteFile { path, source })
}

fn desk(
    id: &str,
    desk_type: DeskType,
    area: &str,
    zone: &str,
    location: &str,
    features: &[&str],
    status: DeskStatus,
    last_used: Option<DateTime<Utc>>,
) -> Desk {
    Desk {
        id: DeskId(id.to_string()),
        desk_type,
        area_id: AreaId(area.to_string()),
        zone: zone.to_string(),
        floor: 3,
        location: location.to_string(),
        features: features.iter().map(|tag| tag.to_string()).collect(),
        status,
        last_used,
    }
}

fn space(id: &str, name: &str, parent: Option<&str>) -> Space {
    Space {
        id: SpaceId(id.to_string()),
        name: name.to_string(),
        parent_id: parent.map(|parent| SpaceId(parent.to_string())),
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::desk::AreaId;

/// Live occupancy for an area, expressed as a 0–100 percentage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OccupancyRecord {
    pub area_id: AreaId,
    pub occupancy_pct: f64,
}

/// One historical metrics row for an area. The index keeps only the record
/// with the maximum date per area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub area_id: AreaId,
    pub date: DateTime<Utc>,
    /// Utilization in 0.0..=1.0; areas with no record rank as 1.0.
    pub utilization_rate: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    Active,
    Inactive,
    Faulty,
    #[serde(other)]
    Unknown,
}

/// Latest health report for an area's occupancy sensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub area_id: AreaId,
    pub status: SensorStatus,
    pub last_reading: DateTime<Utc>,
}

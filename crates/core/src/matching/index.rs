use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::desk::AreaId;
use crate::domain::telemetry::{MetricsRecord, OccupancyRecord, SensorRecord, SensorStatus};

/// Utilization assumed for areas with no metrics record. Unmeasured areas
/// rank behind every measured one.
pub const WORST_CASE_UTILIZATION: f64 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SensorHealth {
    pub status: SensorStatus,
    pub last_reading: DateTime<Utc>,
}

/// Request-scoped lookup maps over the telemetry collections, keyed by
/// area id. Built once per request so the filter cascade and ranker do
/// constant-time lookups instead of rescanning the flat collections.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    occupancy: HashMap<String, f64>,
    metrics: HashMap<String, MetricsRecord>,
    sensors: HashMap<String, SensorHealth>,
}

impl ReferenceIndex {
    pub fn build(
        occupancy: &[OccupancyRecord],
        metrics: &[MetricsRecord],
        sensors: &[SensorRecord],
    ) -> Self {
        let mut index = Self::default();

        for record in occupancy {
            // last write wins; the feed is assumed deduplicated
            index.occupancy.insert(record.area_id.0.clone(), record.occupancy_pct);
        }

        for record in metrics {
            match index.metrics.get(record.area_id.0.as_str()) {
                // max date per area, ties broken by last-seen-wins
                Some(current) if current.date > record.date => {}
                _ => {
                    index.metrics.insert(record.area_id.0.clone(), record.clone());
                }
            }
        }

        for record in sensors {
            index.sensors.insert(
                record.area_id.0.clone(),
                SensorHealth { status: record.status, last_reading: record.last_reading },
            );
        }

        index
    }

    pub fn occupancy_pct(&self, area_id: &AreaId) -> Option<f64> {
        self.occupancy.get(area_id.0.as_str()).copied()
    }

    pub fn latest_metrics(&self, area_id: &AreaId) -> Option<&MetricsRecord> {
        self.metrics.get(area_id.0.as_str())
    }

    pub fn utilization_rate(&self, area_id: &AreaId) -> f64 {
        self.latest_metrics(area_id)
            .map(|record| record.utilization_rate)
            .unwrap_or(WORST_CASE_UTILIZATION)
    }

    pub fn sensor(&self, area_id: &AreaId) -> Option<&SensorHealth> {
        self.sensors.get(area_id.0.as_str())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeskId(pub String);

/// Unit of occupancy, metrics and sensor measurement. May correspond to a
/// zone or to finer granularity; the core only ever uses it as a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AreaId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeskType {
    Standing,
    Regular,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeskStatus {
    Available,
    Occupied,
    Maintenance,
    #[serde(other)]
    Unknown,
}

/// A bookable physical workspace record. Immutable per request and owned by
/// the external data source; the matching pipeline only reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Desk {
    pub id: DeskId,
    pub desk_type: DeskType,
    pub area_id: AreaId,
    pub zone: String,
    pub floor: i32,
    pub location: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub status: DeskStatus,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
}

impl Desk {
    /// Feature tags are matched case-insensitively; source feeds disagree
    /// on casing.
    pub fn has_feature(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.features.iter().any(|feature| feature.trim().eq_ignore_ascii_case(tag))
    }
}

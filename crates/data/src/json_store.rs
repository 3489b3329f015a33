//! JSON directory snapshot store.
//!
//! Each collection lives in its own file under the snapshot directory.
//! A missing file means an empty collection so a minimal deployment can
//! ship only `desks.json`; a file that exists but fails to parse is an
//! error, never silently empty.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use deskmatch_core::ReferenceSnapshot;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::provider::{DataError, ReferenceDataProvider};

pub const DESKS_FILE: &str = "desks.json";
pub const SPACES_FILE: &str = "spaces.json";
pub const EMPLOYEE_PREFERENCES_FILE: &str = "employee_preferences.json";
pub const POLICIES_FILE: &str = "policies.json";
pub const OCCUPANCY_FILE: &str = "occupancy.json";
pub const METRICS_FILE: &str = "metrics.json";
pub const SENSORS_FILE: &str = "sensors.json";

#[derive(Clone, Debug)]
pub struct JsonSnapshotStore {
    dir: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_collection<T: DeserializeOwned>(
        &self,
        file_name: &str,
    ) -> Result<Vec<T>, DataError> {
        let path = self.dir.join(file_name);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    event_name = "data.snapshot.collection_missing",
                    path = %path.display(),
                    "collection file absent, treating as empty"
                );
                return Ok(Vec::new());
            }
            Err(source) => return Err(DataError::ReadFile { path, source }),
        };
        serde_json::from_slice(&raw).map_err(|source| DataError::ParseFile { path, source })
    }
}

#[async_trait]
impl ReferenceDataProvider for JsonSnapshotStore {
    async fn load(&self) -> Result<ReferenceSnapshot, DataError> {
        Ok(ReferenceSnapshot {
            desks: self.read_collection(DESKS_FILE).await?,
            spaces: self.read_collection(SPACES_FILE).await?,
            employee_preferences: self.read_collection(EMPLOYEE_PREFERENCES_FILE).await?,
            policies: self.read_collection(POLICIES_FILE).await?,
            occupancy: self.read_collection(OCCUPANCY_FILE).await?,
            metrics: self.read_collection(METRICS_FILE).await?,
            sensors: self.read_collection(SENSORS_FILE).await?,
        })
    }
}

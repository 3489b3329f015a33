use std::path::PathBuf;

use async_trait::async_trait;
use deskmatch_core::ReferenceSnapshot;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode {path}: {source}")]
    EncodeFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of the per-request reference snapshot. Each call returns a fresh
/// snapshot so a request never observes data mutated mid-pipeline.
#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    async fn load(&self) -> Result<ReferenceSnapshot, DataError>;
}

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::preferences::ParsedQueryPreferences;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterpreterError {
    #[error("interpreter transport failure: {0}")]
    Transport(String),
    #[error("interpreter returned an unusable payload: {0}")]
    MalformedResponse(String),
}

/// Boundary to the NLP collaborator.
///
/// Implementations turn raw query text into the fixed-shape preference
/// object. Failures stay local to the normalizer, which substitutes empty
/// defaults; they are never surfaced as a request failure.
#[async_trait]
pub trait QueryInterpreter: Send + Sync {
    async fn interpret(&self, query: &str) -> Result<ParsedQueryPreferences, InterpreterError>;
}

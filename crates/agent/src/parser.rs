//! LLM-backed query parser.
//!
//! Wraps any [`LlmClient`] behind the core [`QueryInterpreter`] seam. The
//! prompt pins the exact JSON shape; the response goes through a lenient
//! coercion pass so a model that returns the wrong type for a field costs
//! that field, not the request.

use std::sync::Arc;

use async_trait::async_trait;
use deskmatch_core::{InterpreterError, ParsedQueryPreferences, QueryInterpreter};
use serde_json::Value;
use tracing::debug;

use crate::llm::LlmClient;

const EXTRACTION_PROMPT: &str = r#"Extract workspace preferences from the employee request below.
Respond with a single JSON object and nothing else, using exactly these keys:
{
  "desk_preferences": ["standing" or "regular", plus any other desk traits mentioned],
  "equipment_needs": [equipment the employee asked for, e.g. "monitor", "docking station"],
  "preferred_days": [weekday names mentioned, lowercase],
  "preferred_location": "a floor or named area, or null",
  "accessibility_needs": "stated accessibility requirement, or null",
  "adjacency_preferences": [teams or zones the employee wants to sit near],
  "team": "the employee's own team if stated, or null"
}
Use empty arrays and null for anything the request does not mention. Do not invent preferences.

Request:
"#;

pub struct LlmQueryParser {
    client: Arc<dyn LlmClient>,
}

impl LlmQueryParser {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryInterpreter for LlmQueryParser {
    async fn interpret(&self, query: &str) -> Result<ParsedQueryPreferences, InterpreterError> {
        let prompt = format!("{EXTRACTION_PROMPT}{query}");
        let raw = self
            .client
            .complete(&prompt)
            .await
            .map_err(|error| InterpreterError::Transport(error.to_string()))?;

        let parsed = parse_response(&raw)?;
        debug!(
            event_name = "agent.parser.extracted",
            desk_preferences = parsed.desk_preferences.len(),
            equipment_needs = parsed.equipment_needs.len(),
            "parsed query preferences"
        );
        Ok(parsed)
    }
}

fn parse_response(raw: &str) -> Result<ParsedQueryPreferences, InterpreterError> {
    let stripped = strip_fences(raw);
    let value: Value = serde_json::from_str(stripped)
        .map_err(|error| InterpreterError::MalformedResponse(error.to_string()))?;
    let object = value.as_object().ok_or_else(|| {
        InterpreterError::MalformedResponse("top-level value is not an object".to_string())
    })?;

    Ok(ParsedQueryPreferences {
        desk_preferences: string_list(object.get("desk_preferences")),
        equipment_needs: string_list(object.get("equipment_needs")),
        preferred_days: string_list(object.get("preferred_days")),
        preferred_location: text(object.get("preferred_location")),
        accessibility_needs: text(object.get("accessibility_needs")),
        adjacency_preferences: string_list(object.get("adjacency_preferences")),
        team: text(object.get("team")),
    })
}

/// Models often wrap JSON in a markdown code fence despite instructions.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use deskmatch_core::{InterpreterError, QueryInterpreter};

    use super::{parse_response, strip_fences, LlmQueryParser};
    use crate::llm::LlmClient;

    struct CannedClient(String);

    #[async_trait]
    impl LlmClient for CannedClient {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct BrokenClient;

    #[async_trait]
    impl LlmClient for BrokenClient {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn well_formed_response_maps_onto_all_fields() {
        let parser = LlmQueryParser::new(Arc::new(CannedClient(
            r#"{
                "desk_preferences": ["standing"],
                "equipment_needs": ["monitor", "docking station"],
                "preferred_days": ["monday"],
                "preferred_location": "3rd Floor",
                "accessibility_needs": null,
                "adjacency_preferences": ["marketing"],
                "team": "design"
            }"#
            .to_string(),
        )));

        let parsed = parser.interpret("standing desk near marketing").await.unwrap();
        assert_eq!(parsed.desk_preferences, vec!["standing"]);
        assert_eq!(parsed.equipment_needs, vec!["monitor", "docking station"]);
        assert_eq!(parsed.preferred_location.as_deref(), Some("3rd Floor"));
        assert_eq!(parsed.team.as_deref(), Some("design"));
        assert!(parsed.accessibility_needs.is_none());
    }

    #[tokio::test]
    async fn fenced_json_is_accepted() {
        let parser = LlmQueryParser::new(Arc::new(CannedClient(
            "```json\n{\"desk_preferences\": [\"regular\"]}\n```".to_string(),
        )));

        let parsed = parser.interpret("a normal desk").await.unwrap();
        assert_eq!(parsed.desk_preferences, vec!["regular"]);
        assert!(parsed.equipment_needs.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_surfaces_as_transport_error() {
        let parser = LlmQueryParser::new(Arc::new(BrokenClient));
        let error = parser.interpret("any desk").await.unwrap_err();
        assert!(matches!(error, InterpreterError::Transport(_)));
    }

    #[tokio::test]
    async fn prose_response_is_a_malformed_response_error() {
        let parser =
            LlmQueryParser::new(Arc::new(CannedClient("Sure! Here are the prefs.".to_string())));
        let error = parser.interpret("any desk").await.unwrap_err();
        assert!(matches!(error, InterpreterError::MalformedResponse(_)));
    }

    #[test]
    fn wrong_types_degrade_to_empty_fields_instead_of_failing() {
        let parsed = parse_response(
            r#"{"desk_preferences": "standing", "equipment_needs": [1, 2], "preferred_location": 3}"#,
        )
        .unwrap();

        assert!(parsed.desk_preferences.is_empty());
        assert!(parsed.equipment_needs.is_empty());
        assert!(parsed.preferred_location.is_none());
    }

    #[test]
    fn missing_keys_default_cleanly() {
        let parsed = parse_response("{}").unwrap();
        assert!(parsed.desk_preferences.is_empty());
        assert!(parsed.team.is_none());
    }

    #[test]
    fn fence_stripping_handles_plain_and_tagged_fences() {
        assert_eq!(strip_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_fences("  {} "), "{}");
    }

    #[test]
    fn non_object_top_level_is_rejected() {
        assert!(parse_response("[1, 2, 3]").is_err());
    }
}

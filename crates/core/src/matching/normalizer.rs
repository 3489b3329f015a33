use tracing::warn;

use crate::domain::desk::DeskType;
use crate::domain::preferences::{
    EffectivePreferences, EmployeePreferences, ParsedQueryPreferences,
};
use crate::interpreter::QueryInterpreter;

/// Run the NLP collaborator over the raw query and merge the result with
/// the stored employee defaults. Collaborator failure is recovered here by
/// substituting an all-empty parsed object; it never propagates upward.
pub async fn normalize(
    interpreter: &dyn QueryInterpreter,
    stored: &EmployeePreferences,
    query: &str,
) -> EffectivePreferences {
    let parsed = match interpreter.interpret(query).await {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!(
                event_name = "matching.normalizer.interpreter_fallback",
                error = %error,
                "query interpreter failed; falling back to stored preferences"
            );
            ParsedQueryPreferences::default()
        }
    };

    merge(stored, &parsed)
}

/// Field-wise merge: the NLP-derived value wins when non-empty, otherwise
/// the stored default fills in.
pub fn merge(
    stored: &EmployeePreferences,
    parsed: &ParsedQueryPreferences,
) -> EffectivePreferences {
    let desk_preferences = pick_list(&parsed.desk_preferences, &stored.desk_preferences);
    let equipment_needs = pick_list(&parsed.equipment_needs, &stored.equipment_needs);
    let adjacency_preferences =
        pick_list(&parsed.adjacency_preferences, &stored.adjacency_preferences);
    let preferred_location =
        pick_text(parsed.preferred_location.as_deref(), stored.preferred_location.as_deref());
    let accessibility_needs =
        pick_text(parsed.accessibility_needs.as_deref(), stored.accessibility_needs.as_deref());

    EffectivePreferences {
        desk_type: resolve_desk_type(&desk_preferences),
        desk_preferences,
        equipment_needs,
        adjacency_preferences,
        preferred_location,
        accessibility_needs,
    }
}

/// Scan the merged desk-preference list for the literal type tokens.
/// `standing` outranks `regular` when both appear; any other token leaves
/// the type unenforced.
fn resolve_desk_type(desk_preferences: &[String]) -> Option<DeskType> {
    if contains_token(desk_preferences, "standing") {
        return Some(DeskType::Standing);
    }
    if contains_token(desk_preferences, "regular") {
        return Some(DeskType::Regular);
    }
    None
}

fn contains_token(values: &[String], token: &str) -> bool {
    values.iter().any(|value| value.trim().eq_ignore_ascii_case(token))
}

fn pick_list(parsed: &[String], stored: &[String]) -> Vec<String> {
    if parsed.is_empty() {
        stored.to_vec()
    } else {
        parsed.to_vec()
    }
}

fn pick_text(parsed: Option<&str>, stored: Option<&str>) -> Option<String> {
    non_blank(parsed).or_else(|| non_blank(stored))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::{merge, normalize};
    use crate::domain::desk::DeskType;
    use crate::domain::preferences::{EmployeePreferences, ParsedQueryPreferences};
    use crate::interpreter::{InterpreterError, QueryInterpreter};

    struct FailingInterpreter;

    #[async_trait]
    impl QueryInterpreter for FailingInterpreter {
        async fn interpret(
            &self,
            _query: &str,
        ) -> Result<ParsedQueryPreferences, InterpreterError> {
            Err(InterpreterError::Transport("connection refused".to_string()))
        }
    }

    fn stored() -> EmployeePreferences {
        EmployeePreferences {
            desk_preferences: vec!["regular".to_string()],
            equipment_needs: vec!["monitor".to_string()],
            adjacency_preferences: vec!["engineering".to_string()],
            preferred_location: Some("2nd Floor".to_string()),
            accessibility_needs: None,
            ..EmployeePreferences::default()
        }
    }

    #[test]
    fn parsed_values_win_when_non_empty() {
        let parsed = ParsedQueryPreferences {
            desk_preferences: vec!["standing".to_string()],
            preferred_location: Some("3rd Floor".to_string()),
            ..ParsedQueryPreferences::default()
        };

        let effective = merge(&stored(), &parsed);
        assert_eq!(effective.desk_type, Some(DeskType::Standing));
        assert_eq!(effective.desk_preferences, vec!["standing".to_string()]);
        assert_eq!(effective.equipment_needs, vec!["monitor".to_string()]);
        assert_eq!(effective.preferred_location.as_deref(), Some("3rd Floor"));
    }

    #[test]
    fn blank_parsed_text_falls_back_to_stored() {
        let parsed = ParsedQueryPreferences {
            preferred_location: Some("   ".to_string()),
            ..ParsedQueryPreferences::default()
        };

        let effective = merge(&stored(), &parsed);
        assert_eq!(effective.preferred_location.as_deref(), Some("2nd Floor"));
    }

    #[test]
    fn standing_outranks_regular_in_type_resolution() {
        let parsed = ParsedQueryPreferences {
            desk_preferences: vec!["regular".to_string(), "Standing".to_string()],
            ..ParsedQueryPreferences::default()
        };

        let effective = merge(&EmployeePreferences::default(), &parsed);
        assert_eq!(effective.desk_type, Some(DeskType::Standing));
    }

    #[test]
    fn non_type_tokens_leave_type_unenforced() {
        let parsed = ParsedQueryPreferences {
            desk_preferences: vec!["quiet".to_string(), "window".to_string()],
            ..ParsedQueryPreferences::default()
        };

        let effective = merge(&EmployeePreferences::default(), &parsed);
        assert_eq!(effective.desk_type, None);
    }

    #[tokio::test]
    async fn interpreter_failure_degrades_to_stored_preferences() {
        let effective = normalize(&FailingInterpreter, &stored(), "standing desk please").await;

        assert_eq!(effective.desk_type, Some(DeskType::Regular));
        assert_eq!(effective.equipment_needs, vec!["monitor".to_string()]);
        assert_eq!(effective.preferred_location.as_deref(), Some("2nd Floor"));
    }

    #[tokio::test]
    async fn interpreter_failure_with_no_stored_record_yields_empty_preferences() {
        let effective =
            normalize(&FailingInterpreter, &EmployeePreferences::default(), "anything").await;

        assert_eq!(effective.desk_type, None);
        assert!(effective.equipment_needs.is_empty());
        assert!(effective.adjacency_preferences.is_empty());
        assert!(effective.preferred_location.is_none());
    }
}

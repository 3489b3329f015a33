//! Deterministic keyword interpreter.
//!
//! Fallback for deployments without an LLM API key and the default for the
//! CLI. It recognizes a fixed vocabulary: desk type words, a small
//! equipment catalog, "near <thing>" adjacency phrases, ordinal floors,
//! weekday names, and a couple of accessibility markers. Anything it does
//! not recognize is simply left unset, which the normalizer backfills from
//! stored preferences.

use async_trait::async_trait;
use deskmatch_core::{InterpreterError, ParsedQueryPreferences, QueryInterpreter};

const EQUIPMENT_CATALOG: &[&str] =
    &["monitor", "docking station", "keyboard", "webcam", "headset"];

const WEEKDAYS: &[&str] =
    &["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];

const ORDINALS: &[(&str, &str)] = &[
    ("1st", "1st floor"),
    ("2nd", "2nd floor"),
    ("3rd", "3rd floor"),
    ("4th", "4th floor"),
    ("5th", "5th floor"),
    ("first", "1st floor"),
    ("second", "2nd floor"),
    ("third", "3rd floor"),
    ("fourth", "4th floor"),
    ("fifth", "5th floor"),
];

#[derive(Debug, Default)]
pub struct KeywordInterpreter;

impl KeywordInterpreter {
    pub fn new() -> Self {
        Self
    }

    fn parse(&self, query: &str) -> ParsedQueryPreferences {
        let lower = query.to_lowercase();
        let mut parsed = ParsedQueryPreferences::default();

        if lower.contains("standing") {
            parsed.desk_preferences.push("standing".to_string());
        } else if lower.contains("regular") || lower.contains("sitting") {
            parsed.desk_preferences.push("regular".to_string());
        }

        for item in EQUIPMENT_CATALOG {
            if lower.contains(item) {
                parsed.equipment_needs.push((*item).to_string());
            }
        }

        if let Some(target) = near_target(&lower) {
            parsed.adjacency_preferences.push(target);
        }

        for (marker, floor) in ORDINALS {
            if lower.contains(&format!("{marker} floor")) {
                parsed.preferred_location = Some((*floor).to_string());
                break;
            }
        }

        if lower.contains("wheelchair") || lower.contains("accessible") {
            parsed.accessibility_needs = Some("wheelchair accessible".to_string());
        }

        for day in WEEKDAYS {
            if lower.contains(day) {
                parsed.preferred_days.push((*day).to_string());
            }
        }

        parsed
    }
}

/// Takes the words after "near" up to a stop word, e.g.
/// "near the marketing team on the 3rd floor" -> "marketing".
fn near_target(lower: &str) -> Option<String> {
    let (_, rest) = lower.split_once("near ")?;
    let words: Vec<&str> = rest
        .split_whitespace()
        .filter(|word| !matches!(*word, "the" | "a" | "an"))
        .take_while(|word| !matches!(*word, "on" | "in" | "at" | "with" | "team" | "zone"))
        .collect();
    if words.is_empty() {
        return None;
    }
    Some(words.join(" "))
}

#[async_trait]
impl QueryInterpreter for KeywordInterpreter {
    async fn interpret(&self, query: &str) -> Result<ParsedQueryPreferences, InterpreterError> {
        Ok(self.parse(query))
    }
}

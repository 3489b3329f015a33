use std::sync::Arc;

use chrono::Utc;
use deskmatch_agent::KeywordInterpreter;
use deskmatch_core::config::{AppConfig, LoadOptions};
use deskmatch_core::{DeskMatcher, EmployeeId, RecommendationRequest};
use deskmatch_data::{JsonSnapshotStore, ReferenceDataProvider};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct RecommendedDesk {
    rank: usize,
    desk_id: String,
    zone: String,
    floor: i32,
    location: String,
    features: Vec<String>,
}

pub fn run(employee: Option<String>, query: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let query = query.trim();
    if query.is_empty() {
        return CommandResult::failure("recommend", "invalid_query", "query must not be empty", 2);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let store = JsonSnapshotStore::new(config.data.snapshot_dir.clone());
    // the CLI is offline by design, so the keyword interpreter always drives it
    let matcher = DeskMatcher::new(Arc::new(KeywordInterpreter::new()), config.matching);
    let request = RecommendationRequest {
        employee_id: employee
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| EmployeeId(id.to_string())),
        query: query.to_string(),
    };

    let result = runtime.block_on(async {
        let snapshot =
            store.load().await.map_err(|error| ("data_load", error.to_string(), 4u8))?;
        Ok::<_, (&'static str, String, u8)>(matcher.recommend(&request, &snapshot, Utc::now()).await)
    });

    match result {
        Ok(desks) => {
            let ranked: Vec<RecommendedDesk> = desks
                .into_iter()
                .enumerate()
                .map(|(position, desk)| RecommendedDesk {
                    rank: position + 1,
                    desk_id: desk.id.0,
                    zone: desk.zone,
                    floor: desk.floor,
                    location: desk.location,
                    features: desk.features,
                })
                .collect();
            let listing = serde_json::to_string_pretty(&ranked)
                .unwrap_or_else(|_| "[]".to_string());
            CommandResult::success(
                "recommend",
                format!("{} desk(s) recommended:\n{listing}", ranked.len()),
            )
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("recommend", error_class, message, exit_code)
        }
    }
}

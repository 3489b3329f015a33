use chrono::Utc;
use deskmatch_core::config::{AppConfig, LoadOptions};
use deskmatch_data::fixtures;

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let dir = config.data.snapshot_dir.clone();
    let snapshot = fixtures::demo_snapshot(Utc::now());
    let result = runtime.block_on(async {
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|error| ("snapshot_dir", error.to_string(), 4u8))?;
        fixtures::write_snapshot(&dir, &snapshot)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))
    });

    match result {
        Ok(()) => CommandResult::success(
            "seed",
            format!(
                "demo snapshot written to `{}`: {} desks, {} spaces, {} policies",
                dir.display(),
                snapshot.desks.len(),
                snapshot.spaces.len(),
                snapshot.policies.len()
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

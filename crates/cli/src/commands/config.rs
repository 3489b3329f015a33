use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use deskmatch_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: &str| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", "DESKMATCH_SERVER_BIND_ADDRESS"),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", "DESKMATCH_SERVER_PORT"),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", "DESKMATCH_SERVER_GRACEFUL_SHUTDOWN_SECS"),
    ));

    let llm_api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "llm.api_key",
        llm_api_key,
        source("llm.api_key", "DESKMATCH_LLM_API_KEY"),
    ));
    lines.push(render_line(
        "llm.base_url",
        &config.llm.base_url,
        source("llm.base_url", "DESKMATCH_LLM_BASE_URL"),
    ));
    lines.push(render_line("llm.model", &config.llm.model, source("llm.model", "DESKMATCH_LLM_MODEL")));
    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        source("llm.timeout_secs", "DESKMATCH_LLM_TIMEOUT_SECS"),
    ));

    lines.push(render_line(
        "data.snapshot_dir",
        &config.data.snapshot_dir.display().to_string(),
        source("data.snapshot_dir", "DESKMATCH_DATA_SNAPSHOT_DIR"),
    ));

    lines.push(render_line(
        "matching.capacity_threshold_pct",
        &config.matching.capacity_threshold_pct.to_string(),
        source("matching.capacity_threshold_pct", "DESKMATCH_MATCHING_CAPACITY_THRESHOLD_PCT"),
    ));
    lines.push(render_line(
        "matching.sanitize_cooldown_secs",
        &config.matching.sanitize_cooldown_secs.to_string(),
        source("matching.sanitize_cooldown_secs", "DESKMATCH_MATCHING_SANITIZE_COOLDOWN_SECS"),
    ));
    lines.push(render_line(
        "matching.sensor_recency_secs",
        &config.matching.sensor_recency_secs.to_string(),
        source("matching.sensor_recency_secs", "DESKMATCH_MATCHING_SENSOR_RECENCY_SECS"),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", "DESKMATCH_LOGGING_LEVEL"),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", "DESKMATCH_LOGGING_FORMAT"),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("deskmatch.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/deskmatch.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

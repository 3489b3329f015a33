use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub data: DataConfig,
    pub matching: MatchingConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    /// Absent key means the server runs with the deterministic keyword
    /// interpreter instead of the LLM collaborator.
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct DataConfig {
    pub snapshot_dir: PathBuf,
}

/// Tunables for the eligibility cascade. The sensor recency window is
/// deliberately configurable; the elapsed reading age is always enforced
/// against it, there is no bypass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchingConfig {
    pub capacity_threshold_pct: f64,
    pub sanitize_cooldown_secs: u64,
    pub sensor_recency_secs: u64,
}

impl MatchingConfig {
    pub fn sanitize_cooldown(&self) -> Duration {
        Duration::seconds(i64::try_from(self.sanitize_cooldown_secs).unwrap_or(i64::MAX))
    }

    pub fn sensor_recency(&self) -> Duration {
        Duration::seconds(i64::try_from(self.sensor_recency_secs).unwrap_or(i64::MAX))
    }
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub snapshot_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            llm: LlmConfig {
                api_key: None,
                base_url: "https://api.openai.com".to_string(),
                model: "gpt-4o-mini".to_string(),
                timeout_secs: 30,
            },
            data: DataConfig { snapshot_dir: PathBuf::from("data/snapshot") },
            matching: MatchingConfig {
                capacity_threshold_pct: 80.0,
                sanitize_cooldown_secs: 4 * 60 * 60,
                sensor_recency_secs: 60 * 60,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Layering order: defaults, then the optional `deskmatch.toml` patch,
    /// then `DESKMATCH_*` environment variables, then programmatic
    /// overrides, then validation.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("deskmatch.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(api_key) = llm.api_key {
                self.llm.api_key = Some(api_key.into());
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(data) = patch.data {
            if let Some(snapshot_dir) = data.snapshot_dir {
                self.data.snapshot_dir = snapshot_dir;
            }
        }

        if let Some(matching) = patch.matching {
            if let Some(capacity_threshold_pct) = matching.capacity_threshold_pct {
                self.matching.capacity_threshold_pct = capacity_threshold_pct;
            }
            if let Some(sanitize_cooldown_secs) = matching.sanitize_cooldown_secs {
                self.matching.sanitize_cooldown_secs = sanitize_cooldown_secs;
            }
            if let Some(sensor_recency_secs) = matching.sensor_recency_secs {
                self.matching.sensor_recency_secs = sensor_recency_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("DESKMATCH_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("DESKMATCH_SERVER_PORT") {
            self.server.port = parse_u16("DESKMATCH_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("DESKMATCH_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("DESKMATCH_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("DESKMATCH_LLM_API_KEY") {
            self.llm.api_key = Some(value.into());
        }
        if let Some(value) = read_env("DESKMATCH_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = read_env("DESKMATCH_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("DESKMATCH_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("DESKMATCH_LLM_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("DESKMATCH_DATA_SNAPSHOT_DIR") {
            self.data.snapshot_dir = PathBuf::from(value);
        }

        if let Some(value) = read_env("DESKMATCH_MATCHING_CAPACITY_THRESHOLD_PCT") {
            self.matching.capacity_threshold_pct =
                parse_f64("DESKMATCH_MATCHING_CAPACITY_THRESHOLD_PCT", &value)?;
        }
        if let Some(value) = read_env("DESKMATCH_MATCHING_SANITIZE_COOLDOWN_SECS") {
            self.matching.sanitize_cooldown_secs =
                parse_u64("DESKMATCH_MATCHING_SANITIZE_COOLDOWN_SECS", &value)?;
        }
        if let Some(value) = read_env("DESKMATCH_MATCHING_SENSOR_RECENCY_SECS") {
            self.matching.sensor_recency_secs =
                parse_u64("DESKMATCH_MATCHING_SENSOR_RECENCY_SECS", &value)?;
        }

        let log_level =
            read_env("DESKMATCH_LOGGING_LEVEL").or_else(|| read_env("DESKMATCH_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("DESKMATCH_LOGGING_FORMAT").or_else(|| read_env("DESKMATCH_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(snapshot_dir) = overrides.snapshot_dir {
            self.data.snapshot_dir = snapshot_dir;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(llm_api_key.into());
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port must be greater than zero".to_string(),
            ));
        }
        if self.server.graceful_shutdown_secs == 0 {
            return Err(ConfigError::Validation(
                "server.graceful_shutdown_secs must be greater than zero".to_string(),
            ));
        }

        if self.llm.timeout_secs == 0 || self.llm.timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "llm.timeout_secs must be in range 1..=300".to_string(),
            ));
        }
        if self.llm.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("llm.base_url must not be empty".to_string()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Validation("llm.model must not be empty".to_string()));
        }

        if self.data.snapshot_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "data.snapshot_dir must not be empty".to_string(),
            ));
        }

        let threshold = self.matching.capacity_threshold_pct;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::Validation(
                "matching.capacity_threshold_pct must be in range 0..=100".to_string(),
            ));
        }
        if self.matching.sanitize_cooldown_secs == 0 {
            return Err(ConfigError::Validation(
                "matching.sanitize_cooldown_secs must be greater than zero".to_string(),
            ));
        }
        if self.matching.sensor_recency_secs == 0 {
            return Err(ConfigError::Validation(
                "matching.sensor_recency_secs must be greater than zero".to_string(),
            ));
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::Validation(
                "logging.level must be one of trace|debug|info|warn|error".to_string(),
            )),
        }
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("deskmatch.toml"), PathBuf::from("config/deskmatch.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    llm: Option<LlmPatch>,
    data: Option<DataPatch>,
    matching: Option<MatchingPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DataPatch {
    snapshot_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchingPatch {
    capacity_threshold_pct: Option<f64>,
    sanitize_cooldown_secs: Option<u64>,
    sensor_recency_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    #[test]
    fn defaults_are_valid_and_match_design_intent() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(&["DESKMATCH_LLM_API_KEY", "DESKMATCH_SERVER_PORT"]);

        let config = AppConfig::load(LoadOptions::default()).expect("defaults should validate");
        assert_eq!(config.matching.capacity_threshold_pct, 80.0);
        assert_eq!(config.matching.sanitize_cooldown_secs, 14_400);
        assert_eq!(config.matching.sensor_recency_secs, 3_600);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn file_then_env_then_overrides_precedence() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("DESKMATCH_LLM_MODEL", "model-from-env");

        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("deskmatch.toml");
        fs::write(
            &path,
            r#"
[llm]
model = "model-from-file"

[data]
snapshot_dir = "from-file"

[matching]
sensor_recency_secs = 120
"#,
        )
        .expect("write config file");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(path),
            overrides: ConfigOverrides {
                snapshot_dir: Some(PathBuf::from("from-override")),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("config load");

        assert_eq!(config.llm.model, "model-from-env");
        assert_eq!(config.data.snapshot_dir, PathBuf::from("from-override"));
        assert_eq!(config.matching.sensor_recency_secs, 120);

        clear_vars(&["DESKMATCH_LLM_MODEL"]);
    }

    #[test]
    fn invalid_env_override_is_rejected_with_key_and_value() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("DESKMATCH_SERVER_PORT", "not-a-port");

        let error = AppConfig::load(LoadOptions::default()).expect_err("load should fail");
        assert!(matches!(
            error,
            ConfigError::InvalidEnvOverride { ref key, .. } if key == "DESKMATCH_SERVER_PORT"
        ));

        clear_vars(&["DESKMATCH_SERVER_PORT"]);
    }

    #[test]
    fn zero_recency_window_fails_validation() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("DESKMATCH_MATCHING_SENSOR_RECENCY_SECS", "0");

        let error = AppConfig::load(LoadOptions::default()).expect_err("load should fail");
        assert!(matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("sensor_recency_secs")
        ));

        clear_vars(&["DESKMATCH_MATCHING_SENSOR_RECENCY_SECS"]);
    }

    #[test]
    fn api_key_is_redacted_in_debug_output() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("DESKMATCH_LLM_API_KEY", "sk-super-secret");

        let config = AppConfig::load(LoadOptions::default()).expect("config load");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-super-secret"));
        assert_eq!(
            config.llm.api_key.as_ref().map(|key| key.expose_secret()),
            Some("sk-super-secret")
        );

        clear_vars(&["DESKMATCH_LLM_API_KEY"]);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let _guard = env_lock().lock().expect("env lock");

        let error = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("does-not-exist.toml")),
            require_file: true,
            ..LoadOptions::default()
        })
        .expect_err("load should fail");

        assert!(matches!(error, ConfigError::MissingConfigFile(_)));
    }

    #[test]
    fn default_log_format_is_compact() {
        let _guard = env_lock().lock().expect("env lock");
        let config = AppConfig::load(LoadOptions::default()).expect("config load");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }
}

use std::sync::Arc;
use std::time::Duration;

use deskmatch_agent::{KeywordInterpreter, LlmQueryParser, OpenAiClient};
use deskmatch_core::config::{AppConfig, ConfigError, LoadOptions};
use deskmatch_core::{DeskMatcher, QueryInterpreter};
use deskmatch_data::{JsonSnapshotStore, ReferenceDataProvider};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub provider: Arc<dyn ReferenceDataProvider>,
    pub matcher: Arc<DeskMatcher>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("llm client construction failed: {0}")]
    LlmClient(anyhow::Error),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let provider: Arc<dyn ReferenceDataProvider> =
        Arc::new(JsonSnapshotStore::new(config.data.snapshot_dir.clone()));
    info!(
        event_name = "system.bootstrap.snapshot_store_ready",
        correlation_id = "bootstrap",
        snapshot_dir = %config.data.snapshot_dir.display(),
        "reference data store configured"
    );

    let interpreter: Arc<dyn QueryInterpreter> = match &config.llm.api_key {
        Some(api_key) => {
            let client = OpenAiClient::new(
                &config.llm.base_url,
                &config.llm.model,
                api_key.clone(),
                Duration::from_secs(config.llm.timeout_secs),
            )
            .map_err(BootstrapError::LlmClient)?;
            info!(
                event_name = "system.bootstrap.interpreter_selected",
                correlation_id = "bootstrap",
                interpreter = "llm",
                model = %config.llm.model,
                "query interpreter initialized"
            );
            Arc::new(LlmQueryParser::new(Arc::new(client)))
        }
        None => {
            info!(
                event_name = "system.bootstrap.interpreter_selected",
                correlation_id = "bootstrap",
                interpreter = "keyword",
                "no llm api key configured, using keyword interpreter"
            );
            Arc::new(KeywordInterpreter::new())
        }
    };

    let matcher = Arc::new(DeskMatcher::new(interpreter, config.matching));
    Ok(Application { config, provider, matcher })
}

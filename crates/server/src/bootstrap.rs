use std::sync::Arc;

use dinebot_agent::llm::{HostedChatClient, LlmClient};
use dinebot_agent::locator::NominatimClient;
use dinebot_agent::runtime::AgentRuntime;
use dinebot_core::catalog::RestaurantCatalog;
use dinebot_core::config::{AppConfig, ConfigError};
use thiserror::Error;
use tracing::{info, warn};

pub struct Application {
    pub config: AppConfig,
    pub agent_runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("model client construction failed: {0}")]
    LlmClient(String),
}

/// Builds the shared collaborators once. The model client is only created when
/// a credential is configured; without one the runtime answers in degraded mode.
pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    config.validate()?;

    let search = Arc::new(NominatimClient::new(&config.geocoder));
    let llm_client = HostedChatClient::from_config(&config.llm)
        .map_err(|error| BootstrapError::LlmClient(error.to_string()))?
        .map(|client| Arc::new(client) as Arc<dyn LlmClient>);

    if llm_client.is_none() {
        warn!(
            event_name = "system.bootstrap.llm_credential_missing",
            correlation_id = "bootstrap",
            "no model credential configured; chat replies will be degraded"
        );
    }

    let agent_runtime = AgentRuntime::new(search, RestaurantCatalog::sample(), llm_client)
        .with_candidate_limit(config.geocoder.max_results);

    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        model = %config.llm.model,
        model_ready = agent_runtime.model_ready(),
        candidate_limit = agent_runtime.candidate_limit(),
        "agent runtime initialized"
    );

    Ok(Application { config, agent_runtime: Arc::new(agent_runtime) })
}

#[cfg(test)]
mod tests {
    use dinebot_core::config::AppConfig;

    use crate::bootstrap::{bootstrap_with_config, BootstrapError};

    #[test]
    fn bootstrap_without_credential_starts_degraded() {
        let mut config = AppConfig::default();
        config.llm.api_key = None;

        let app = bootstrap_with_config(config).expect("bootstrap should succeed");

        assert!(!app.agent_runtime.model_ready());
        assert_eq!(app.agent_runtime.candidate_limit(), 5);
    }

    #[test]
    fn bootstrap_with_credential_builds_model_client_once() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("hf_test".to_string().into());
        config.geocoder.max_results = 3;

        let app = bootstrap_with_config(config).expect("bootstrap should succeed");

        assert!(app.agent_runtime.model_ready());
        assert_eq!(app.agent_runtime.candidate_limit(), 3);
    }

    #[test]
    fn bootstrap_fails_fast_on_invalid_geocoder_url() {
        let mut config = AppConfig::default();
        config.geocoder.base_url = "nominatim.local".to_string();

        let result = bootstrap_with_config(config);

        let error = result.err().expect("bootstrap should fail");
        assert!(matches!(error, BootstrapError::Config(_)));
        assert!(error.to_string().contains("geocoder.base_url"));
    }
}

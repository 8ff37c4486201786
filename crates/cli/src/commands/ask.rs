use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use dinebot_agent::llm::{HostedChatClient, LlmClient};
use dinebot_agent::locator::NominatimClient;
use dinebot_agent::runtime::AgentRuntime;
use dinebot_core::catalog::RestaurantCatalog;
use dinebot_core::config::{AppConfig, LoadOptions};
use dinebot_core::domain::recommendation::{ChatRequest, ChatResponse};

use super::CommandResult;

const COMMAND: &str = "ask";

pub fn run(query: &str, server: Option<&str>, json_output: bool) -> CommandResult {
    if query.trim().is_empty() {
        return CommandResult::failure(COMMAND, "invalid_query", "query must not be empty", 2);
    }

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "config_validation", error.to_string(), 2)
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                3,
            )
        }
    };

    match server {
        Some(base_url) => match runtime.block_on(post_chat(base_url, query, &config)) {
            Ok(response) => render(&response, json_output),
            Err(error) => CommandResult::failure(COMMAND, "transport", error.to_string(), 4),
        },
        None => match build_agent(&config) {
            Ok(agent) => runtime.block_on(answer(&agent, query, json_output)),
            Err(error) => CommandResult::failure(COMMAND, "llm_client", error.to_string(), 3),
        },
    }
}

/// Same wiring as the server: live place search, built-in catalog, and a model
/// client only when a credential is configured.
pub fn build_agent(config: &AppConfig) -> Result<AgentRuntime> {
    let search = Arc::new(NominatimClient::new(&config.geocoder));
    let llm_client = HostedChatClient::from_config(&config.llm)?
        .map(|client| Arc::new(client) as Arc<dyn LlmClient>);

    Ok(AgentRuntime::new(search, RestaurantCatalog::sample(), llm_client)
        .with_candidate_limit(config.geocoder.max_results))
}

pub async fn answer(agent: &AgentRuntime, query: &str, json_output: bool) -> CommandResult {
    let response = agent.handle_query(query).await;
    render(&response, json_output)
}

async fn post_chat(base_url: &str, query: &str, config: &AppConfig) -> Result<ChatResponse> {
    // The server bounds the geocoder itself; the model call is only bounded when configured.
    let mut builder = reqwest::Client::builder();
    if let Some(llm_secs) = config.llm.timeout_secs {
        builder = builder.timeout(Duration::from_secs(llm_secs + config.geocoder.timeout_secs));
    }
    let client = builder.build()?;
    let url = format!("{}/chat", base_url.trim_end_matches('/'));

    let response =
        client.post(&url).json(&ChatRequest { query: query.to_string() }).send().await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("server returned {status}: {error_text}"));
    }

    Ok(response.json::<ChatResponse>().await?)
}

pub fn render(response: &ChatResponse, json_output: bool) -> CommandResult {
    if json_output {
        return match serde_json::to_string_pretty(response) {
            Ok(output) => CommandResult::rendered(output),
            Err(error) => CommandResult::failure(COMMAND, "serialization", error.to_string(), 5),
        };
    }

    match render_recommendation(response) {
        Ok(output) => CommandResult::rendered(output),
        Err(message) => CommandResult::failure(COMMAND, "malformed_response", message, 5),
    }
}

fn render_recommendation(response: &ChatResponse) -> Result<String, String> {
    let restaurants = response
        .parsed
        .restaurants()
        .ok_or_else(|| "response is missing a `restaurants` list".to_string())?;
    let explanation = response
        .parsed
        .explanation()
        .ok_or_else(|| "response is missing an `explanation`".to_string())?;

    let mut lines = vec!["Recommended Restaurants:".to_string()];
    lines.extend(restaurants.iter().map(|name| format!("- {name}")));
    lines.push(String::new());
    lines.push("Explanation:".to_string());
    lines.push(explanation.to_string());
    Ok(lines.join("\n"))
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use dinebot_core::config::LlmConfig;
use dinebot_core::domain::recommendation::Recommendation;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const MISSING_CREDENTIAL_EXPLANATION: &str = "HF_API_KEY not set. Cannot call LLM.";

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: String,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client for the hosted inference router.
///
/// The router picks the serving provider from the `model:provider` suffix.
pub struct HostedChatClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    provider: String,
    api_key: SecretString,
}

impl HostedChatClient {
    /// Returns `None` when no credential is configured.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone().filter(|_| config.has_credential()) else {
            return Ok(None);
        };

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Some(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            provider: config.provider.clone(),
            api_key,
        }))
    }

    fn routed_model(&self) -> String {
        format!("{}:{}", self.model, self.provider)
    }
}

#[async_trait]
impl LlmClient for HostedChatClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: self.routed_model(),
            messages: vec![ChatMessage { role: "user", content: prompt }],
            stream: false,
        };

        debug!(event_name = "agent.llm.request", model = %request.model, "chat completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("inference API error ({status}): {error_text}"));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        first_choice_content(completion)
    }
}

fn first_choice_content(completion: ChatCompletionResponse) -> Result<String> {
    completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| anyhow!("completion contained no choices"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DegradedReason {
    MissingCredential,
    ModelFailure(String),
}

impl DegradedReason {
    pub fn explanation(&self) -> String {
        match self {
            Self::MissingCredential => MISSING_CREDENTIAL_EXPLANATION.to_string(),
            Self::ModelFailure(message) => format!("LLM Error: {message}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvocationOutcome {
    Completed(String),
    /// `raw` is the JSON text handed back in place of a model reply.
    Degraded { reason: DegradedReason, raw: String },
}

impl InvocationOutcome {
    fn degraded(reason: DegradedReason) -> Self {
        let raw = Recommendation::new(Vec::new(), reason.explanation()).to_json_text();
        Self::Degraded { reason, raw }
    }

    pub fn raw_text(&self) -> &str {
        match self {
            Self::Completed(text) => text,
            Self::Degraded { raw, .. } => raw,
        }
    }

    pub fn into_raw_text(self) -> String {
        match self {
            Self::Completed(text) => text,
            Self::Degraded { raw, .. } => raw,
        }
    }
}

#[derive(Clone, Default)]
pub struct ModelInvoker {
    client: Option<Arc<dyn LlmClient>>,
}

impl ModelInvoker {
    pub fn new(client: Option<Arc<dyn LlmClient>>) -> Self {
        Self { client }
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// One attempt, no retry. Failures come back as a degraded outcome.
    pub async fn invoke(&self, prompt: &str) -> InvocationOutcome {
        let Some(client) = &self.client else {
            warn!(
                event_name = "agent.llm.missing_credential",
                "no model credential configured; skipping model call"
            );
            return InvocationOutcome::degraded(DegradedReason::MissingCredential);
        };

        match client.complete(prompt).await {
            Ok(text) => InvocationOutcome::Completed(text),
            Err(error) => {
                warn!(
                    event_name = "agent.llm.failure",
                    error = %error,
                    "model call failed; returning degraded payload"
                );
                InvocationOutcome::degraded(DegradedReason::ModelFailure(error.to_string()))
            }
        }
    }
}

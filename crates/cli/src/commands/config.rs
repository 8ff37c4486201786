use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dinebot_core::config::{AppConfig, LoadOptions, LEGACY_API_KEY_ENV};
use secrecy::ExposeSecret;
use toml::Value;

struct Field {
    key: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key, &field.value, source));
    }

    lines.join("\n")
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let api_key = config
        .llm
        .api_key
        .as_ref()
        .map(|key| redact_secret(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());

    vec![
        Field {
            key: "llm.provider",
            env_keys: &["DINEBOT_LLM_PROVIDER"],
            value: config.llm.provider.clone(),
        },
        Field { key: "llm.model", env_keys: &["DINEBOT_LLM_MODEL"], value: config.llm.model.clone() },
        Field {
            key: "llm.base_url",
            env_keys: &["DINEBOT_LLM_BASE_URL"],
            value: config.llm.base_url.clone(),
        },
        Field { key: "llm.api_key", env_keys: &["DINEBOT_LLM_API_KEY", LEGACY_API_KEY_ENV], value: api_key },
        Field {
            key: "llm.timeout_secs",
            env_keys: &["DINEBOT_LLM_TIMEOUT_SECS"],
            value: config
                .llm
                .timeout_secs
                .map(|secs| secs.to_string())
                .unwrap_or_else(|| "<unset>".to_string()),
        },
        Field {
            key: "geocoder.base_url",
            env_keys: &["DINEBOT_GEOCODER_BASE_URL"],
            value: config.geocoder.base_url.clone(),
        },
        Field {
            key: "geocoder.user_agent",
            env_keys: &["DINEBOT_GEOCODER_USER_AGENT"],
            value: config.geocoder.user_agent.clone(),
        },
        Field {
            key: "geocoder.timeout_secs",
            env_keys: &["DINEBOT_GEOCODER_TIMEOUT_SECS"],
            value: config.geocoder.timeout_secs.to_string(),
        },
        Field {
            key: "geocoder.max_results",
            env_keys: &["DINEBOT_GEOCODER_MAX_RESULTS"],
            value: config.geocoder.max_results.to_string(),
        },
        Field {
            key: "server.bind_address",
            env_keys: &["DINEBOT_SERVER_BIND_ADDRESS"],
            value: config.server.bind_address.clone(),
        },
        Field {
            key: "server.port",
            env_keys: &["DINEBOT_SERVER_PORT"],
            value: config.server.port.to_string(),
        },
        Field {
            key: "server.graceful_shutdown_secs",
            env_keys: &["DINEBOT_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            value: config.server.graceful_shutdown_secs.to_string(),
        },
        Field {
            key: "logging.level",
            env_keys: &["DINEBOT_LOGGING_LEVEL", "DINEBOT_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key: "logging.format",
            env_keys: &["DINEBOT_LOGGING_FORMAT", "DINEBOT_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    ["dinebot.toml", "config/dinebot.toml"].into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    // Blank env values are ignored by the loader, so they are not a source either.
    let env_key = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_key {
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

/// Keeps a token's vendor prefix (`hf_`) and hides the rest.
fn redact_secret(secret: &str) -> String {
    let trimmed = secret.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('_') {
        return format!("{prefix}_***");
    }

    "<redacted>".to_string()
}

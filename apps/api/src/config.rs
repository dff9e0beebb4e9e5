use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::extraction::browser::RenderSettings;
use crate::extraction::http::RetryPolicy;
use crate::extraction::registry::ExtractionSettings;
use crate::llm_client::{LlmConfig, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_model: String,
    /// Absent means in-memory cache and credential store.
    pub database_url: Option<String>,
    pub github_token: Option<String>,
    pub chromium_path: String,
    pub render_timeout_secs: u64,
    pub render_settle_ms: u64,
    pub http_timeout_secs: u64,
    pub http_max_attempts: u32,
    pub http_backoff_base_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            database_url: optional_env("DATABASE_URL"),
            github_token: optional_env("GITHUB_TOKEN"),
            chromium_path: optional_env("CHROMIUM_PATH").unwrap_or_else(|| "chromium".to_string()),
            render_timeout_secs: parse_env("RENDER_TIMEOUT_SECS", 40)?,
            render_settle_ms: parse_env("RENDER_SETTLE_MS", 3000)?,
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", 10)?,
            http_max_attempts: parse_env("HTTP_MAX_ATTEMPTS", 3)?,
            http_backoff_base_ms: parse_env("HTTP_BACKOFF_BASE_MS", 1000)?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.http_max_attempts.max(1),
            backoff_base: Duration::from_millis(self.http_backoff_base_ms),
        }
    }

    pub fn extraction_settings(&self) -> ExtractionSettings {
        ExtractionSettings {
            http_timeout: Duration::from_secs(self.http_timeout_secs),
            retry: self.retry_policy(),
            render: RenderSettings {
                chromium_path: self.chromium_path.clone(),
                settle: Duration::from_millis(self.render_settle_ms),
                ceiling: Duration::from_secs(self.render_timeout_secs),
            },
            github_token: self.github_token.clone(),
        }
    }

    pub fn llm_config(&self) -> LlmConfig {
        let mut config = LlmConfig::new(self.anthropic_api_key.clone(), self.llm_model.clone());
        config.retry = self.retry_policy();
        config
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

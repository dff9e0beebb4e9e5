//! Retrying JSON client shared by the structured-API adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::extraction::error::{FetchError, FetchErrorKind};
use crate::models::platform::Platform;

pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given 1-based attempt: none for the first, then base, 2·base, 4·base...
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = (attempt - 2).min(16);
        self.backoff_base.saturating_mul(1u32 << exponent)
    }

    pub fn is_retryable(status: StatusCode) -> bool {
        matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, retry })
    }

    pub async fn get_json(
        &self,
        platform: Platform,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<Value, FetchError> {
        self.send_with_retry(platform, || {
            let request = self
                .client
                .get(url)
                .header("accept", "application/json");
            match bearer {
                Some(token) => request.bearer_auth(token),
                None => request,
            }
        })
        .await
    }

    pub async fn post_json(
        &self,
        platform: Platform,
        url: &str,
        body: &Value,
    ) -> Result<Value, FetchError> {
        self.send_with_retry(platform, || {
            self.client
                .post(url)
                .header("accept", "application/json")
                .json(body)
        })
        .await
    }

    /// Issues the request, retrying only on 429/500/502/503/504.
    /// Transport failures are not retried; a timeout maps straight to `Timeout`.
    async fn send_with_retry<F>(&self, platform: Platform, build: F) -> Result<Value, FetchError>
    where
        F: Fn() -> RequestBuilder,
    {
        let attempts = self.retry.max_attempts.max(1);
        let mut last_error: Option<FetchError> = None;

        for attempt in 1..=attempts {
            if attempt > 1 {
                let delay = self.retry.delay_before(attempt);
                warn!(
                    "{} request attempt {} failed, retrying after {}ms...",
                    platform,
                    attempt - 1,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = build()
                .send()
                .await
                .map_err(|e| transport_error(platform, &e))?;

            let status = response.status();
            if RetryPolicy::is_retryable(status) {
                last_error = Some(status_error(platform, status));
                continue;
            }
            if !status.is_success() {
                return Err(status_error(platform, status));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| transport_error(platform, &e))?;
            debug!("{} request succeeded ({} bytes)", platform, body.len());

            return serde_json::from_slice(&body).map_err(|e| {
                FetchError::parse(platform, format!("invalid JSON from {platform}: {e}"))
            });
        }

        Err(last_error.unwrap_or_else(|| {
            FetchError::new(platform, FetchErrorKind::Unknown, "request was never attempted")
        }))
    }
}

fn status_error(platform: Platform, status: StatusCode) -> FetchError {
    let kind = match status.as_u16() {
        404 => FetchErrorKind::NotFound,
        429 => FetchErrorKind::RateLimited,
        403 => FetchErrorKind::Forbidden,
        _ => FetchErrorKind::Unknown,
    };
    FetchError::new(
        platform,
        kind,
        format!("{} responded with HTTP {}", platform.display_name(), status.as_u16()),
    )
}

fn transport_error(platform: Platform, err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::new(
            platform,
            FetchErrorKind::Timeout,
            format!("{} request timed out", platform.display_name()),
        )
    } else if err.is_decode() {
        FetchError::parse(platform, err.to_string())
    } else {
        FetchError::new(platform, FetchErrorKind::Unknown, err.to_string())
    }
}

use async_trait::async_trait;
use serde_json::Value;

use crate::extraction::error::{FetchError, FetchErrorKind};
use crate::extraction::http::ApiClient;
use crate::extraction::raw::RawRecord;
use crate::extraction::PlatformAdapter;
use crate::models::platform::Platform;

pub const DEFAULT_BASE_URL: &str = "https://www.hackerrank.com";

/// Badges with at least this many stars are listed as top badges.
const TOP_BADGE_STARS: u64 = 3;

pub struct HackerrankAdapter {
    client: ApiClient,
    base_url: String,
}

impl HackerrankAdapter {
    pub fn new(client: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PlatformAdapter for HackerrankAdapter {
    fn platform(&self) -> Platform {
        Platform::Hackerrank
    }

    async fn fetch(&self, identifier: &str) -> Result<RawRecord, FetchError> {
        let response = self
            .client
            .get_json(
                Platform::Hackerrank,
                &format!("{}/rest/hackers/{identifier}/badges", self.base_url),
                None,
            )
            .await
            .map_err(|e| match e.kind {
                FetchErrorKind::NotFound => FetchError::not_found(Platform::Hackerrank, identifier),
                _ => e,
            })?;

        let badges = response["models"].as_array().ok_or_else(|| {
            FetchError::parse(Platform::Hackerrank, "badge response has no models array")
        })?;
        Ok(summarize(badges))
    }
}

pub fn summarize(badges: &[Value]) -> RawRecord {
    let stars = |b: &Value| b["stars"].as_u64().unwrap_or(0);

    let total_stars = badges
        .iter()
        .map(stars)
        .fold(0u64, u64::saturating_add);
    let badges_earned = badges.iter().filter(|b| stars(b) >= 1).count() as u64;
    let challenges_solved: u64 = badges
        .iter()
        .map(|b| b["solved"].as_u64().unwrap_or(0))
        .sum();
    let top_badges: Vec<Value> = badges
        .iter()
        .filter(|b| stars(b) >= TOP_BADGE_STARS)
        .filter_map(|b| b["badge_name"].as_str())
        .map(Value::from)
        .collect();

    let mut record = RawRecord::new(Platform::Hackerrank);
    record.set("total_stars", total_stars);
    record.set("badges_earned", badges_earned);
    record.set("challenges_solved", challenges_solved);
    record.set("top_badges", Value::Array(top_badges));
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::http::RetryPolicy;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn badge_response() -> Value {
        json!({
            "models": [
                {"badge_name": "Problem Solving", "stars": 5, "solved": 120},
                {"badge_name": "Python", "stars": 3, "solved": 40},
                {"badge_name": "SQL", "stars": 1, "solved": 8},
                {"badge_name": "Java", "stars": 0, "solved": 1}
            ]
        })
    }

    #[test]
    fn test_summarize_badges() {
        let response = badge_response();
        let record = summarize(response["models"].as_array().unwrap());

        assert_eq!(record.fields["total_stars"], 9);
        assert_eq!(record.fields["badges_earned"], 3);
        assert_eq!(record.fields["challenges_solved"], 169);
        assert_eq!(record.fields["top_badges"], json!(["Problem Solving", "Python"]));
    }

    #[tokio::test]
    async fn test_fetch_reads_badges_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/hackers/ranker/badges"))
            .respond_with(ResponseTemplate::new(200).set_body_json(badge_response()))
            .mount(&server)
            .await;

        let client = ApiClient::new(std::time::Duration::from_secs(5), RetryPolicy::default())
            .unwrap();
        let record = HackerrankAdapter::new(client, server.uri())
            .fetch("ranker")
            .await
            .unwrap();
        assert_eq!(record.fields["total_stars"], 9);
    }

    #[tokio::test]
    async fn test_missing_models_is_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": false})))
            .mount(&server)
            .await;

        let client = ApiClient::new(std::time::Duration::from_secs(5), RetryPolicy::default())
            .unwrap();
        let err = HackerrankAdapter::new(client, server.uri())
            .fetch("ranker")
            .await
            .unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::ParseFailure);
    }
}

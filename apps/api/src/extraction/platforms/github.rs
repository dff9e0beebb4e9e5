use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

use crate::extraction::error::{FetchError, FetchErrorKind};
use crate::extraction::http::ApiClient;
use crate::extraction::raw::RawRecord;
use crate::extraction::PlatformAdapter;
use crate::models::platform::Platform;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Repositories inspected for code-quality indicators.
const QUALITY_SAMPLE: usize = 20;
/// Rough commits credited per repository pushed within the last year.
const COMMITS_PER_ACTIVE_REPO: u64 = 20;

pub struct GithubAdapter {
    client: ApiClient,
    base_url: String,
    token: Option<String>,
}

impl GithubAdapter {
    pub fn new(client: ApiClient, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }
}

#[async_trait]
impl PlatformAdapter for GithubAdapter {
    fn platform(&self) -> Platform {
        Platform::Github
    }

    async fn fetch(&self, identifier: &str) -> Result<RawRecord, FetchError> {
        let token = self.token.as_deref();
        let user = self
            .client
            .get_json(
                Platform::Github,
                &format!("{}/users/{identifier}", self.base_url),
                token,
            )
            .await
            .map_err(|e| not_found_with_name(e, identifier))?;

        let repos = self
            .client
            .get_json(
                Platform::Github,
                &format!(
                    "{}/users/{identifier}/repos?per_page=100&type=owner&sort=pushed",
                    self.base_url
                ),
                token,
            )
            .await?;
        let repos = repos
            .as_array()
            .ok_or_else(|| FetchError::parse(Platform::Github, "repository list is not an array"))?;

        Ok(summarize(&user, repos, Utc::now()))
    }
}

fn not_found_with_name(err: FetchError, identifier: &str) -> FetchError {
    if err.kind == FetchErrorKind::NotFound {
        FetchError::not_found(Platform::Github, identifier)
    } else {
        err
    }
}

/// Reduces the user object and repository list to raw statistics. Forks are ignored.
pub fn summarize(user: &Value, repos: &[Value], now: DateTime<Utc>) -> RawRecord {
    let originals: Vec<&Value> = repos
        .iter()
        .filter(|r| !r["fork"].as_bool().unwrap_or(false))
        .collect();

    let total_stars = originals
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(count(r, "stargazers_count")));
    let total_forks = originals
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(count(r, "forks_count")));

    let mut language_counts: BTreeMap<String, u64> = BTreeMap::new();
    for repo in &originals {
        if let Some(lang) = repo["language"].as_str().filter(|l| !l.is_empty()) {
            *language_counts.entry(lang.to_string()).or_insert(0) += 1;
        }
    }

    let pushed_within = |days: i64| {
        let cutoff = now - Duration::days(days);
        originals
            .iter()
            .filter(|r| timestamp(r, "pushed_at").is_some_and(|t| t > cutoff))
            .count() as u64
    };
    let recently_active = pushed_within(180);
    let active_last_year = pushed_within(365);

    let account_age_days = timestamp(user, "created_at")
        .map(|created| (now - created).num_days().max(0) as u64)
        .unwrap_or(0);

    let sample = &originals[..originals.len().min(QUALITY_SAMPLE)];
    let flag = |r: &Value, key: &str| r[key].as_bool().unwrap_or(false);
    let with_description = sample
        .iter()
        .filter(|r| {
            r["description"].as_str().is_some_and(|d| !d.trim().is_empty()) || flag(r, "has_wiki")
        })
        .count();
    let with_docs = sample
        .iter()
        .filter(|r| flag(r, "has_wiki") || flag(r, "has_pages"))
        .count();
    let with_issues = sample.iter().filter(|r| flag(r, "has_issues")).count();
    let non_empty = sample.iter().filter(|r| count(r, "size") > 0).count();

    let mut languages = Map::new();
    for (lang, n) in &language_counts {
        languages.insert(lang.clone(), Value::from(*n));
    }

    let mut record = RawRecord::new(Platform::Github);
    record.set("public_repos", originals.len() as u64);
    record.set("followers", count(user, "followers"));
    record.set("following", count(user, "following"));
    record.set("total_stars", total_stars);
    record.set("total_forks", total_forks);
    record.set("language_counts", Value::Object(languages));
    record.set("recently_active_repos", recently_active);
    record.set("commits_last_year", active_last_year * COMMITS_PER_ACTIVE_REPO);
    record.set("account_age_days", account_age_days);
    record.set("repos_checked", sample.len() as u64);
    record.set("repos_with_description", with_description as u64);
    record.set("repos_with_docs", with_docs as u64);
    record.set("repos_with_issues", with_issues as u64);
    record.set("non_empty_repos", non_empty as u64);
    record
}

fn count(value: &Value, key: &str) -> u64 {
    value[key].as_u64().unwrap_or(0)
}

fn timestamp(value: &Value, key: &str) -> Option<DateTime<Utc>> {
    value[key]
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::http::RetryPolicy;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn repos() -> Value {
        json!([
            {
                "name": "engine", "fork": false, "language": "Rust",
                "stargazers_count": 40, "forks_count": 5, "size": 900,
                "description": "A game engine", "has_wiki": false, "has_pages": true,
                "has_issues": true, "pushed_at": "2026-05-20T10:00:00Z"
            },
            {
                "name": "scripts", "fork": false, "language": "Python",
                "stargazers_count": 2, "forks_count": 0, "size": 0,
                "description": null, "has_wiki": false, "has_pages": false,
                "has_issues": false, "pushed_at": "2025-09-01T10:00:00Z"
            },
            {
                "name": "linux", "fork": true, "language": "C",
                "stargazers_count": 9000, "forks_count": 900, "size": 100000,
                "description": "fork", "has_wiki": true, "has_pages": true,
                "has_issues": true, "pushed_at": "2026-05-30T10:00:00Z"
            }
        ])
    }

    #[test]
    fn test_summarize_excludes_forks() {
        let user = json!({"followers": 10, "following": 3, "created_at": "2024-06-01T00:00:00Z"});
        let repos = repos();
        let record = summarize(&user, repos.as_array().unwrap(), now());

        assert_eq!(record.fields["public_repos"], 2);
        assert_eq!(record.fields["total_stars"], 42);
        assert_eq!(record.fields["total_forks"], 5);
        assert_eq!(record.fields["language_counts"], json!({"Python": 1, "Rust": 1}));
        assert_eq!(record.fields["recently_active_repos"], 1);
        assert_eq!(record.fields["commits_last_year"], 40);
        assert_eq!(record.fields["account_age_days"], 730);
    }

    #[test]
    fn test_summarize_quality_indicators() {
        let repos = repos();
        let record = summarize(&json!({}), repos.as_array().unwrap(), now());

        assert_eq!(record.fields["repos_checked"], 2);
        assert_eq!(record.fields["repos_with_description"], 1);
        assert_eq!(record.fields["repos_with_docs"], 1);
        assert_eq!(record.fields["repos_with_issues"], 1);
        assert_eq!(record.fields["non_empty_repos"], 1);
    }

    #[test]
    fn test_summarize_empty_account() {
        let record = summarize(&json!({"followers": 0}), &[], now());
        assert_eq!(record.fields["public_repos"], 0);
        assert_eq!(record.fields["repos_checked"], 0);
        assert_eq!(record.fields["account_age_days"], 0);
    }

    #[tokio::test]
    async fn test_fetch_sends_token_and_maps_missing_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/ghost"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(std::time::Duration::from_secs(5), RetryPolicy::default())
            .unwrap();
        let adapter = GithubAdapter::new(client, server.uri(), Some("secret".to_string()));
        let err = adapter.fetch("ghost").await.unwrap_err();

        assert_eq!(err.kind, FetchErrorKind::NotFound);
        assert!(err.message.contains("ghost"));
    }

    #[tokio::test]
    async fn test_fetch_combines_user_and_repos() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "octocat", "followers": 120, "following": 1,
                "created_at": "2015-01-01T00:00:00Z"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repos()))
            .mount(&server)
            .await;

        let client = ApiClient::new(std::time::Duration::from_secs(5), RetryPolicy::default())
            .unwrap();
        let adapter = GithubAdapter::new(client, server.uri(), None);
        let record = adapter.fetch("octocat").await.unwrap();

        assert_eq!(record.platform, Platform::Github);
        assert_eq!(record.fields["followers"], 120);
        assert_eq!(record.fields["public_repos"], 2);
    }
}

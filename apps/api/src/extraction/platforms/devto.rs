use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::extraction::error::{FetchError, FetchErrorKind};
use crate::extraction::http::ApiClient;
use crate::extraction::raw::RawRecord;
use crate::extraction::PlatformAdapter;
use crate::models::platform::Platform;

pub const DEFAULT_BASE_URL: &str = "https://dev.to";

const TOP_TAGS: usize = 5;

pub struct DevtoAdapter {
    client: ApiClient,
    base_url: String,
}

impl DevtoAdapter {
    pub fn new(client: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PlatformAdapter for DevtoAdapter {
    fn platform(&self) -> Platform {
        Platform::Devto
    }

    async fn fetch(&self, identifier: &str) -> Result<RawRecord, FetchError> {
        let user = self
            .client
            .get_json(
                Platform::Devto,
                &format!("{}/api/users/by_username?url={identifier}", self.base_url),
                None,
            )
            .await
            .map_err(|e| match e.kind {
                FetchErrorKind::NotFound => FetchError::not_found(Platform::Devto, identifier),
                _ => e,
            })?;

        let articles = self
            .client
            .get_json(
                Platform::Devto,
                &format!(
                    "{}/api/articles?username={identifier}&per_page=1000",
                    self.base_url
                ),
                None,
            )
            .await?;
        let articles = articles
            .as_array()
            .ok_or_else(|| FetchError::parse(Platform::Devto, "article list is not an array"))?;

        Ok(summarize(&user, articles))
    }
}

pub fn summarize(user: &Value, articles: &[Value]) -> RawRecord {
    let total_reactions: u64 = articles
        .iter()
        .map(|a| a["public_reactions_count"].as_u64().unwrap_or(0))
        .sum();
    let total_comments: u64 = articles
        .iter()
        .map(|a| a["comments_count"].as_u64().unwrap_or(0))
        .sum();

    let mut tag_counts: HashMap<String, u64> = HashMap::new();
    for article in articles {
        for tag in article_tags(article) {
            *tag_counts.entry(tag).or_insert(0) += 1;
        }
    }
    let mut tags: Vec<(String, u64)> = tag_counts.into_iter().collect();
    // Frequency descending, then name for a stable order.
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let top_tags: Vec<Value> = tags
        .into_iter()
        .take(TOP_TAGS)
        .map(|(t, _)| Value::from(t))
        .collect();

    let mut record = RawRecord::new(Platform::Devto);
    record.set("articles_published", articles.len() as u64);
    record.set("total_reactions", total_reactions);
    record.set("total_comments", total_comments);
    record.set(
        "followers",
        user["followers_count"].as_u64().unwrap_or(0),
    );
    record.set("top_tags", Value::Array(top_tags));
    record
}

/// The list endpoint returns `tag_list` as an array; single-article payloads use a comma string.
fn article_tags(article: &Value) -> Vec<String> {
    match &article["tag_list"] {
        Value::Array(items) => items
            .iter()
            .filter_map(|t| t.as_str())
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect(),
        Value::String(joined) => joined
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::extraction::error::FetchError;
use crate::extraction::http::ApiClient;
use crate::extraction::raw::RawRecord;
use crate::extraction::PlatformAdapter;
use crate::models::platform::Platform;

pub const DEFAULT_BASE_URL: &str = "https://leetcode.com";

const PROFILE_QUERY: &str = r#"
query getUserProfile($username: String!) {
  matchedUser(username: $username) {
    username
    submitStats {
      acSubmissionNum { difficulty count submissions }
      totalSubmissionNum { difficulty count submissions }
    }
    profile { ranking reputation }
  }
  userContestRanking(username: $username) {
    rating
    attendedContestsCount
  }
  recentSubmissionList(username: $username, limit: 20) {
    timestamp
  }
}
"#;

pub struct LeetcodeAdapter {
    client: ApiClient,
    base_url: String,
}

impl LeetcodeAdapter {
    pub fn new(client: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PlatformAdapter for LeetcodeAdapter {
    fn platform(&self) -> Platform {
        Platform::Leetcode
    }

    async fn fetch(&self, identifier: &str) -> Result<RawRecord, FetchError> {
        let body = json!({
            "query": PROFILE_QUERY,
            "variables": { "username": identifier },
        });
        let response = self
            .client
            .post_json(
                Platform::Leetcode,
                &format!("{}/graphql", self.base_url),
                &body,
            )
            .await?;

        parse_profile(&response, identifier)
    }
}

/// Maps the GraphQL envelope to raw statistics. A null `matchedUser` is NotFound.
pub fn parse_profile(response: &Value, identifier: &str) -> Result<RawRecord, FetchError> {
    let data = &response["data"];
    let user = &data["matchedUser"];
    if user.is_null() {
        if let Some(errors) = response["errors"].as_array().filter(|e| !e.is_empty()) {
            tracing::debug!("LeetCode returned {} GraphQL errors", errors.len());
        }
        return Err(FetchError::not_found(Platform::Leetcode, identifier));
    }

    let accepted = &user["submitStats"]["acSubmissionNum"];
    let submitted = &user["submitStats"]["totalSubmissionNum"];
    let by_difficulty = |list: &Value, difficulty: &str, key: &str| -> u64 {
        list.as_array()
            .and_then(|items| {
                items
                    .iter()
                    .find(|item| item["difficulty"].as_str() == Some(difficulty))
            })
            .and_then(|item| item[key].as_u64())
            .unwrap_or(0)
    };

    let easy = by_difficulty(accepted, "Easy", "count");
    let medium = by_difficulty(accepted, "Medium", "count");
    let hard = by_difficulty(accepted, "Hard", "count");

    let accepted_submissions = by_difficulty(accepted, "All", "submissions");
    let total_submissions = by_difficulty(submitted, "All", "submissions");
    let acceptance_rate = if total_submissions > 0 {
        accepted_submissions as f64 / total_submissions as f64 * 100.0
    } else {
        0.0
    };

    let contest = &data["userContestRanking"];
    let recent = data["recentSubmissionList"]
        .as_array()
        .map(|list| list.len())
        .unwrap_or(0);

    let mut record = RawRecord::new(Platform::Leetcode);
    record.set("easy_solved", easy);
    record.set("medium_solved", medium);
    record.set("hard_solved", hard);
    record.set("total_solved", easy + medium + hard);
    record.set("acceptance_rate", (acceptance_rate * 10.0).round() / 10.0);
    record.set("ranking", user["profile"]["ranking"].as_u64().unwrap_or(0));
    record.set("reputation", user["profile"]["reputation"].as_u64().unwrap_or(0));
    record.set("contest_rating", contest["rating"].as_f64().unwrap_or(0.0));
    record.set(
        "contests_attended",
        contest["attendedContestsCount"].as_u64().unwrap_or(0),
    );
    record.set("recent_submissions", recent as u64);
    Ok(record)
}

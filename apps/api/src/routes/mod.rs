pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::aggregation::handlers as platforms;
use crate::narrative::handlers as ai;
use crate::resume::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Room for the multipart framing and the `userId` field around a maximum-size résumé.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Platform API
        .route(
            "/api/v1/platforms/fetch/:platform",
            post(platforms::handle_fetch_platform),
        )
        .route(
            "/api/v1/platforms/fetch-all",
            post(platforms::handle_fetch_all),
        )
        .route(
            "/api/v1/platforms/data",
            get(platforms::handle_list_platform_data),
        )
        .route(
            "/api/v1/platforms/data/:platform",
            get(platforms::handle_get_platform_data),
        )
        .route(
            "/api/v1/analysis/complete",
            post(platforms::handle_complete_analysis)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        // AI API
        .route("/api/v1/ai/analyze/:platform", get(ai::handle_analyze))
        .route("/api/v1/ai/chat/:platform", post(ai::handle_chat))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::aggregation::cache::{CacheEntry, MemoryResultCache, ResultCache};
    use crate::aggregation::credentials::StaticCredentialResolver;
    use crate::aggregation::pipeline::tests::{aggregator_with, Behavior, FakeAdapter};
    use crate::extraction::error::{FetchError, FetchErrorKind};
    use crate::models::canonical::{CanonicalRecord, GithubRecord};
    use crate::models::platform::Platform;
    use crate::narrative::narrator::tests::FakeGenerator;
    use crate::narrative::narrator::Narrator;

    struct Harness {
        router: Router,
        cache: Arc<MemoryResultCache>,
        user: Uuid,
    }

    fn harness(credentials: &[(Platform, &str)]) -> Harness {
        let user = Uuid::new_v4();
        let (aggregator, cache) = aggregator_with(vec![
            FakeAdapter::new(
                Platform::Leetcode,
                Behavior::Succeed(json!({"easySolved": 80, "mediumSolved": 37, "hardSolved": 2})),
            ),
            FakeAdapter::new(Platform::Codechef, Behavior::Fail(FetchErrorKind::Timeout)),
        ]);
        let resolver = credentials
            .iter()
            .fold(StaticCredentialResolver::new(), |r, (p, id)| r.with(user, *p, id));

        let state = AppState {
            aggregator,
            cache: cache.clone(),
            credentials: Arc::new(resolver),
            narrator: Narrator::new(FakeGenerator::failing(503)),
        };
        Harness {
            router: build_router(state),
            cache,
            user,
        }
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(&[]);
        let (status, body) = send(&h.router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "footprint-api");
    }

    #[tokio::test]
    async fn test_unknown_platform_is_validation_error() {
        let h = harness(&[]);
        let uri = format!("/api/v1/platforms/data/myspace?userId={}", h.user);
        let (status, body) = send(&h.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_uncached_data_is_not_found() {
        let h = harness(&[]);
        let uri = format!("/api/v1/platforms/data/github?userId={}", h.user);
        let (status, body) = send(&h.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_fetch_unconfigured_platform_is_rejected() {
        let h = harness(&[]);
        let (status, body) = send(
            &h.router,
            Method::POST,
            "/api/v1/platforms/fetch/leetcode",
            Some(json!({"userId": h.user})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_fetch_then_read_back_cached_data() {
        let h = harness(&[(Platform::Leetcode, "dev_user")]);
        let (status, body) = send(
            &h.router,
            Method::POST,
            "/api/v1/platforms/fetch/leetcode",
            Some(json!({"userId": h.user})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["easySolved"], 80);
        assert!(body["score"]["platformScore"].is_number());

        let uri = format!("/api/v1/platforms/data/leetcode?userId={}", h.user);
        let (status, body) = send(&h.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["platform"], "leetcode");
        assert!(body["lastUpdated"].is_string());
    }

    #[tokio::test]
    async fn test_fetch_all_reports_partial_failure() {
        let h = harness(&[(Platform::Leetcode, "dev_user"), (Platform::Codechef, "chef")]);
        let (status, body) = send(
            &h.router,
            Method::POST,
            "/api/v1/platforms/fetch-all",
            Some(json!({"userId": h.user})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["successful"], 1);
        assert_eq!(body["failed"], 1);

        let results = body["results"].as_array().unwrap();
        let codechef = results.iter().find(|r| r["platform"] == "codechef").unwrap();
        assert_eq!(codechef["status"], "error");
        assert_eq!(codechef["error"]["kind"], "timeout");
    }

    #[tokio::test]
    async fn test_fetch_all_with_nothing_configured_is_422() {
        let h = harness(&[]);
        let (status, body) = send(
            &h.router,
            Method::POST,
            "/api/v1/platforms/fetch-all",
            Some(json!({"userId": h.user})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "NO_DATA_AVAILABLE");
    }

    #[tokio::test]
    async fn test_analyze_falls_back_when_generation_fails() {
        let h = harness(&[]);
        let record = CanonicalRecord::Github(GithubRecord {
            public_repos: 8,
            followers: 20,
            ..Default::default()
        });
        h.cache
            .store(CacheEntry::new(h.user, Platform::Github, Ok(record)))
            .await
            .unwrap();

        let uri = format!("/api/v1/ai/analyze/github?userId={}", h.user);
        let (status, body) = send(&h.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "fallback");
        assert_eq!(body["platform"], "github");
        assert!(body["weeklyPlan"]["day7"].is_string());
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_last_good_record_for_analysis() {
        let h = harness(&[]);
        let record = CanonicalRecord::Github(GithubRecord {
            public_repos: 8,
            ..Default::default()
        });
        h.cache
            .store(CacheEntry::new(h.user, Platform::Github, Ok(record)))
            .await
            .unwrap();
        h.cache
            .store(CacheEntry::new(
                h.user,
                Platform::Github,
                Err(FetchError::new(Platform::Github, FetchErrorKind::RateLimited, "429")),
            ))
            .await
            .unwrap();

        let uri = format!("/api/v1/platforms/data/github?userId={}", h.user);
        let (status, body) = send(&h.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert_eq!(body["data"]["publicRepos"], 8);
        assert_eq!(body["error"]["kind"], "rate_limited");

        let uri = format!("/api/v1/ai/analyze/github?userId={}", h.user);
        let (status, body) = send(&h.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["platform"], "github");
    }

    #[tokio::test]
    async fn test_list_platform_data_returns_every_cached_platform() {
        let h = harness(&[(Platform::Leetcode, "dev_user"), (Platform::Codechef, "chef")]);
        let uri = format!("/api/v1/platforms/data?userId={}", h.user);
        let (status, body) = send(&h.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        send(
            &h.router,
            Method::POST,
            "/api/v1/platforms/fetch-all",
            Some(json!({"userId": h.user})),
        )
        .await;

        let (status, body) = send(&h.router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let listed = body.as_array().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["platform"], "leetcode");
        assert_eq!(listed[0]["status"], "success");
        assert_eq!(listed[1]["platform"], "codechef");
        assert_eq!(listed[1]["status"], "error");
    }

    #[tokio::test]
    async fn test_complete_analysis_includes_career_report_for_target_role() {
        let h = harness(&[(Platform::Leetcode, "dev_user")]);
        let boundary = "footprint-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"userId\"\r\n\r\n{user}\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"targetRole\"\r\n\r\nBackend Engineer\r\n\
             --{boundary}--\r\n",
            user = h.user
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/analysis/complete")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = h.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["successful"], 1);
        assert!(body["compositeScore"].is_number());
        let report = &body["careerReport"];
        assert_eq!(report["source"], "fallback");
        assert_eq!(report["targetRole"], "Backend Engineer");
        assert_eq!(report["jobMatch"]["role"], "Backend Engineer");
        assert_eq!(report["compositeScore"], body["compositeScore"]);
        assert_eq!(report["roadmap"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_chat_rejects_overlong_question() {
        let h = harness(&[]);
        let question = "stars ".repeat(crate::narrative::handlers::MAX_QUESTION_CHARS);
        let (status, body) = send(
            &h.router,
            Method::POST,
            "/api/v1/ai/chat/github",
            Some(json!({"userId": h.user, "question": question})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_chat_redirects_off_topic_question() {
        let h = harness(&[]);
        h.cache
            .store(CacheEntry::new(
                h.user,
                Platform::Github,
                Ok(CanonicalRecord::Github(GithubRecord::default())),
            ))
            .await
            .unwrap();

        let (status, body) = send(
            &h.router,
            Method::POST,
            "/api/v1/ai/chat/github",
            Some(json!({"userId": h.user, "question": "How do I climb the CodeChef rating ladder?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["redirected"], true);
        assert_eq!(body["platform"], "github");
    }

    #[tokio::test]
    async fn test_chat_without_cached_data_is_not_found() {
        let h = harness(&[]);
        let (status, _) = send(
            &h.router,
            Method::POST,
            "/api/v1/ai/chat/github",
            Some(json!({"userId": h.user, "question": "How do I get more stars?"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

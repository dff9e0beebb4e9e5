//! Axum route handlers for the platform fetch and aggregate API.

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregation::cache::CachedPlatform;
use crate::aggregation::pipeline::{AggregateRequest, AggregateResult, PlatformOutcome};
use crate::errors::AppError;
use crate::extraction::error::FetchError;
use crate::models::canonical::CanonicalRecord;
use crate::models::platform::{Credential, Platform};
use crate::models::score::ScoreBreakdown;
use crate::narrative::career::{target_role_or_default, CareerReport, MAX_TARGET_ROLE_CHARS};
use crate::resume::{ats::resume_raw_record, extract_text};
use crate::scoring;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    pub platform: Platform,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CanonicalRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl FetchResponse {
    fn from_outcome(platform: Platform, outcome: PlatformOutcome, at: DateTime<Utc>) -> Self {
        match outcome {
            PlatformOutcome::Success { data, score } => Self {
                platform,
                status: "success",
                data: Some(data),
                score: Some(score),
                error: None,
                last_updated: Some(at),
            },
            PlatformOutcome::Error { error } => Self {
                platform,
                status: "error",
                data: None,
                score: None,
                error: Some(error),
                last_updated: None,
            },
        }
    }

    /// `status` reflects the most recent fetch. `data` is the last good
    /// record, which may predate a later failure reported in `error`.
    fn from_cache(cached: CachedPlatform) -> Self {
        Self {
            platform: cached.platform,
            status: if cached.last_error.is_some() {
                "error"
            } else {
                "success"
            },
            score: cached.record.as_ref().map(scoring::score),
            data: cached.record,
            error: cached.last_error,
            last_updated: Some(cached.recorded_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchAllResponse {
    pub results: Vec<FetchResponse>,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub composite_score: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteAnalysisResponse {
    #[serde(flatten)]
    pub aggregate: AggregateResult,
    pub career_report: CareerReport,
}

/// Parses a `:platform` path segment.
pub fn parse_platform(raw: &str) -> Result<Platform, AppError> {
    raw.parse().map_err(AppError::Validation)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/platforms/fetch/:platform
///
/// Runs one platform pipeline for the user's configured identifier.
/// A failed fetch is still a 200 with `status: "error"`.
pub async fn handle_fetch_platform(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Json(request): Json<FetchRequest>,
) -> Result<Json<FetchResponse>, AppError> {
    let platform = parse_platform(&platform)?;
    if !Platform::FETCHABLE.contains(&platform) {
        return Err(AppError::Validation(format!(
            "{platform} is not fetched; upload it via /api/v1/analysis/complete"
        )));
    }

    let identifier = state
        .credentials
        .resolve(request.user_id, platform)
        .await?
        .ok_or_else(|| {
            AppError::Validation(format!("{platform} is not configured for this user"))
        })?;

    let outcome = state
        .aggregator
        .fetch_one(request.user_id, &Credential::new(platform, identifier))
        .await?;

    Ok(Json(FetchResponse::from_outcome(platform, outcome, Utc::now())))
}

/// POST /api/v1/platforms/fetch-all
///
/// Fetches every configured platform concurrently. Unconfigured platforms are skipped.
pub async fn handle_fetch_all(
    State(state): State<AppState>,
    Json(request): Json<FetchRequest>,
) -> Result<Json<FetchAllResponse>, AppError> {
    let credentials = state.credentials.resolve_all(request.user_id).await?;
    let result = state
        .aggregator
        .aggregate(AggregateRequest {
            user_id: request.user_id,
            credentials,
            ..Default::default()
        })
        .await?;

    let generated_at = result.generated_at;
    let results: Vec<FetchResponse> = result
        .per_platform
        .into_iter()
        .map(|(platform, outcome)| FetchResponse::from_outcome(platform, outcome, generated_at))
        .collect();

    Ok(Json(FetchAllResponse {
        total: results.len(),
        successful: result.successful,
        failed: result.failed,
        composite_score: result.composite_score,
        results,
    }))
}

/// GET /api/v1/platforms/data/:platform?userId=
///
/// Latest cached result for one platform.
pub async fn handle_get_platform_data(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<FetchResponse>, AppError> {
    let platform = parse_platform(&platform)?;
    let cached = state
        .cache
        .latest(params.user_id, platform)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No {platform} data for this user")))?;

    Ok(Json(FetchResponse::from_cache(cached)))
}

/// GET /api/v1/platforms/data?userId=
///
/// Every cached platform result for the user. Empty when nothing was fetched yet.
pub async fn handle_list_platform_data(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<FetchResponse>>, AppError> {
    let cached = state.cache.all_for_user(params.user_id).await?;
    Ok(Json(cached.into_iter().map(FetchResponse::from_cache).collect()))
}

/// POST /api/v1/analysis/complete
///
/// Multipart form: `userId`, an optional `targetRole` and an optional `resume`
/// file (PDF or plain text). Aggregates every configured platform plus the
/// résumé, then writes a career report for the target role.
pub async fn handle_complete_analysis(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CompleteAnalysisResponse>, AppError> {
    let mut user_id: Option<Uuid> = None;
    let mut target_role: Option<String> = None;
    let mut resume_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "userId" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid userId field: {e}")))?;
                let parsed = raw
                    .trim()
                    .parse::<Uuid>()
                    .map_err(|_| AppError::Validation(format!("Invalid userId: {raw}")))?;
                user_id = Some(parsed);
            }
            "targetRole" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid targetRole field: {e}")))?;
                if raw.trim().chars().count() > MAX_TARGET_ROLE_CHARS {
                    return Err(AppError::Validation(format!(
                        "targetRole must be at most {MAX_TARGET_ROLE_CHARS} characters"
                    )));
                }
                target_role = Some(raw);
            }
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume upload: {e}")))?;
                resume_text = Some(extract_text(&file_name, &bytes)?);
            }
            _ => {}
        }
    }

    let user_id = user_id.ok_or_else(|| AppError::Validation("userId is required".to_string()))?;
    let credentials = state.credentials.resolve_all(user_id).await?;
    let provided = resume_text
        .as_deref()
        .map(resume_raw_record)
        .into_iter()
        .collect();

    let result = state
        .aggregator
        .aggregate(AggregateRequest {
            user_id,
            credentials,
            provided,
        })
        .await?;

    let breakdowns: Vec<ScoreBreakdown> = result
        .per_platform
        .values()
        .filter_map(|outcome| match outcome {
            PlatformOutcome::Success { score, .. } => Some(score.clone()),
            PlatformOutcome::Error { .. } => None,
        })
        .collect();
    let target_role = target_role_or_default(target_role.as_deref());
    let career_report = state
        .narrator
        .advise(&breakdowns, result.composite_score, &target_role)
        .await;

    Ok(Json(CompleteAnalysisResponse {
        aggregate: result,
        career_report,
    }))
}

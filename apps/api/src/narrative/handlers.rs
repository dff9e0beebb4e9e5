//! Axum route handlers for the AI analysis and chat API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::aggregation::handlers::{parse_platform, UserIdQuery};
use crate::errors::AppError;
use crate::models::canonical::CanonicalRecord;
use crate::models::platform::Platform;
use crate::narrative::chat::ChatMessage;
use crate::narrative::fallback::fallback_report;
use crate::narrative::report::NarrativeReport;
use crate::scoring;
use crate::state::AppState;

pub const MAX_QUESTION_CHARS: usize = 2_000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub user_id: Uuid,
    pub question: String,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub platform: Platform,
    pub redirected: bool,
}

/// The last successfully fetched record for `(user, platform)`, even when a
/// later fetch failed.
async fn cached_record(
    state: &AppState,
    user_id: Uuid,
    platform: Platform,
) -> Result<CanonicalRecord, AppError> {
    let cached = state
        .cache
        .latest(user_id, platform)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No {platform} data for this user; fetch it first"))
        })?;

    match (cached.record, cached.last_error) {
        (Some(record), None) => Ok(record),
        (Some(record), Some(error)) => {
            debug!(%platform, error = %error.message, "Serving last good record after failed fetch");
            Ok(record)
        }
        (None, Some(error)) => Err(AppError::NotFound(format!(
            "No {platform} data yet; last fetch failed: {}",
            error.message
        ))),
        (None, None) => Err(AppError::NotFound(format!("No {platform} data for this user"))),
    }
}

/// GET /api/v1/ai/analyze/:platform?userId=
///
/// Scores the cached record and narrates it. Narration problems fall back to
/// the computed report, so this only fails when there is no data.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<NarrativeReport>, AppError> {
    let platform = parse_platform(&platform)?;
    let record = cached_record(&state, params.user_id, platform).await?;
    let breakdown = scoring::score(&record);

    Ok(Json(state.narrator.narrate(&record, &breakdown).await))
}

/// POST /api/v1/ai/chat/:platform
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let platform = parse_platform(&platform)?;
    let question = request.question.trim();
    if question.is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(AppError::Validation(format!(
            "question must be at most {MAX_QUESTION_CHARS} characters"
        )));
    }

    let record = cached_record(&state, request.user_id, platform).await?;
    let report = fallback_report(&scoring::score(&record));
    let answer = state
        .narrator
        .chat(&record, &report, question, &request.chat_history)
        .await;

    Ok(Json(ChatResponse {
        answer: answer.answer,
        platform,
        redirected: answer.redirected,
    }))
}

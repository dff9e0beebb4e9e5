use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregation::cache::{CacheEntry, ResultCache};
use crate::aggregation::stage::{PipelineStage, StageTracker};
use crate::extraction::error::{FetchError, FetchErrorKind, ValidationError};
use crate::extraction::raw::RawRecord;
use crate::extraction::registry::AdapterRegistry;
use crate::extraction::validation::validate_identifier;
use crate::extraction::PlatformAdapter;
use crate::models::canonical::CanonicalRecord;
use crate::models::platform::{Credential, Platform};
use crate::models::score::ScoreBreakdown;
use crate::normalize::normalize;
use crate::scoring::{self, common::round2};

// ────────────────────────────────────────────────────────────────────────────
// Result types
// ────────────────────────────────────────────────────────────────────────────

/// What one platform contributed to an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlatformOutcome {
    Success {
        data: CanonicalRecord,
        score: ScoreBreakdown,
    },
    Error {
        error: FetchError,
    },
}

impl PlatformOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PlatformOutcome::Success { .. })
    }

    pub fn platform_score(&self) -> Option<f64> {
        match self {
            PlatformOutcome::Success { score, .. } => Some(score.platform_score),
            PlatformOutcome::Error { .. } => None,
        }
    }
}

impl From<Result<(CanonicalRecord, ScoreBreakdown), FetchError>> for PlatformOutcome {
    fn from(result: Result<(CanonicalRecord, ScoreBreakdown), FetchError>) -> Self {
        match result {
            Ok((data, score)) => PlatformOutcome::Success { data, score },
            Err(error) => PlatformOutcome::Error { error },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub user_id: Uuid,
    pub per_platform: BTreeMap<Platform, PlatformOutcome>,
    /// Mean `platform_score` over successful platforms only.
    pub composite_score: f64,
    pub successful: usize,
    pub failed: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Nothing succeeded, or nothing was configured. Distinct from a zero composite.
    #[error("No platform data available ({} platforms failed)", .failures.len())]
    NoDataAvailable {
        failures: BTreeMap<Platform, FetchError>,
    },
}

/// Input to one aggregation: credentials to fetch plus raw records built locally
/// (the résumé) that skip extraction.
#[derive(Debug, Clone, Default)]
pub struct AggregateRequest {
    pub user_id: Uuid,
    pub credentials: Vec<Credential>,
    pub provided: Vec<RawRecord>,
}

enum Job {
    Fetch(String),
    Provided(RawRecord),
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregator
// ────────────────────────────────────────────────────────────────────────────

/// Runs adapter -> normalizer -> scoring per platform, each in its own task.
#[derive(Clone)]
pub struct Aggregator {
    registry: Arc<AdapterRegistry>,
    cache: Arc<dyn ResultCache>,
}

impl Aggregator {
    pub fn new(registry: Arc<AdapterRegistry>, cache: Arc<dyn ResultCache>) -> Self {
        Self { registry, cache }
    }

    /// Runs a single platform. Only identifier validation can fail here; fetch
    /// failures come back as `PlatformOutcome::Error`.
    pub async fn fetch_one(
        &self,
        user_id: Uuid,
        credential: &Credential,
    ) -> Result<PlatformOutcome, ValidationError> {
        let identifier = validate_identifier(credential.platform, &credential.identifier)?;
        let handle = self.spawn_pipeline(user_id, credential.platform, Job::Fetch(identifier));
        Ok(join_outcome(credential.platform, handle.await))
    }

    pub async fn aggregate(
        &self,
        request: AggregateRequest,
    ) -> Result<AggregateResult, AggregateError> {
        self.aggregate_until(request, std::future::pending()).await
    }

    /// Like `aggregate`, but stops waiting once `cancel` resolves.
    ///
    /// Platforms that already finished keep their result. Tasks still running are
    /// aborted and reported as `FetchErrorKind::Cancelled`.
    pub async fn aggregate_until<C>(
        &self,
        request: AggregateRequest,
        cancel: C,
    ) -> Result<AggregateResult, AggregateError>
    where
        C: Future<Output = ()> + Send,
    {
        let AggregateRequest {
            user_id,
            credentials,
            provided,
        } = request;

        // Validate the whole batch before spawning anything.
        let mut jobs = Vec::with_capacity(credentials.len() + provided.len());
        for credential in &credentials {
            let identifier = validate_identifier(credential.platform, &credential.identifier)?;
            jobs.push((credential.platform, Job::Fetch(identifier)));
        }
        jobs.extend(provided.into_iter().map(|raw| (raw.platform, Job::Provided(raw))));

        let mut handles: Vec<(Platform, JoinHandle<_>)> = jobs
            .into_iter()
            .map(|(platform, job)| (platform, self.spawn_pipeline(user_id, platform, job)))
            .collect();

        let mut per_platform = BTreeMap::new();
        let mut cancelled = false;
        tokio::pin!(cancel);

        for (platform, handle) in handles.iter_mut() {
            if !cancelled {
                tokio::select! {
                    biased;
                    _ = &mut cancel => cancelled = true,
                    joined = &mut *handle => {
                        per_platform.insert(*platform, join_outcome(*platform, joined));
                        continue;
                    }
                }
            }

            // Cancelled: keep anything that already finished, abort the rest.
            let outcome = if handle.is_finished() {
                join_outcome(*platform, handle.await)
            } else {
                handle.abort();
                PlatformOutcome::Error {
                    error: FetchError::new(
                        *platform,
                        FetchErrorKind::Cancelled,
                        "Aggregate request cancelled before this platform finished",
                    ),
                }
            };
            per_platform.insert(*platform, outcome);
        }

        summarize(user_id, per_platform)
    }

    fn spawn_pipeline(
        &self,
        user_id: Uuid,
        platform: Platform,
        job: Job,
    ) -> JoinHandle<Result<(CanonicalRecord, ScoreBreakdown), FetchError>> {
        let adapter = self.registry.get(platform);
        let cache = self.cache.clone();

        tokio::spawn(async move {
            let result = run_pipeline(adapter, platform, job).await;

            let outcome = result.as_ref().map(|(record, _)| record.clone()).map_err(Clone::clone);
            if let Err(e) = cache.store(CacheEntry::new(user_id, platform, outcome)).await {
                warn!("Failed to cache {platform} result for user {user_id}: {e:#}");
            }
            result
        })
    }
}

async fn run_pipeline(
    adapter: Option<Arc<dyn PlatformAdapter>>,
    platform: Platform,
    job: Job,
) -> Result<(CanonicalRecord, ScoreBreakdown), FetchError> {
    let mut stage = StageTracker::new(platform);

    let raw = match job {
        Job::Provided(raw) => raw,
        Job::Fetch(identifier) => {
            stage.advance(PipelineStage::Fetching);
            let fetched = match adapter {
                Some(adapter) => adapter.fetch(&identifier).await,
                None => Err(FetchError::new(
                    platform,
                    FetchErrorKind::Unknown,
                    format!("No extraction adapter registered for {platform}"),
                )),
            };
            match fetched {
                Ok(raw) => raw,
                Err(e) => {
                    stage.advance(PipelineStage::FetchFailed);
                    warn!("{platform} fetch failed ({:?}): {}", e.kind, e.message);
                    return Err(e);
                }
            }
        }
    };
    stage.advance(PipelineStage::Fetched);

    let record = normalize(platform, &raw);
    stage.advance(PipelineStage::Scoring);
    let breakdown = scoring::score(&record);
    stage.advance(PipelineStage::Scored);

    Ok((record, breakdown))
}

fn join_outcome(
    platform: Platform,
    joined: Result<Result<(CanonicalRecord, ScoreBreakdown), FetchError>, JoinError>,
) -> PlatformOutcome {
    match joined {
        Ok(result) => result.into(),
        Err(e) if e.is_panic() => {
            warn!("{platform} pipeline task panicked");
            PlatformOutcome::Error {
                error: FetchError::new(platform, FetchErrorKind::Unknown, "Pipeline task panicked"),
            }
        }
        Err(_) => PlatformOutcome::Error {
            error: FetchError::new(platform, FetchErrorKind::Cancelled, "Pipeline task cancelled"),
        },
    }
}

fn summarize(
    user_id: Uuid,
    per_platform: BTreeMap<Platform, PlatformOutcome>,
) -> Result<AggregateResult, AggregateError> {
    let scores: Vec<f64> = per_platform
        .values()
        .filter_map(PlatformOutcome::platform_score)
        .collect();
    let successful = scores.len();
    let failed = per_platform.len() - successful;

    if successful == 0 {
        let failures = per_platform
            .into_iter()
            .filter_map(|(platform, outcome)| match outcome {
                PlatformOutcome::Error { error } => Some((platform, error)),
                PlatformOutcome::Success { .. } => None,
            })
            .collect();
        warn!("Aggregation for user {user_id} produced no data ({failed} failed)");
        return Err(AggregateError::NoDataAvailable { failures });
    }

    let composite_score = round2(scores.iter().sum::<f64>() / successful as f64);
    info!(
        "Aggregated user {user_id}: {successful} succeeded, {failed} failed, composite {composite_score:.2}"
    );

    Ok(AggregateResult {
        user_id,
        per_platform,
        composite_score,
        successful,
        failed,
        generated_at: Utc::now(),
    })
}

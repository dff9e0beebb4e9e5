use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::extraction::error::FetchError;
use crate::models::canonical::CanonicalRecord;
use crate::models::platform::Platform;

/// Most recent pipeline outcome for one `(user, platform)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub user_id: Uuid,
    pub platform: Platform,
    pub outcome: Result<CanonicalRecord, FetchError>,
    pub recorded_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(
        user_id: Uuid,
        platform: Platform,
        outcome: Result<CanonicalRecord, FetchError>,
    ) -> Self {
        Self {
            user_id,
            platform,
            outcome,
            recorded_at: Utc::now(),
        }
    }
}

/// What the cache knows about one `(user, platform)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPlatform {
    pub user_id: Uuid,
    pub platform: Platform,
    /// Last successfully fetched record. A later failed fetch leaves it in place.
    pub record: Option<CanonicalRecord>,
    /// Error from the most recent fetch; cleared by the next success.
    pub last_error: Option<FetchError>,
    /// When the most recent fetch finished, successful or not.
    pub recorded_at: DateTime<Utc>,
}

impl CachedPlatform {
    /// Folds a new pipeline outcome into what was cached before.
    pub fn apply(previous: Option<CachedPlatform>, entry: CacheEntry) -> Self {
        let (record, last_error) = match entry.outcome {
            Ok(record) => (Some(record), None),
            Err(error) => (previous.and_then(|p| p.record), Some(error)),
        };
        Self {
            user_id: entry.user_id,
            platform: entry.platform,
            record,
            last_error,
            recorded_at: entry.recorded_at,
        }
    }
}

/// Write-through store of per-platform results keyed by `(user, platform)`.
///
/// A successful `store` replaces the cached record. A failed one records the
/// error next to the last good record without discarding it.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn store(&self, entry: CacheEntry) -> Result<()>;
    async fn latest(&self, user_id: Uuid, platform: Platform) -> Result<Option<CachedPlatform>>;
    /// Every cached platform for the user, in platform order.
    async fn all_for_user(&self, user_id: Uuid) -> Result<Vec<CachedPlatform>>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

pub struct PgResultCache {
    pool: PgPool,
}

impl PgResultCache {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PlatformDataRow {
    user_id: Uuid,
    platform: String,
    status: String,
    data: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
    recorded_at: DateTime<Utc>,
}

impl PlatformDataRow {
    fn into_cached(self) -> Result<CachedPlatform> {
        let platform: Platform = self
            .platform
            .parse()
            .map_err(|e: String| anyhow!("Unknown platform in cache row: {e}"))?;

        let record = self
            .data
            .map(|data| {
                serde_json::from_value(data)
                    .with_context(|| format!("Corrupt cached {platform} record"))
            })
            .transpose()?;
        let last_error = match self.status.as_str() {
            "success" => {
                if record.is_none() {
                    return Err(anyhow!("{platform} cache row has no data"));
                }
                None
            }
            _ => {
                let error = self
                    .error
                    .ok_or_else(|| anyhow!("{platform} cache row has no error"))?;
                Some(
                    serde_json::from_value(error)
                        .with_context(|| format!("Corrupt cached {platform} error"))?,
                )
            }
        };

        Ok(CachedPlatform {
            user_id: self.user_id,
            platform,
            record,
            last_error,
            recorded_at: self.recorded_at,
        })
    }
}

#[async_trait]
impl ResultCache for PgResultCache {
    async fn store(&self, entry: CacheEntry) -> Result<()> {
        let (status, data, error) = match &entry.outcome {
            Ok(record) => ("success", Some(serde_json::to_value(record)?), None),
            Err(err) => ("error", None, Some(serde_json::to_value(err)?)),
        };

        sqlx::query(
            r#"
            INSERT INTO platform_data (user_id, platform, status, data, error, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, platform) DO UPDATE
            SET status = EXCLUDED.status,
                data = COALESCE(EXCLUDED.data, platform_data.data),
                error = EXCLUDED.error,
                recorded_at = EXCLUDED.recorded_at
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.platform.as_str())
        .bind(status)
        .bind(data)
        .bind(error)
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest(&self, user_id: Uuid, platform: Platform) -> Result<Option<CachedPlatform>> {
        let row: Option<PlatformDataRow> = sqlx::query_as(
            "SELECT user_id, platform, status, data, error, recorded_at FROM platform_data WHERE user_id = $1 AND platform = $2",
        )
        .bind(user_id)
        .bind(platform.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PlatformDataRow::into_cached).transpose()
    }

    async fn all_for_user(&self, user_id: Uuid) -> Result<Vec<CachedPlatform>> {
        let rows: Vec<PlatformDataRow> = sqlx::query_as(
            "SELECT user_id, platform, status, data, error, recorded_at FROM platform_data WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut cached = rows
            .into_iter()
            .map(PlatformDataRow::into_cached)
            .collect::<Result<Vec<_>>>()?;
        cached.sort_by_key(|c| c.platform);
        Ok(cached)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (no DATABASE_URL, tests)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryResultCache {
    entries: RwLock<HashMap<(Uuid, Platform), CachedPlatform>>,
}

impl MemoryResultCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultCache for MemoryResultCache {
    async fn store(&self, entry: CacheEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        let key = (entry.user_id, entry.platform);
        let merged = CachedPlatform::apply(entries.remove(&key), entry);
        entries.insert(key, merged);
        Ok(())
    }

    async fn latest(&self, user_id: Uuid, platform: Platform) -> Result<Option<CachedPlatform>> {
        Ok(self.entries.read().await.get(&(user_id, platform)).cloned())
    }

    async fn all_for_user(&self, user_id: Uuid) -> Result<Vec<CachedPlatform>> {
        let mut cached: Vec<CachedPlatform> = self
            .entries
            .read()
            .await
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        cached.sort_by_key(|c| c.platform);
        Ok(cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::error::FetchErrorKind;
    use crate::models::canonical::DevtoRecord;

    fn devto(articles: u64) -> CanonicalRecord {
        CanonicalRecord::Devto(DevtoRecord {
            articles_published: articles,
            ..Default::default()
        })
    }

    fn timeout() -> FetchError {
        FetchError::new(Platform::Devto, FetchErrorKind::Timeout, "slow")
    }

    #[tokio::test]
    async fn test_memory_cache_success_replaces_error() {
        let cache = MemoryResultCache::new();
        let user = Uuid::new_v4();

        cache
            .store(CacheEntry::new(user, Platform::Devto, Err(timeout())))
            .await
            .unwrap();
        cache
            .store(CacheEntry::new(user, Platform::Devto, Ok(devto(3))))
            .await
            .unwrap();

        let latest = cache.latest(user, Platform::Devto).await.unwrap().unwrap();
        assert_eq!(latest.record, Some(devto(3)));
        assert!(latest.last_error.is_none());
        assert!(cache.latest(user, Platform::Github).await.unwrap().is_none());
        assert!(cache
            .latest(Uuid::new_v4(), Platform::Devto)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_last_good_record() {
        let cache = MemoryResultCache::new();
        let user = Uuid::new_v4();

        cache
            .store(CacheEntry::new(user, Platform::Devto, Ok(devto(5))))
            .await
            .unwrap();
        cache
            .store(CacheEntry::new(user, Platform::Devto, Err(timeout())))
            .await
            .unwrap();

        let latest = cache.latest(user, Platform::Devto).await.unwrap().unwrap();
        assert_eq!(latest.record, Some(devto(5)));
        assert_eq!(latest.last_error.unwrap().kind, FetchErrorKind::Timeout);
    }

    #[test]
    fn test_error_without_history_has_no_record() {
        let user = Uuid::new_v4();
        let cached = CachedPlatform::apply(None, CacheEntry::new(user, Platform::Devto, Err(timeout())));
        assert!(cached.record.is_none());
        assert!(cached.last_error.is_some());
    }

    #[tokio::test]
    async fn test_all_for_user_lists_only_that_user_in_platform_order() {
        let cache = MemoryResultCache::new();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        for (owner, platform) in [
            (user, Platform::Devto),
            (user, Platform::Github),
            (other, Platform::Leetcode),
        ] {
            cache
                .store(CacheEntry::new(owner, platform, Err(timeout())))
                .await
                .unwrap();
        }

        let platforms: Vec<Platform> = cache
            .all_for_user(user)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.platform)
            .collect();
        assert_eq!(platforms, vec![Platform::Github, Platform::Devto]);
    }

    fn row(status: &str, data: Option<serde_json::Value>, error: Option<serde_json::Value>) -> PlatformDataRow {
        PlatformDataRow {
            user_id: Uuid::new_v4(),
            platform: "devto".into(),
            status: status.into(),
            data,
            error,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_pg_row_decodes_both_outcomes() {
        let ok = row(
            "success",
            Some(serde_json::json!({"platform": "devto", "articlesPublished": 7})),
            None,
        )
        .into_cached()
        .unwrap();
        assert_eq!(ok.platform, Platform::Devto);
        assert_eq!(ok.record, Some(devto(7)));
        assert!(ok.last_error.is_none());

        let err = row(
            "error",
            Some(serde_json::json!({"platform": "devto", "articlesPublished": 7})),
            Some(serde_json::json!({"platform": "devto", "kind": "not_found", "message": "gone"})),
        )
        .into_cached()
        .unwrap();
        assert_eq!(err.record, Some(devto(7)));
        assert_eq!(err.last_error.unwrap().kind, FetchErrorKind::NotFound);
    }

    #[test]
    fn test_pg_row_without_payload_is_rejected() {
        assert!(row("success", None, None).into_cached().is_err());
        assert!(row("error", None, None).into_cached().is_err());
    }
}

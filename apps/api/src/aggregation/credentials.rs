use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::platform::{Credential, Platform};

/// Profile-store lookup: which identifier a user configured for a platform.
///
/// `None` means "not configured", which callers treat as "skip this platform".
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(&self, user_id: Uuid, platform: Platform) -> Result<Option<String>>;

    /// Every configured fetchable platform for the user, in display order.
    async fn resolve_all(&self, user_id: Uuid) -> Result<Vec<Credential>> {
        let mut credentials = Vec::new();
        for platform in Platform::FETCHABLE {
            if let Some(identifier) = self.resolve(user_id, platform).await? {
                credentials.push(Credential::new(platform, identifier));
            }
        }
        Ok(credentials)
    }
}

fn configured(identifier: Option<String>) -> Option<String> {
    identifier.filter(|id| !id.trim().is_empty())
}

pub struct PgCredentialResolver {
    pool: PgPool,
}

impl PgCredentialResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialResolver for PgCredentialResolver {
    async fn resolve(&self, user_id: Uuid, platform: Platform) -> Result<Option<String>> {
        let identifier: Option<String> = sqlx::query_scalar(
            "SELECT identifier FROM platform_credentials WHERE user_id = $1 AND platform = $2",
        )
        .bind(user_id)
        .bind(platform.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(configured(identifier))
    }
}

/// Fixed in-memory credentials.
#[derive(Debug, Default, Clone)]
pub struct StaticCredentialResolver {
    credentials: HashMap<(Uuid, Platform), String>,
}

impl StaticCredentialResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, user_id: Uuid, platform: Platform, identifier: &str) -> Self {
        self.credentials
            .insert((user_id, platform), identifier.to_string());
        self
    }
}

#[async_trait]
impl CredentialResolver for StaticCredentialResolver {
    async fn resolve(&self, user_id: Uuid, platform: Platform) -> Result<Option<String>> {
        Ok(configured(self.credentials.get(&(user_id, platform)).cloned()))
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::extraction::browser::{DocumentRenderer, HeadlessChromeRenderer, RenderSettings};
use crate::extraction::http::{ApiClient, RetryPolicy};
use crate::extraction::platforms::devto::{self, DevtoAdapter};
use crate::extraction::platforms::github::{self, GithubAdapter};
use crate::extraction::platforms::hackerrank::{self, HackerrankAdapter};
use crate::extraction::platforms::leetcode::{self, LeetcodeAdapter};
use crate::extraction::platforms::{codechef, devpost, geeksforgeeks, linkedin};
use crate::extraction::PlatformAdapter;
use crate::models::platform::Platform;

/// Everything the adapters need, passed in explicitly from `Config`.
#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub http_timeout: Duration,
    pub retry: RetryPolicy,
    pub render: RenderSettings,
    pub github_token: Option<String>,
}

/// Platform -> adapter lookup shared by the aggregator and handlers.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Platform, Arc<dyn PlatformAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the production registry: four API adapters and four rendered ones
    /// sharing one Chromium renderer (each render still gets its own process).
    pub fn from_settings(settings: &ExtractionSettings) -> Result<Self> {
        let client = ApiClient::new(settings.http_timeout, settings.retry.clone())
            .context("Failed to build HTTP client for platform adapters")?;
        let renderer: Arc<dyn DocumentRenderer> =
            Arc::new(HeadlessChromeRenderer::new(settings.render.clone()));
        let ceiling = settings.render.ceiling;

        let mut registry = Self::new();
        registry.register(Arc::new(GithubAdapter::new(
            client.clone(),
            github::DEFAULT_BASE_URL,
            settings.github_token.clone(),
        )));
        registry.register(Arc::new(LeetcodeAdapter::new(
            client.clone(),
            leetcode::DEFAULT_BASE_URL,
        )));
        registry.register(Arc::new(DevtoAdapter::new(
            client.clone(),
            devto::DEFAULT_BASE_URL,
        )));
        registry.register(Arc::new(HackerrankAdapter::new(
            client,
            hackerrank::DEFAULT_BASE_URL,
        )));

        registry.register(Arc::new(
            geeksforgeeks::adapter(renderer.clone(), ceiling)
                .context("Invalid GeeksforGeeks pattern rules")?,
        ));
        registry.register(Arc::new(
            codechef::adapter(renderer.clone(), ceiling).context("Invalid CodeChef pattern rules")?,
        ));
        registry.register(Arc::new(
            devpost::adapter(renderer.clone(), ceiling).context("Invalid DevPost pattern rules")?,
        ));
        registry.register(Arc::new(
            linkedin::adapter(renderer, ceiling).context("Invalid LinkedIn pattern rules")?,
        ));

        info!(
            "Adapter registry ready: {} platforms (render ceiling {}s)",
            registry.adapters.len(),
            ceiling.as_secs()
        );
        Ok(registry)
    }

    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        self.adapters.insert(adapter.platform(), adapter);
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn PlatformAdapter>> {
        self.adapters.get(&platform).cloned()
    }

    pub fn platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = self.adapters.keys().copied().collect();
        platforms.sort();
        platforms
    }
}

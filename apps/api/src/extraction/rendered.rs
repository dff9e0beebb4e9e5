use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::extraction::browser::{DocumentRenderer, RenderError};
use crate::extraction::error::{FetchError, FetchErrorKind};
use crate::extraction::patterns::{compile_rules, extract_fields, CompiledRule, FieldRule};
use crate::extraction::raw::RawRecord;
use crate::extraction::PlatformAdapter;
use crate::models::platform::Platform;

/// Adapter for platforms with no API: render the profile page, then run pattern rules.
pub struct RenderedAdapter {
    platform: Platform,
    /// Profile URL with an `{id}` placeholder.
    url_template: &'static str,
    rules: Vec<CompiledRule>,
    renderer: Arc<dyn DocumentRenderer>,
    ceiling: Duration,
    post_process: Option<fn(&mut RawRecord)>,
}

impl RenderedAdapter {
    pub fn new(
        platform: Platform,
        url_template: &'static str,
        rules: &[FieldRule],
        renderer: Arc<dyn DocumentRenderer>,
        ceiling: Duration,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            platform,
            url_template,
            rules: compile_rules(rules)?,
            renderer,
            ceiling,
            post_process: None,
        })
    }

    pub fn with_post_process(mut self, post_process: fn(&mut RawRecord)) -> Self {
        self.post_process = Some(post_process);
        self
    }

    pub fn profile_url(&self, identifier: &str) -> String {
        self.url_template.replace("{id}", identifier)
    }

    fn render_error(&self, err: RenderError) -> FetchError {
        let kind = match err {
            RenderError::EmptyDocument => FetchErrorKind::ParseFailure,
            _ => FetchErrorKind::Unknown,
        };
        FetchError::new(self.platform, kind, err.to_string())
    }
}

#[async_trait]
impl PlatformAdapter for RenderedAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch(&self, identifier: &str) -> Result<RawRecord, FetchError> {
        let url = self.profile_url(identifier);

        // The ceiling covers launch, navigation and teardown. On expiry the render
        // future is dropped, which kills the browser process.
        let html = match tokio::time::timeout(self.ceiling, self.renderer.render(&url)).await {
            Ok(Ok(html)) => html,
            Ok(Err(e)) => return Err(self.render_error(e)),
            Err(_) => {
                warn!(
                    "{} render exceeded {}s ceiling",
                    self.platform,
                    self.ceiling.as_secs()
                );
                return Err(FetchError::new(
                    self.platform,
                    FetchErrorKind::Timeout,
                    format!(
                        "{} profile did not render within {}s",
                        self.platform.display_name(),
                        self.ceiling.as_secs()
                    ),
                ));
            }
        };

        let mut record = RawRecord::with_fields(self.platform, extract_fields(&self.rules, &html));
        if let Some(post_process) = self.post_process {
            post_process(&mut record);
        }
        debug!(
            "{} extracted {}/{} fields",
            self.platform,
            record.fields.len(),
            self.rules.len()
        );
        Ok(record)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Serves a fixed document, optionally after a delay.
    pub(crate) struct FixtureRenderer {
        pub html: String,
        pub delay: Duration,
    }

    impl FixtureRenderer {
        pub(crate) fn new(html: &str) -> Arc<Self> {
            Arc::new(Self {
                html: html.to_string(),
                delay: Duration::ZERO,
            })
        }
    }

    #[async_trait]
    impl DocumentRenderer for FixtureRenderer {
        async fn render(&self, _url: &str) -> Result<String, RenderError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.html.clone())
        }
    }

    struct FailingRenderer;

    #[async_trait]
    impl DocumentRenderer for FailingRenderer {
        async fn render(&self, _url: &str) -> Result<String, RenderError> {
            Err(RenderError::EmptyDocument)
        }
    }

    const RULES: &[FieldRule] = &[FieldRule::count("followers", &[r"(?i)([\d,]+)\s*followers"])];

    #[tokio::test(start_paused = true)]
    async fn test_render_past_ceiling_is_timeout() {
        let renderer = Arc::new(FixtureRenderer {
            html: "12 followers".to_string(),
            delay: Duration::from_secs(60),
        });
        let adapter = RenderedAdapter::new(
            Platform::Devpost,
            "https://devpost.com/{id}",
            RULES,
            renderer,
            Duration::from_secs(40),
        )
        .unwrap();

        let err = adapter.fetch("someone").await.unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Timeout);
        assert_eq!(err.platform, Platform::Devpost);
    }

    #[tokio::test]
    async fn test_unmatched_page_is_degraded_success() {
        let adapter = RenderedAdapter::new(
            Platform::Devpost,
            "https://devpost.com/{id}",
            RULES,
            FixtureRenderer::new("<html><body>nothing here</body></html>"),
            Duration::from_secs(40),
        )
        .unwrap();

        let record = adapter.fetch("someone").await.unwrap();
        assert!(record.fields.is_empty());
    }

    #[tokio::test]
    async fn test_empty_document_is_parse_failure() {
        let adapter = RenderedAdapter::new(
            Platform::Devpost,
            "https://devpost.com/{id}",
            RULES,
            Arc::new(FailingRenderer),
            Duration::from_secs(40),
        )
        .unwrap();

        let err = adapter.fetch("someone").await.unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::ParseFailure);
    }

    #[test]
    fn test_profile_url_substitutes_identifier() {
        let adapter = RenderedAdapter::new(
            Platform::Codechef,
            "https://www.codechef.com/users/{id}",
            RULES,
            FixtureRenderer::new(""),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            adapter.profile_url("chef_1"),
            "https://www.codechef.com/users/chef_1"
        );
    }
}

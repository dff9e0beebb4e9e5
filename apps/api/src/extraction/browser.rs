//! Headless browser rendering for platforms that only serve client-rendered pages.
//!
//! One Chromium process per call, each with its own throwaway profile directory.
//! `BrowserProcess` owns both and tears them down on every exit path, including
//! the future being dropped by an outer timeout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::extraction::http::USER_AGENT;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch browser: {0}")]
    Launch(#[source] std::io::Error),

    #[error("failed to prepare browser profile: {0}")]
    Profile(#[source] std::io::Error),

    #[error("browser exited with {status}: {stderr}")]
    Exited { status: String, stderr: String },

    #[error("browser produced an empty document")]
    EmptyDocument,

    #[error("browser I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces the fully rendered HTML for a URL.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String, RenderError>;
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub chromium_path: String,
    /// Virtual time the page gets to settle after load before the DOM is dumped.
    pub settle: Duration,
    /// Wall-clock ceiling for launch, navigation and teardown together.
    pub ceiling: Duration,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            chromium_path: "chromium".to_string(),
            settle: Duration::from_millis(3000),
            ceiling: Duration::from_secs(40),
        }
    }
}

/// Scoped browser resource. Dropping it kills the process and deletes the profile.
struct BrowserProcess {
    child: Child,
    _profile: TempDir,
}

impl BrowserProcess {
    fn launch(settings: &RenderSettings, url: &str) -> Result<Self, RenderError> {
        let profile = tempfile::Builder::new()
            .prefix("footprint-chromium-")
            .tempdir()
            .map_err(RenderError::Profile)?;

        let child = Command::new(&settings.chromium_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-first-run")
            .arg("--disable-dev-shm-usage")
            .arg("--window-size=1920,1080")
            .arg(format!("--user-agent={USER_AGENT}"))
            .arg(format!("--user-data-dir={}", profile.path().display()))
            .arg(format!(
                "--virtual-time-budget={}",
                settings.settle.as_millis()
            ))
            .arg("--dump-dom")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(RenderError::Launch)?;

        Ok(Self {
            child,
            _profile: profile,
        })
    }

    async fn dump_dom(&mut self) -> Result<String, RenderError> {
        let mut stdout = self.child.stdout.take().ok_or(RenderError::EmptyDocument)?;
        let mut stderr = self.child.stderr.take().ok_or(RenderError::EmptyDocument)?;

        let mut html = String::new();
        let mut errors = String::new();
        let (out, err, status) = tokio::join!(
            stdout.read_to_string(&mut html),
            stderr.read_to_string(&mut errors),
            self.child.wait()
        );
        out?;
        err?;
        let status = status?;

        if !status.success() {
            return Err(RenderError::Exited {
                status: status.to_string(),
                stderr: errors.chars().take(500).collect(),
            });
        }
        if html.trim().is_empty() {
            return Err(RenderError::EmptyDocument);
        }
        Ok(html)
    }
}

impl Drop for BrowserProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            warn!("Killing browser process that did not exit on its own");
            let _ = self.child.start_kill();
        }
    }
}

pub struct HeadlessChromeRenderer {
    settings: RenderSettings,
}

impl HeadlessChromeRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl DocumentRenderer for HeadlessChromeRenderer {
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        debug!("Rendering {url}");
        let mut browser = BrowserProcess::launch(&self.settings, url)?;
        let html = browser.dump_dom().await?;
        debug!("Rendered {url} ({} bytes)", html.len());
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let renderer = HeadlessChromeRenderer::new(RenderSettings {
            chromium_path: "/nonexistent/footprint-chromium".to_string(),
            ..RenderSettings::default()
        });
        let err = renderer.render("https://example.com").await.unwrap_err();
        assert!(matches!(err, RenderError::Launch(_)));
    }
}

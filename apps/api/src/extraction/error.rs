use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    NotFound,
    RateLimited,
    Forbidden,
    Timeout,
    ParseFailure,
    /// The aggregate request was cancelled while this platform was in flight.
    Cancelled,
    Unknown,
}

/// Per-platform extraction failure. Recoverable at the aggregate level.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{platform} fetch failed ({kind:?}): {message}")]
pub struct FetchError {
    pub platform: Platform,
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(platform: Platform, kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            platform,
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(platform: Platform, identifier: &str) -> Self {
        Self::new(
            platform,
            FetchErrorKind::NotFound,
            format!("{} user '{identifier}' not found", platform.display_name()),
        )
    }

    pub fn parse(platform: Platform, message: impl Into<String>) -> Self {
        Self::new(platform, FetchErrorKind::ParseFailure, message)
    }
}

/// Malformed input, rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{platform} identifier is empty")]
    Empty { platform: Platform },

    #[error("{platform} identifier exceeds {max} characters")]
    TooLong { platform: Platform, max: usize },

    #[error("{platform} identifier contains invalid characters: '{identifier}'")]
    InvalidCharacters { platform: Platform, identifier: String },

    #[error("{0}")]
    Input(String),
}

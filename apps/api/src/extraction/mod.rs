// Extraction adapters: credential in, raw statistics out.
// Structured APIs go through `http::ApiClient`; client-rendered profiles go
// through `rendered::RenderedAdapter` and a `browser::DocumentRenderer`.

pub mod browser;
pub mod error;
pub mod http;
pub mod patterns;
pub mod platforms;
pub mod raw;
pub mod registry;
pub mod rendered;
pub mod validation;

use async_trait::async_trait;

use crate::extraction::error::FetchError;
use crate::extraction::raw::RawRecord;
use crate::models::platform::Platform;

/// Turns a validated identifier into a raw statistics record for one platform.
///
/// Carried in the registry as `Arc<dyn PlatformAdapter>`, so any strategy can be
/// swapped without touching normalization or scoring.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// `identifier` has already passed `validation::validate_identifier`.
    async fn fetch(&self, identifier: &str) -> Result<RawRecord, FetchError>;
}

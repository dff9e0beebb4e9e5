use std::sync::Arc;

use crate::aggregation::cache::ResultCache;
use crate::aggregation::credentials::CredentialResolver;
use crate::aggregation::pipeline::Aggregator;
use crate::narrative::narrator::Narrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
    /// Same cache the aggregator writes through to.
    pub cache: Arc<dyn ResultCache>,
    pub credentials: Arc<dyn CredentialResolver>,
    pub narrator: Narrator,
}

use serde::Serialize;
use tracing::{debug, warn};

use crate::models::platform::Platform;

/// Per-platform lifecycle of one fetch-and-analyze request.
///
/// ```text
/// Pending -> Fetching -> Fetched | FetchFailed
/// Pending -> Fetched                      (locally provided raw record)
/// Fetched -> Scoring -> Scored -> Narrating -> Narrated | NarrationFallback
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Pending,
    Fetching,
    Fetched,
    FetchFailed,
    Scoring,
    Scored,
    Narrating,
    Narrated,
    NarrationFallback,
}

impl PipelineStage {
    pub fn can_transition_to(self, next: PipelineStage) -> bool {
        use PipelineStage::*;
        matches!(
            (self, next),
            (Pending, Fetching)
                | (Pending, Fetched)
                | (Fetching, Fetched)
                | (Fetching, FetchFailed)
                | (Fetched, Scoring)
                | (Scoring, Scored)
                | (Scored, Narrating)
                | (Narrating, Narrated)
                | (Narrating, NarrationFallback)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineStage::Narrated | PipelineStage::NarrationFallback | PipelineStage::FetchFailed
        )
    }
}

/// Tracks and logs the stage of a single platform pipeline.
#[derive(Debug)]
pub struct StageTracker {
    platform: Platform,
    stage: PipelineStage,
}

impl StageTracker {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            stage: PipelineStage::Pending,
        }
    }

    /// Picks up a pipeline that an earlier request carried to `stage`.
    pub fn resume_at(platform: Platform, stage: PipelineStage) -> Self {
        Self { platform, stage }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Moves to `next`. An illegal transition is logged and ignored.
    pub fn advance(&mut self, next: PipelineStage) {
        if self.stage.is_terminal() {
            warn!(
                "{} pipeline already finished at {:?}; ignoring {:?}",
                self.platform, self.stage, next
            );
        } else if self.stage.can_transition_to(next) {
            debug!("{} pipeline: {:?} -> {:?}", self.platform, self.stage, next);
            self.stage = next;
        } else {
            warn!(
                "{} pipeline: ignoring illegal transition {:?} -> {:?}",
                self.platform, self.stage, next
            );
        }
    }
}

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::aggregation::stage::{PipelineStage, StageTracker};
use crate::llm_client::{strip_json_fences, LlmError, TextGenerator};
use crate::models::canonical::CanonicalRecord;
use crate::models::score::ScoreBreakdown;
use crate::narrative::career::{fallback_career_report, CareerReport};
use crate::narrative::fallback::fallback_report;
use crate::narrative::prompts;
use crate::narrative::report::NarrativeReport;

/// Why a generated report was discarded. Never leaves this module.
#[derive(Debug, Error)]
enum NarrationFailure {
    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response JSON is not an object")]
    NotAnObject,
}

/// Turns scored records into narrative reports and answers coaching questions.
#[derive(Clone)]
pub struct Narrator {
    pub(crate) generator: Arc<dyn TextGenerator>,
}

impl Narrator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Builds the report for one scored platform. Never fails: any generation or
    /// parse problem yields the deterministic fallback report instead.
    pub async fn narrate(
        &self,
        record: &CanonicalRecord,
        breakdown: &ScoreBreakdown,
    ) -> NarrativeReport {
        let platform = breakdown.platform;
        let mut tracker = StageTracker::resume_at(platform, PipelineStage::Scored);
        tracker.advance(PipelineStage::Narrating);

        let fallback = fallback_report(breakdown);
        match self.generate_report(record, breakdown, &fallback).await {
            Ok(report) => {
                tracker.advance(PipelineStage::Narrated);
                info!("Narrated {platform} report (score {:.1})", report.overall_score);
                report
            }
            Err(e) => {
                tracker.advance(PipelineStage::NarrationFallback);
                warn!("{platform} narration fell back to the computed report: {e}");
                fallback
            }
        }
    }

    /// Cross-platform career report for `target_role`. Never fails; falls
    /// back to the report computed from `breakdowns`.
    pub async fn advise(
        &self,
        breakdowns: &[ScoreBreakdown],
        composite_score: f64,
        target_role: &str,
    ) -> CareerReport {
        let fallback = fallback_career_report(breakdowns, composite_score, target_role);
        match self
            .generate_career_report(breakdowns, composite_score, target_role, &fallback)
            .await
        {
            Ok(report) => {
                info!(
                    "Generated career report for {target_role} from {} platforms",
                    breakdowns.len()
                );
                report
            }
            Err(e) => {
                warn!("Career report fell back to the computed report: {e}");
                fallback
            }
        }
    }

    async fn generate_career_report(
        &self,
        breakdowns: &[ScoreBreakdown],
        composite_score: f64,
        target_role: &str,
        fallback: &CareerReport,
    ) -> Result<CareerReport, NarrationFailure> {
        let prompt = prompts::career_prompt(target_role, composite_score, breakdowns);
        let text = self
            .generator
            .generate(&prompt, &prompts::career_system())
            .await?;

        let parsed: Value = serde_json::from_str(strip_json_fences(&text))?;
        let obj = parsed.as_object().ok_or(NarrationFailure::NotAnObject)?;
        Ok(CareerReport::from_untrusted(obj, fallback))
    }

    async fn generate_report(
        &self,
        record: &CanonicalRecord,
        breakdown: &ScoreBreakdown,
        fallback: &NarrativeReport,
    ) -> Result<NarrativeReport, NarrationFailure> {
        let prompt = prompts::analysis_prompt(record, breakdown);
        let text = self
            .generator
            .generate(&prompt, &prompts::analysis_system())
            .await?;

        let parsed: Value = serde_json::from_str(strip_json_fences(&text))?;
        let obj = parsed.as_object().ok_or(NarrationFailure::NotAnObject)?;
        Ok(NarrativeReport::from_untrusted(obj, fallback))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::canonical::LeetcodeRecord;
    use crate::models::platform::Platform;
    use crate::narrative::report::ReportSource;
    use crate::scoring;

    /// Replays a fixed reply and records every prompt it receives.
    pub(crate) struct FakeGenerator {
        reply: Result<String, u16>,
        pub(crate) prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        pub(crate) fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        /// Fails every call with an API error of `status`.
        pub(crate) fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "upstream unavailable".into(),
                }),
            }
        }
    }

    fn leetcode() -> (CanonicalRecord, ScoreBreakdown) {
        let record = CanonicalRecord::Leetcode(LeetcodeRecord {
            total_solved: 119,
            easy_solved: 80,
            medium_solved: 37,
            hard_solved: 2,
            ranking: 1_240_776,
            ..Default::default()
        });
        let breakdown = scoring::score(&record);
        (record, breakdown)
    }

    fn assert_complete(report: &NarrativeReport) {
        assert_eq!(report.platform, Platform::Leetcode);
        assert!((0.0..=100.0).contains(&report.percentile_rank));
        assert!(!report.global_ranking.is_empty());
        assert!(!report.recommendations.is_empty());
        assert!(report.weekly_plan.days().iter().all(|d| !d.is_empty()));
        assert!(!report.key_metrics.is_empty());
    }

    #[tokio::test]
    async fn test_fenced_json_reply_is_used() {
        let generator = FakeGenerator::replying(
            "Here you go:\n```json\n{\"percentileRank\": 61, \"globalRanking\": \"Above average\", \
             \"recommendations\": [\"Do two mediums daily\"]}\n```",
        );
        let narrator = Narrator::new(generator.clone());
        let (record, breakdown) = leetcode();

        let report = narrator.narrate(&record, &breakdown).await;
        assert_eq!(report.source, ReportSource::Generated);
        assert_eq!(report.percentile_rank, 61.0);
        assert_eq!(report.recommendations, vec!["Do two mediums daily"]);
        assert_complete(&report);

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("- Easy Solved: 80"));
    }

    #[tokio::test]
    async fn test_non_json_reply_falls_back() {
        let narrator = Narrator::new(FakeGenerator::replying("Sorry, I can't help with that."));
        let (record, breakdown) = leetcode();

        let report = narrator.narrate(&record, &breakdown).await;
        assert_eq!(report.source, ReportSource::Fallback);
        assert_eq!(report.overall_score, breakdown.platform_score);
        assert_complete(&report);
    }

    #[tokio::test]
    async fn test_json_array_reply_falls_back() {
        let narrator = Narrator::new(FakeGenerator::replying("[1, 2, 3]"));
        let (record, breakdown) = leetcode();
        let report = narrator.narrate(&record, &breakdown).await;
        assert_eq!(report.source, ReportSource::Fallback);
    }

    #[tokio::test]
    async fn test_generation_error_falls_back() {
        let narrator = Narrator::new(FakeGenerator::failing(529));
        let (record, breakdown) = leetcode();

        let report = narrator.narrate(&record, &breakdown).await;
        assert_eq!(report.source, ReportSource::Fallback);
        assert_complete(&report);
    }

    #[tokio::test]
    async fn test_career_report_uses_generated_fields() {
        let generator = FakeGenerator::replying(
            r#"{"jobMatch": {"fitPercent": 48, "gaps": ["Distributed systems"]},
                "recommendations": [{"title": "Ship a backend service", "priority": "High",
                                     "category": "Project"}]}"#,
        );
        let narrator = Narrator::new(generator.clone());
        let (_, breakdown) = leetcode();

        let report = narrator
            .advise(&[breakdown.clone()], breakdown.platform_score, "Backend Engineer")
            .await;
        assert_eq!(report.source, ReportSource::Generated);
        assert_eq!(report.composite_score, breakdown.platform_score);
        assert_eq!(report.job_match.fit_percent, 48.0);
        assert_eq!(report.recommendations[0].title, "Ship a backend service");
        assert_eq!(report.roadmap.len(), 3);

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("role: Backend Engineer"));
        assert!(prompts[0].contains("- LeetCode: "));
    }

    #[tokio::test]
    async fn test_career_report_falls_back_on_generation_error() {
        let narrator = Narrator::new(FakeGenerator::failing(503));
        let (_, breakdown) = leetcode();

        let report = narrator.advise(&[breakdown], 20.0, "Data Engineer").await;
        assert_eq!(report.source, ReportSource::Fallback);
        assert_eq!(report.job_match.role, "Data Engineer");
        assert_eq!(report.job_match.fit_percent, 20.0);
        assert_eq!(report.job_match.gaps, vec!["LeetCode"]);
    }
}

//! `NarrativeReport` and coercion of untrusted model output into it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::platform::Platform;
use crate::scoring::common::clamp_score;

pub const MAX_LIST_ITEMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Good,
    Average,
    NeedsImprovement,
}

impl MetricStatus {
    pub fn from_score(value: f64) -> Self {
        if value >= 70.0 {
            MetricStatus::Good
        } else if value >= 40.0 {
            MetricStatus::Average
        } else {
            MetricStatus::NeedsImprovement
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" => Some(MetricStatus::Good),
            "average" => Some(MetricStatus::Average),
            "needs_improvement" => Some(MetricStatus::NeedsImprovement),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAssessment {
    pub topic: String,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetric {
    pub name: String,
    pub value: String,
    pub benchmark: String,
    pub status: MetricStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub day1: String,
    pub day2: String,
    pub day3: String,
    pub day4: String,
    pub day5: String,
    pub day6: String,
    pub day7: String,
}

impl WeeklyPlan {
    pub fn from_days(days: [String; 7]) -> Self {
        let [day1, day2, day3, day4, day5, day6, day7] = days;
        Self {
            day1,
            day2,
            day3,
            day4,
            day5,
            day6,
            day7,
        }
    }

    pub fn days(&self) -> [&str; 7] {
        [
            self.day1.as_str(),
            self.day2.as_str(),
            self.day3.as_str(),
            self.day4.as_str(),
            self.day5.as_str(),
            self.day6.as_str(),
            self.day7.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeReport {
    pub platform: Platform,
    pub percentile_rank: f64,
    pub global_ranking: String,
    pub overall_score: f64,
    pub strengths: Vec<TopicAssessment>,
    pub weaknesses: Vec<TopicAssessment>,
    pub recommendations: Vec<String>,
    pub weekly_plan: WeeklyPlan,
    pub key_metrics: Vec<KeyMetric>,
    pub analyzed_at: DateTime<Utc>,
    pub source: ReportSource,
}

impl NarrativeReport {
    /// Builds a report from a parsed model object, validating every field.
    ///
    /// Anything missing, mistyped or empty is taken from `fallback`, so the
    /// result is always structurally complete. `platform` and `overall_score`
    /// always come from `fallback`, never from the model.
    pub fn from_untrusted(obj: &Map<String, Value>, fallback: &NarrativeReport) -> Self {
        let plan = obj.get("weeklyPlan").and_then(Value::as_object);
        let fallback_days = fallback.weekly_plan.days();
        let days: [String; 7] = std::array::from_fn(|i| {
            let key = format!("day{}", i + 1);
            text(plan.and_then(|p| p.get(&key))).unwrap_or_else(|| fallback_days[i].to_string())
        });

        Self {
            platform: fallback.platform,
            percentile_rank: score(obj.get("percentileRank")).unwrap_or(fallback.percentile_rank),
            global_ranking: text(obj.get("globalRanking"))
                .unwrap_or_else(|| fallback.global_ranking.clone()),
            overall_score: fallback.overall_score,
            strengths: list(obj.get("strengths"), topic, &fallback.strengths),
            weaknesses: list(obj.get("weaknesses"), topic, &fallback.weaknesses),
            recommendations: list(obj.get("recommendations"), |v| text(Some(v)), &fallback.recommendations),
            weekly_plan: WeeklyPlan::from_days(days),
            key_metrics: list(obj.get("keyMetrics"), key_metric, &fallback.key_metrics),
            analyzed_at: Utc::now(),
            source: ReportSource::Generated,
        }
    }
}

/// A number or numeric string, clamped to [0,100].
pub(crate) fn score(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then(|| clamp_score(n))
}

pub(crate) fn text(value: Option<&Value>) -> Option<String> {
    value?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Valid items only, at most `MAX_LIST_ITEMS`; the fallback list when none survive.
pub(crate) fn list<T: Clone>(value: Option<&Value>, item: impl Fn(&Value) -> Option<T>, fallback: &[T]) -> Vec<T> {
    let items: Vec<T> = value
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(&item).take(MAX_LIST_ITEMS).collect())
        .unwrap_or_default();
    if items.is_empty() {
        fallback.iter().take(MAX_LIST_ITEMS).cloned().collect()
    } else {
        items
    }
}

fn topic(value: &Value) -> Option<TopicAssessment> {
    let obj = value.as_object()?;
    Some(TopicAssessment {
        topic: text(obj.get("topic"))?,
        score: score(obj.get("score")).unwrap_or(0.0),
        description: text(obj.get("description")).unwrap_or_default(),
    })
}

fn key_metric(value: &Value) -> Option<KeyMetric> {
    let obj = value.as_object()?;
    let raw_value = match obj.get("value") {
        Some(Value::Number(n)) => n.to_string(),
        other => text(other).unwrap_or_else(|| "N/A".to_string()),
    };
    let status = obj
        .get("status")
        .and_then(Value::as_str)
        .and_then(MetricStatus::parse)
        .unwrap_or_else(|| derived_status(&raw_value));

    Some(KeyMetric {
        name: text(obj.get("name"))?,
        value: raw_value,
        benchmark: text(obj.get("benchmark")).unwrap_or_else(|| "N/A".to_string()),
        status,
    })
}

/// Status from a value such as `72`, `"72/100"` or `"72%"`. Non-numeric values are average.
fn derived_status(value: &str) -> MetricStatus {
    let leading = value
        .split(['/', '%'])
        .next()
        .unwrap_or_default()
        .trim()
        .parse::<f64>();
    match leading {
        Ok(n) if n.is_finite() => MetricStatus::from_score(clamp_score(n)),
        _ => MetricStatus::Average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fallback() -> NarrativeReport {
        NarrativeReport {
            platform: Platform::Leetcode,
            percentile_rank: 35.0,
            global_ranking: "Developing".into(),
            overall_score: 26.75,
            strengths: vec![],
            weaknesses: vec![TopicAssessment {
                topic: "Ranking".into(),
                score: 10.0,
                description: "Low".into(),
            }],
            recommendations: vec!["Practice daily".into()],
            weekly_plan: WeeklyPlan::from_days(std::array::from_fn(|i| format!("fallback {}", i + 1))),
            key_metrics: vec![],
            analyzed_at: Utc::now(),
            source: ReportSource::Fallback,
        }
    }

    fn coerce(value: Value) -> NarrativeReport {
        NarrativeReport::from_untrusted(value.as_object().unwrap(), &fallback())
    }

    #[test]
    fn test_well_formed_object_is_used() {
        let report = coerce(json!({
            "percentileRank": 62,
            "globalRanking": "Above average",
            "overallScore": 58.5,
            "strengths": [{"topic": "Consistency", "score": 71, "description": "Steady"}],
            "weaknesses": [{"topic": "Hard problems", "score": 20, "description": "Few"}],
            "recommendations": ["Solve two mediums a day"],
            "weeklyPlan": {"day1": "Arrays", "day2": "Graphs", "day3": "DP", "day4": "Trees",
                           "day5": "Heaps", "day6": "Contest", "day7": "Review"},
            "keyMetrics": [{"name": "Solved", "value": 119, "benchmark": "300", "status": "average"}]
        }));

        assert_eq!(report.source, ReportSource::Generated);
        assert_eq!(report.platform, Platform::Leetcode);
        assert_eq!(report.percentile_rank, 62.0);
        assert_eq!(report.strengths[0].topic, "Consistency");
        assert_eq!(report.weekly_plan.day6, "Contest");
        assert_eq!(report.key_metrics[0].value, "119");
        assert_eq!(report.key_metrics[0].status, MetricStatus::Average);
    }

    #[test]
    fn test_numbers_as_strings_are_parsed_and_clamped() {
        let report = coerce(json!({"percentileRank": "250", "globalRanking": "Top 40%"}));
        assert_eq!(report.percentile_rank, 100.0);
        let report = coerce(json!({"percentileRank": "48.5%"}));
        assert_eq!(report.percentile_rank, 48.5);
    }

    #[test]
    fn test_overall_score_always_comes_from_computed_breakdown() {
        let report = coerce(json!({"overallScore": 99, "percentileRank": 90}));
        assert_eq!(report.overall_score, 26.75);
        assert_eq!(report.percentile_rank, 90.0);
    }

    #[test]
    fn test_wrong_types_fall_back_per_field() {
        let report = coerce(json!({
            "percentileRank": [1, 2],
            "globalRanking": "",
            "weaknesses": "not a list",
            "recommendations": [42, "", "  Keep going  "],
            "weeklyPlan": {"day1": "Custom", "day2": 7}
        }));

        assert_eq!(report.percentile_rank, 35.0);
        assert_eq!(report.global_ranking, "Developing");
        assert_eq!(report.weaknesses[0].topic, "Ranking");
        assert_eq!(report.recommendations, vec!["Keep going"]);
        assert_eq!(report.weekly_plan.day1, "Custom");
        assert_eq!(report.weekly_plan.day2, "fallback 2");
        assert_eq!(report.weekly_plan.day7, "fallback 7");
    }

    #[test]
    fn test_lists_are_capped_and_invalid_items_dropped() {
        let report = coerce(json!({
            "strengths": [
                {"topic": "A"}, {"score": 90}, {"topic": "B"}, {"topic": "C"},
                {"topic": "D"}, {"topic": "E"}, {"topic": "F"}
            ]
        }));
        let topics: Vec<&str> = report.strengths.iter().map(|s| s.topic.as_str()).collect();
        assert_eq!(topics, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_unknown_status_is_derived_from_value() {
        let report = coerce(json!({"keyMetrics": [
            {"name": "Score", "value": "82/100", "status": "excellent"},
            {"name": "Rank", "value": "12%", "status": 3},
            {"name": "Langs", "value": "Rust, Go"}
        ]}));
        assert_eq!(report.key_metrics[0].status, MetricStatus::Good);
        assert_eq!(report.key_metrics[1].status, MetricStatus::NeedsImprovement);
        assert_eq!(report.key_metrics[2].status, MetricStatus::Average);
        assert_eq!(report.key_metrics[2].benchmark, "N/A");
    }
}

use serde::{Deserialize, Serialize};

use crate::models::platform::Platform;

/// One named, weighted input to a platform score. `value` is already clamped to [0,100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubMetric {
    pub name: String,
    pub value: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub platform: Platform,
    /// Fixed convex combination of `sub_metrics`, in [0,100].
    pub platform_score: f64,
    pub sub_metrics: Vec<SubMetric>,
    pub highlights: Vec<String>,
}

impl ScoreBreakdown {
    pub fn sub_metric(&self, name: &str) -> Option<&SubMetric> {
        self.sub_metrics.iter().find(|m| m.name == name)
    }

    /// Sub-metrics sorted ascending by value; ties keep declaration order.
    pub fn weakest_first(&self) -> Vec<&SubMetric> {
        let mut sorted: Vec<&SubMetric> = self.sub_metrics.iter().collect();
        sorted.sort_by(|a, b| a.value.total_cmp(&b.value));
        sorted
    }
}

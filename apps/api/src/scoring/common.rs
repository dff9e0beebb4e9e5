use crate::models::platform::Platform;
use crate::models::score::{ScoreBreakdown, SubMetric};

/// Clamps to [0,100]. NaN becomes 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// `num / den`, or 0 when the denominator is zero.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den <= 0.0 {
        0.0
    } else {
        num / den
    }
}

/// `value` as a percentage of `target`, capped at 100.
pub fn percent_of(value: u64, target: f64) -> f64 {
    clamp_score(ratio(value as f64, target) * 100.0)
}

/// `factor·√count`, capped. Square-root dampening keeps one outlier count from saturating.
pub fn dampened(count: u64, factor: f64, cap: f64) -> f64 {
    (factor * (count as f64).sqrt()).min(cap)
}

/// `factor·count`, capped at 100.
pub fn linear(count: u64, factor: f64) -> f64 {
    clamp_score(count as f64 * factor)
}

/// First bucket whose bound is `>= value` wins, so a tie lands in the better bucket.
/// `value == 0` means unranked and scores 0.
pub fn rank_bucket(value: u64, buckets: &[(u64, f64)], otherwise: f64) -> f64 {
    if value == 0 {
        return 0.0;
    }
    buckets
        .iter()
        .find(|(bound, _)| value <= *bound)
        .map(|(_, score)| *score)
        .unwrap_or(otherwise)
}

/// Like `rank_bucket` but for "higher is better" values: first bucket whose bound is `<= value`.
pub fn threshold_bucket(value: u64, buckets: &[(u64, f64)]) -> f64 {
    buckets
        .iter()
        .find(|(bound, _)| value >= *bound)
        .map(|(_, score)| *score)
        .unwrap_or(0.0)
}

/// Builds a breakdown from `(name, weight, raw value)` triples.
///
/// Each raw value is clamped before weighting and the composite is clamped again.
/// Weights must sum to 1.
pub fn compose(
    platform: Platform,
    metrics: &[(&str, f64, f64)],
    highlights: Vec<String>,
) -> ScoreBreakdown {
    debug_assert!(
        (metrics.iter().map(|(_, w, _)| w).sum::<f64>() - 1.0).abs() < 1e-9,
        "{platform} weights must sum to 1"
    );

    let sub_metrics: Vec<SubMetric> = metrics
        .iter()
        .map(|(name, weight, raw)| SubMetric {
            name: (*name).to_string(),
            value: round2(clamp_score(*raw)),
            weight: *weight,
        })
        .collect();

    let composite = metrics
        .iter()
        .map(|(_, weight, raw)| weight * clamp_score(*raw))
        .sum::<f64>();

    ScoreBreakdown {
        platform,
        platform_score: round2(clamp_score(composite)),
        sub_metrics,
        highlights,
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_handles_nan_and_overflow() {
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(250.0), 100.0);
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(f64::INFINITY), 100.0);
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_rank_bucket_tie_goes_to_better_bucket() {
        let buckets = [(1_000, 100.0), (5_000, 90.0)];
        assert_eq!(rank_bucket(1_000, &buckets, 10.0), 100.0);
        assert_eq!(rank_bucket(1_001, &buckets, 10.0), 90.0);
        assert_eq!(rank_bucket(9_999_999, &buckets, 10.0), 10.0);
        assert_eq!(rank_bucket(0, &buckets, 10.0), 0.0);
    }

    #[test]
    fn test_compose_clamps_each_sub_metric_before_weighting() {
        let breakdown = compose(
            Platform::Devto,
            &[("A", 0.5, 400.0), ("B", 0.5, f64::NAN)],
            vec![],
        );
        assert_eq!(breakdown.sub_metrics[0].value, 100.0);
        assert_eq!(breakdown.sub_metrics[1].value, 0.0);
        assert_eq!(breakdown.platform_score, 50.0);
    }
}

use crate::models::canonical::LeetcodeRecord;
use crate::models::platform::Platform;
use crate::models::score::ScoreBreakdown;
use crate::scoring::common::{clamp_score, compose, percent_of, rank_bucket, ratio};
use crate::scoring::highlights::{collect, thousands, HighlightRule};

/// Weighted problems (easy×1 + medium×3 + hard×5) that earn a full score.
const WEIGHTED_TARGET: f64 = 500.0;
const SOLVED_TARGET: f64 = 500.0;

const RANKING_BUCKETS: &[(u64, f64)] = &[
    (1_000, 100.0),
    (5_000, 90.0),
    (10_000, 80.0),
    (50_000, 60.0),
    (100_000, 40.0),
    (500_000, 20.0),
];
const RANKING_FLOOR: f64 = 10.0;

pub fn score(r: &LeetcodeRecord) -> ScoreBreakdown {
    compose(
        Platform::Leetcode,
        &[
            ("Problems Solved", 0.35, problems_score(r)),
            ("Ranking", 0.30, ranking_score(r.ranking)),
            ("Consistency", 0.20, percent_of(r.total_solved, SOLVED_TARGET)),
            ("Efficiency", 0.15, efficiency_score(r)),
        ],
        collect(Platform::Leetcode, r, HIGHLIGHTS),
    )
}

fn problems_score(r: &LeetcodeRecord) -> f64 {
    let weighted =
        r.easy_solved as f64 + 3.0 * r.medium_solved as f64 + 5.0 * r.hard_solved as f64;
    clamp_score(weighted / WEIGHTED_TARGET * 100.0)
}

pub fn ranking_score(ranking: u64) -> f64 {
    rank_bucket(ranking, RANKING_BUCKETS, RANKING_FLOOR)
}

/// Share of medium+hard solves, with a bonus for sheer hard volume.
fn efficiency_score(r: &LeetcodeRecord) -> f64 {
    let harder = r.medium_solved as f64 + r.hard_solved as f64;
    let share = ratio(harder, r.total_solved as f64) * 100.0;
    let bonus = if r.hard_solved > 100 {
        20.0
    } else if r.hard_solved > 50 {
        10.0
    } else {
        0.0
    };
    clamp_score(share + bonus)
}

fn hard_share(r: &LeetcodeRecord) -> f64 {
    ratio(r.hard_solved as f64, r.total_solved as f64)
}

const HIGHLIGHTS: &[HighlightRule<LeetcodeRecord>] = &[
    HighlightRule {
        when: |r| r.total_solved > 1000,
        text: |r| format!("Solved {}+ problems", r.total_solved),
    },
    HighlightRule {
        when: |r| r.total_solved > 100 && r.total_solved <= 1000,
        text: |r| format!("{} problems solved", r.total_solved),
    },
    HighlightRule {
        when: |r| r.hard_solved > 100,
        text: |r| format!("Completed {}+ hard problems", r.hard_solved),
    },
    HighlightRule {
        when: |r| r.hard_solved > 50 && r.hard_solved <= 100,
        text: |r| format!("{} hard problems solved", r.hard_solved),
    },
    HighlightRule {
        when: |r| r.medium_solved > 300,
        text: |r| format!("Strong medium problem solver ({})", r.medium_solved),
    },
    HighlightRule {
        when: |r| r.medium_solved > 100 && r.medium_solved <= 300,
        text: |r| format!("{} medium problems solved", r.medium_solved),
    },
    HighlightRule {
        when: |r| r.ranking > 0 && r.ranking <= 10_000,
        text: |r| format!("Top {} global ranking", thousands(r.ranking)),
    },
    HighlightRule {
        when: |r| r.ranking > 10_000 && r.ranking <= 100_000,
        text: |r| format!("Ranked #{} globally", thousands(r.ranking)),
    },
    HighlightRule {
        when: |r| r.contests_attended > 0 && r.contest_rating >= 1800.0,
        text: |r| format!("Contest rating {:.0}", r.contest_rating),
    },
    HighlightRule {
        when: |r| hard_share(r) > 0.3,
        text: |_| "Strong focus on challenging problems".to_string(),
    },
    HighlightRule {
        when: |r| hard_share(r) > 0.15 && hard_share(r) <= 0.3,
        text: |_| "Balanced problem difficulty approach".to_string(),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LeetcodeRecord {
        LeetcodeRecord {
            easy_solved: 80,
            medium_solved: 37,
            hard_solved: 2,
            total_solved: 119,
            ranking: 1_240_776,
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_profile_sub_scores() {
        let breakdown = score(&sample());

        assert_eq!(breakdown.sub_metric("Problems Solved").unwrap().value, 40.2);
        assert_eq!(breakdown.sub_metric("Ranking").unwrap().value, 10.0);
        assert_eq!(breakdown.sub_metric("Consistency").unwrap().value, 23.8);
        assert_eq!(breakdown.sub_metric("Efficiency").unwrap().value, 32.77);
        // 0.35·40.2 + 0.30·10 + 0.20·23.8 + 0.15·32.773
        assert_eq!(breakdown.platform_score, 26.75);
    }

    #[test]
    fn test_ranking_buckets() {
        assert_eq!(ranking_score(0), 0.0);
        assert_eq!(ranking_score(1_000), 100.0);
        assert_eq!(ranking_score(1_001), 90.0);
        assert_eq!(ranking_score(500_000), 20.0);
        assert_eq!(ranking_score(500_001), 10.0);
    }

    #[test]
    fn test_problems_score_caps_at_100() {
        let r = LeetcodeRecord {
            hard_solved: 400,
            total_solved: 400,
            ..Default::default()
        };
        let breakdown = score(&r);
        assert_eq!(breakdown.sub_metric("Problems Solved").unwrap().value, 100.0);
        assert_eq!(breakdown.sub_metric("Efficiency").unwrap().value, 100.0);
    }

    #[test]
    fn test_huge_counts_saturate_at_full_score() {
        let r = LeetcodeRecord {
            medium_solved: u64::MAX / 2,
            hard_solved: u64::MAX,
            total_solved: u64::MAX,
            ..Default::default()
        };
        assert_eq!(problems_score(&r), 100.0);
        assert!((0.0..=100.0).contains(&efficiency_score(&r)));
    }

    #[test]
    fn test_zero_record_scores_zero() {
        let breakdown = score(&LeetcodeRecord::default());
        assert_eq!(breakdown.platform_score, 0.0);
        assert!(breakdown.sub_metrics.iter().all(|m| m.value == 0.0));
        assert_eq!(breakdown.highlights, vec!["Active on LeetCode"]);
    }

    #[test]
    fn test_highlights_for_strong_profile() {
        let r = LeetcodeRecord {
            easy_solved: 400,
            medium_solved: 500,
            hard_solved: 150,
            total_solved: 1050,
            ranking: 8_000,
            ..Default::default()
        };
        let highlights = score(&r).highlights;
        assert_eq!(highlights[0], "Solved 1050+ problems");
        assert_eq!(highlights[1], "Completed 150+ hard problems");
        assert_eq!(highlights[3], "Top 8,000 global ranking");
    }
}

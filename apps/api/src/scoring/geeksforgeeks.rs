use crate::models::canonical::GeeksforgeeksRecord;
use crate::models::platform::Platform;
use crate::models::score::ScoreBreakdown;
use crate::scoring::common::{clamp_score, compose, percent_of, rank_bucket, ratio};
use crate::scoring::highlights::{collect, HighlightRule};

const SOLVED_TARGET: f64 = 300.0;
const CODING_SCORE_TARGET: f64 = 1000.0;
const STREAK_TARGET: f64 = 100.0;
const POTD_TARGET: f64 = 100.0;

/// Bonus for a strong standing inside the user's institute.
const INSTITUTE_BONUS: &[(u64, f64)] = &[(10, 20.0), (100, 10.0)];

pub fn score(r: &GeeksforgeeksRecord) -> ScoreBreakdown {
    compose(
        Platform::Geeksforgeeks,
        &[
            ("Problems", 0.35, percent_of(r.problems_solved, SOLVED_TARGET)),
            ("Coding Score", 0.25, percent_of(r.coding_score, CODING_SCORE_TARGET)),
            ("Consistency", 0.25, consistency(r)),
            ("Contribution", 0.15, contribution(r)),
        ],
        collect(Platform::Geeksforgeeks, r, HIGHLIGHTS),
    )
}

fn consistency(r: &GeeksforgeeksRecord) -> f64 {
    let streak = ratio(r.longest_streak as f64, STREAK_TARGET).min(1.0);
    let potds = ratio(r.potds_solved as f64, POTD_TARGET).min(1.0);
    clamp_score(60.0 * streak + 40.0 * potds)
}

fn contribution(r: &GeeksforgeeksRecord) -> f64 {
    let articles = 20.0 * (r.articles_published as f64).sqrt();
    clamp_score(articles + rank_bucket(r.institute_rank, INSTITUTE_BONUS, 0.0))
}

const HIGHLIGHTS: &[HighlightRule<GeeksforgeeksRecord>] = &[
    HighlightRule {
        when: |r| r.problems_solved > 300,
        text: |r| format!("Solved {}+ problems", r.problems_solved),
    },
    HighlightRule {
        when: |r| r.problems_solved > 50 && r.problems_solved <= 300,
        text: |r| format!("{} problems solved", r.problems_solved),
    },
    HighlightRule {
        when: |r| r.coding_score >= 500,
        text: |r| format!("Coding score of {}", r.coding_score),
    },
    HighlightRule {
        when: |r| r.institute_rank > 0 && r.institute_rank <= 10,
        text: |r| format!("Rank #{} in institute", r.institute_rank),
    },
    HighlightRule {
        when: |r| r.longest_streak >= 30,
        text: |r| format!("{}-day solving streak", r.longest_streak),
    },
    HighlightRule {
        when: |r| r.articles_published > 0,
        text: |r| format!("Published {} articles", r.articles_published),
    },
];

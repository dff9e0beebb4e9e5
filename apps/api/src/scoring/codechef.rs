use crate::models::canonical::CodechefRecord;
use crate::models::platform::Platform;
use crate::models::score::ScoreBreakdown;
use crate::scoring::common::{compose, percent_of, rank_bucket};
use crate::scoring::highlights::{collect, thousands, HighlightRule};

const SOLVED_TARGET: f64 = 300.0;
const CONTESTS_TARGET: f64 = 50.0;

const GLOBAL_RANK_BUCKETS: &[(u64, f64)] = &[
    (100, 100.0),
    (1_000, 85.0),
    (10_000, 65.0),
    (50_000, 45.0),
    (100_000, 30.0),
];
const GLOBAL_RANK_FLOOR: f64 = 15.0;

pub fn score(r: &CodechefRecord) -> ScoreBreakdown {
    compose(
        Platform::Codechef,
        &[
            ("Rating", 0.35, star_score(r.stars)),
            ("Problems", 0.25, percent_of(r.problems_solved, SOLVED_TARGET)),
            ("Contests", 0.20, percent_of(r.contests_participated, CONTESTS_TARGET)),
            (
                "Global Rank",
                0.20,
                rank_bucket(r.global_rank, GLOBAL_RANK_BUCKETS, GLOBAL_RANK_FLOOR),
            ),
        ],
        collect(Platform::Codechef, r, HIGHLIGHTS),
    )
}

pub fn star_score(stars: u64) -> f64 {
    match stars {
        0 => 0.0,
        1 => 20.0,
        2 => 35.0,
        3 => 50.0,
        4 => 65.0,
        5 => 80.0,
        6 => 90.0,
        _ => 100.0,
    }
}

const HIGHLIGHTS: &[HighlightRule<CodechefRecord>] = &[
    HighlightRule {
        when: |r| r.stars > 0,
        text: |r| format!("{}★ coder (rating {})", r.stars, r.current_rating),
    },
    HighlightRule {
        when: |r| r.global_rank > 0 && r.global_rank <= 10_000,
        text: |r| format!("Global rank #{}", thousands(r.global_rank)),
    },
    HighlightRule {
        when: |r| r.country_rank > 0 && r.country_rank <= 1_000,
        text: |r| format!("Country rank #{}", thousands(r.country_rank)),
    },
    HighlightRule {
        when: |r| r.problems_solved > 100,
        text: |r| format!("{} problems fully solved", r.problems_solved),
    },
    HighlightRule {
        when: |r| r.contests_participated > 10,
        text: |r| format!("Competed in {} contests", r.contests_participated),
    },
];

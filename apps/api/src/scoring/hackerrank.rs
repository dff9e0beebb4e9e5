use crate::models::canonical::HackerrankRecord;
use crate::models::platform::Platform;
use crate::models::score::ScoreBreakdown;
use crate::scoring::common::{compose, dampened, linear, percent_of};
use crate::scoring::highlights::{collect, HighlightRule};

const STARS_TARGET: f64 = 50.0;

pub fn score(r: &HackerrankRecord) -> ScoreBreakdown {
    compose(
        Platform::Hackerrank,
        &[
            ("Stars", 0.40, percent_of(r.total_stars, STARS_TARGET)),
            ("Badges", 0.30, linear(r.badges_earned, 10.0)),
            ("Challenges", 0.30, dampened(r.challenges_solved, 7.0, 100.0)),
        ],
        collect(Platform::Hackerrank, r, HIGHLIGHTS),
    )
}

const HIGHLIGHTS: &[HighlightRule<HackerrankRecord>] = &[
    HighlightRule {
        when: |r| r.total_stars >= 20,
        text: |r| format!("Earned {} stars across domains", r.total_stars),
    },
    HighlightRule {
        when: |r| r.badges_earned >= 5,
        text: |r| format!("{} skill badges", r.badges_earned),
    },
    HighlightRule {
        when: |r| !r.top_badges.is_empty(),
        text: |r| format!("Gold-tier in {}", r.top_badges.join(", ")),
    },
    HighlightRule {
        when: |r| r.challenges_solved > 100,
        text: |r| format!("{} challenges solved", r.challenges_solved),
    },
];

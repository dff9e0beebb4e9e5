use crate::models::canonical::DevpostRecord;
use crate::models::platform::Platform;
use crate::models::score::ScoreBreakdown;
use crate::scoring::common::{clamp_score, compose, dampened, linear};
use crate::scoring::highlights::{collect, HighlightRule};

pub fn score(r: &DevpostRecord) -> ScoreBreakdown {
    compose(
        Platform::Devpost,
        &[
            ("Projects", 0.30, linear(r.projects_submitted, 10.0)),
            ("Hackathons", 0.25, linear(r.hackathons_participated, 8.0)),
            ("Prizes", 0.25, dampened(r.prizes_won, 35.0, 100.0)),
            ("Community", 0.20, community(r)),
        ],
        collect(Platform::Devpost, r, HIGHLIGHTS),
    )
}

fn community(r: &DevpostRecord) -> f64 {
    clamp_score(
        dampened(r.followers, 5.0, 100.0) + dampened(r.likes_received, 3.0, 100.0),
    )
}

const HIGHLIGHTS: &[HighlightRule<DevpostRecord>] = &[
    HighlightRule {
        when: |r| r.prizes_won > 1,
        text: |r| format!("Won {} hackathon prizes", r.prizes_won),
    },
    HighlightRule {
        when: |r| r.prizes_won == 1,
        text: |_| "Hackathon prize winner".to_string(),
    },
    HighlightRule {
        when: |r| r.hackathons_participated >= 5,
        text: |r| format!("Competed in {} hackathons", r.hackathons_participated),
    },
    HighlightRule {
        when: |r| r.projects_submitted >= 5,
        text: |r| format!("Built {} projects", r.projects_submitted),
    },
    HighlightRule {
        when: |r| r.likes_received >= 50,
        text: |r| format!("{} likes from the community", r.likes_received),
    },
];

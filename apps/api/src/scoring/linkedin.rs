use crate::models::canonical::LinkedinRecord;
use crate::models::platform::Platform;
use crate::models::score::ScoreBreakdown;
use crate::scoring::common::{compose, linear, threshold_bucket};
use crate::scoring::highlights::{collect, HighlightRule};

const NETWORK_BUCKETS: &[(u64, f64)] = &[
    (500, 100.0),
    (300, 80.0),
    (100, 60.0),
    (50, 40.0),
    (1, 20.0),
];

pub fn score(r: &LinkedinRecord) -> ScoreBreakdown {
    compose(
        Platform::Linkedin,
        &[
            ("Network", 0.30, threshold_bucket(r.connections, NETWORK_BUCKETS)),
            ("Profile Completeness", 0.25, completeness(r)),
            ("Experience", 0.25, linear(r.experience_count, 15.0)),
            ("Skills", 0.20, linear(r.skills_count, 5.0)),
        ],
        collect(Platform::Linkedin, r, HIGHLIGHTS),
    )
}

fn completeness(r: &LinkedinRecord) -> f64 {
    [
        (!r.headline.is_empty(), 30.0),
        (!r.location.is_empty(), 20.0),
        (r.experience_count > 0, 25.0),
        (r.education_count > 0, 25.0),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, points)| points)
    .sum()
}

const HIGHLIGHTS: &[HighlightRule<LinkedinRecord>] = &[
    HighlightRule {
        when: |r| r.connections >= 500,
        text: |_| "500+ connections".to_string(),
    },
    HighlightRule {
        when: |r| r.connections >= 100 && r.connections < 500,
        text: |r| format!("{} connections", r.connections),
    },
    HighlightRule {
        when: |r| !r.headline.is_empty(),
        text: |r| r.headline.clone(),
    },
    HighlightRule {
        when: |r| r.experience_count >= 3,
        text: |r| format!("{} listed roles", r.experience_count),
    },
    HighlightRule {
        when: |r| r.skills_count >= 10,
        text: |r| format!("{} endorsed skills", r.skills_count),
    },
];

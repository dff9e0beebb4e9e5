use std::sync::Arc;
use std::time::Duration;

use crate::extraction::browser::DocumentRenderer;
use crate::extraction::patterns::FieldRule;
use crate::extraction::rendered::RenderedAdapter;
use crate::models::platform::Platform;

pub const PROFILE_URL: &str = "https://www.geeksforgeeks.org/profile/{id}/?tab=activity";

pub const RULES: &[FieldRule] = &[
    FieldRule::count(
        "coding_score",
        &[
            r"(?i)Coding Score[^\d]*([\d,]+)",
            r"(?i)coding[_\s-]?score[^\d]*([\d,]+)",
        ],
    ),
    FieldRule::count(
        "problems_solved",
        &[
            r"(?i)Problems? Solved[^\d]*([\d,]+)",
            r"(?i)problems?[_\s-]?solved[^\d]*([\d,]+)",
        ],
    ),
    FieldRule::count(
        "institute_rank",
        &[
            r"(?i)Institute Rank[^\d]*([\d,]+)",
            r"(?i)institute[_\s-]?rank[^\d]*([\d,]+)",
        ],
    ),
    FieldRule::count(
        "articles_published",
        &[
            r"(?i)Articles? Published[^\d]*([\d,]+)",
            r"(?i)([\d,]+)\s*articles?\b",
        ],
    ),
    FieldRule::count(
        "longest_streak",
        &[
            r"(?i)Longest Streak[^\d]*([\d,]+)",
            r"(?i)streak[^\d]*([\d,]+)\s*days?",
        ],
    ),
    FieldRule::count(
        "potds_solved",
        &[
            r"(?i)POTDs? Solved[^\d]*([\d,]+)",
            r"(?i)([\d,]+)\s*potds?\b",
        ],
    ),
];

pub fn adapter(
    renderer: Arc<dyn DocumentRenderer>,
    ceiling: Duration,
) -> Result<RenderedAdapter, regex::Error> {
    RenderedAdapter::new(Platform::Geeksforgeeks, PROFILE_URL, RULES, renderer, ceiling)
}

use std::sync::Arc;
use std::time::Duration;

use crate::extraction::browser::DocumentRenderer;
use crate::extraction::patterns::FieldRule;
use crate::extraction::raw::RawRecord;
use crate::extraction::rendered::RenderedAdapter;
use crate::models::platform::Platform;

pub const PROFILE_URL: &str = "https://www.codechef.com/users/{id}";

/// Ratings below this are star counts or noise, never a real rating.
const MIN_RATING: u64 = 100;

pub const RULES: &[FieldRule] = &[
    FieldRule::count(
        "current_rating",
        &[
            r#"(?i)rating-number[^>]*>\s*(\d+)"#,
            r#"(?i)<div[^>]*rating[^>]*>\s*(\d+)"#,
            r"(?i)rating.*?(\d{3,4})",
        ],
    )
    .at_least(MIN_RATING),
    FieldRule::count("stars", &[r"(?i)(\d)\s*(?:★|&#9733;|stars?)"]),
    FieldRule::count(
        "problems_solved",
        &[
            r"(?i)Total Problems Solved:\s*([\d,]+)",
            r"(?i)([\d,]+)\s*problems?\s*solved",
            r"(?i)problems?\s*solved[^\d]*([\d,]+)",
        ],
    ),
    FieldRule::count(
        "contests_participated",
        &[
            r"(?i)No\. of Contests Participated:\s*([\d,]+)",
            r"(?i)([\d,]+)\s*contests?",
        ],
    ),
    FieldRule::count("global_rank", &[r"(?i)global\s*rank[^\d]*([\d,]+)"]),
    FieldRule::count("country_rank", &[r"(?i)country\s*rank[^\d]*([\d,]+)"]),
];

/// CodeChef's star band for a rating.
pub fn stars_for_rating(rating: u64) -> u64 {
    match rating {
        r if r >= 2500 => 7,
        r if r >= 2200 => 6,
        r if r >= 1800 => 5,
        r if r >= 1600 => 4,
        r if r >= 1400 => 3,
        r if r >= 1200 => 2,
        r if r > 0 => 1,
        _ => 0,
    }
}

/// Fills `stars` from the rating when the page did not show a star badge.
fn derive_stars(record: &mut RawRecord) {
    if record.contains("stars") {
        return;
    }
    let rating = record
        .get("current_rating")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    record.set("stars", stars_for_rating(rating));
}

pub fn adapter(
    renderer: Arc<dyn DocumentRenderer>,
    ceiling: Duration,
) -> Result<RenderedAdapter, regex::Error> {
    Ok(
        RenderedAdapter::new(Platform::Codechef, PROFILE_URL, RULES, renderer, ceiling)?
            .with_post_process(derive_stars),
    )
}

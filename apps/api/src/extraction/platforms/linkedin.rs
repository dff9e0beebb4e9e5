use std::sync::Arc;
use std::time::Duration;

use crate::extraction::browser::DocumentRenderer;
use crate::extraction::patterns::FieldRule;
use crate::extraction::rendered::RenderedAdapter;
use crate::models::platform::Platform;

/// `{id}` is the slug left by identifier validation.
pub const PROFILE_URL: &str = "https://www.linkedin.com/in/{id}";

pub const RULES: &[FieldRule] = &[
    FieldRule::count(
        "connections",
        &[
            r"(?i)([\d,.]+[KkM]?)\+?\s*connections?",
            r"(?i)connections?[^\d]*([\d,]+)",
        ],
    ),
    FieldRule::text(
        "headline",
        100,
        &[
            r#"(?s)<div[^>]*class="[^"]*text-body-medium[^"]*"[^>]*>(.*?)</div>"#,
            r"(?s)<h2[^>]*>(.*?)</h2>",
        ],
    ),
    FieldRule::text(
        "location",
        50,
        &[
            r#"(?i)<span[^>]*class="[^"]*text-body-small[^"]*"[^>]*>([^<]+)</span>"#,
            r"(?i)location[^>]*>([^<]+)<",
        ],
    ),
    FieldRule::occurrences(
        "experience_count",
        20,
        &[
            r#"(?i)class="[^"]*experience-item"#,
            r"(?i)experience",
        ],
    ),
    FieldRule::occurrences(
        "education_count",
        10,
        &[r#"(?i)class="[^"]*education__list-item"#, r"(?i)education"],
    ),
    FieldRule::count("skills_count", &[r"(?i)([\d,]+)\s*skills?\b"]),
];

pub fn adapter(
    renderer: Arc<dyn DocumentRenderer>,
    ceiling: Duration,
) -> Result<RenderedAdapter, regex::Error> {
    RenderedAdapter::new(Platform::Linkedin, PROFILE_URL, RULES, renderer, ceiling)
}

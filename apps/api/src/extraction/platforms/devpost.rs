use std::sync::Arc;
use std::time::Duration;

use crate::extraction::browser::DocumentRenderer;
use crate::extraction::patterns::FieldRule;
use crate::extraction::rendered::RenderedAdapter;
use crate::models::platform::Platform;

pub const PROFILE_URL: &str = "https://devpost.com/{id}";

pub const RULES: &[FieldRule] = &[
    FieldRule::count(
        "projects_submitted",
        &[
            r"(?i)<span[^>]*>\s*([\d,]+)\s*</span>\s*projects?",
            r"(?i)([\d,]+)\s*projects?\b",
            r"(?i)projects[^\d]*([\d,]+)",
        ],
    ),
    FieldRule::count(
        "hackathons_participated",
        &[
            r"(?i)<span[^>]*>\s*([\d,]+)\s*</span>\s*hackathons?",
            r"(?i)([\d,]+)\s*hackathons?\b",
            r"(?i)hackathons[^\d]*([\d,]+)",
        ],
    ),
    FieldRule::count(
        "prizes_won",
        &[
            r"(?i)<span[^>]*>\s*([\d,]+)\s*</span>\s*(?:prizes?|wins?)",
            r"(?i)([\d,]+)\s*prizes?\b",
            r"(?i)prizes[^\d]*([\d,]+)",
        ],
    ),
    FieldRule::count(
        "followers",
        &[
            r"(?i)<span[^>]*>\s*([\d,.]+[KkM]?)\s*</span>\s*followers?",
            r"(?i)([\d,.]+[KkM]?)\s*followers?\b",
        ],
    ),
    FieldRule::count(
        "likes_received",
        &[
            r"(?i)<span[^>]*>\s*([\d,.]+[KkM]?)\s*</span>\s*likes?",
            r"(?i)([\d,.]+[KkM]?)\s*likes?\b",
        ],
    ),
];

pub fn adapter(
    renderer: Arc<dyn DocumentRenderer>,
    ceiling: Duration,
) -> Result<RenderedAdapter, regex::Error> {
    RenderedAdapter::new(Platform::Devpost, PROFILE_URL, RULES, renderer, ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::rendered::tests::FixtureRenderer;
    use crate::extraction::PlatformAdapter;

    #[tokio::test]
    async fn test_extracts_tab_counters() {
        let html = r#"
            <ul id="portfolio-navigation">
              <li><a href="/builder"><span class="totals">14</span> Projects</a></li>
              <li><a href="/builder/hackathons"><span class="totals">9</span> Hackathons</a></li>
              <li><a href="/builder/achievements"><span class="totals">3</span> Prizes</a></li>
              <li><a href="/builder/followers"><span class="totals">1.2K</span> Followers</a></li>
              <li><a href="/builder/likes"><span class="totals">88</span> Likes</a></li>
            </ul>
        "#;
        let adapter = adapter(FixtureRenderer::new(html), Duration::from_secs(40)).unwrap();
        let record = adapter.fetch("builder").await.unwrap();

        assert_eq!(record.fields["projects_submitted"], 14);
        assert_eq!(record.fields["hackathons_participated"], 9);
        assert_eq!(record.fields["prizes_won"], 3);
        assert_eq!(record.fields["followers"], 1200);
        assert_eq!(record.fields["likes_received"], 88);
    }
}

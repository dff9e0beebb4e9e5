use crate::models::canonical::DevtoRecord;
use crate::models::platform::Platform;
use crate::models::score::ScoreBreakdown;
use crate::scoring::common::{compose, dampened, linear};
use crate::scoring::highlights::{collect, thousands, HighlightRule};

pub fn score(r: &DevtoRecord) -> ScoreBreakdown {
    compose(
        Platform::Devto,
        &[
            ("Writing", 0.30, linear(r.articles_published, 4.0)),
            ("Engagement", 0.30, dampened(r.total_reactions, 4.0, 100.0)),
            ("Discussion", 0.15, dampened(r.total_comments, 6.0, 100.0)),
            ("Audience", 0.25, dampened(r.followers, 4.0, 100.0)),
        ],
        collect(Platform::Devto, r, HIGHLIGHTS),
    )
}

const HIGHLIGHTS: &[HighlightRule<DevtoRecord>] = &[
    HighlightRule {
        when: |r| r.articles_published >= 10,
        text: |r| format!("Published {} articles", r.articles_published),
    },
    HighlightRule {
        when: |r| r.total_reactions >= 100,
        text: |r| format!("{} reactions on posts", thousands(r.total_reactions)),
    },
    HighlightRule {
        when: |r| r.followers >= 100,
        text: |r| format!("{} followers on Dev.to", thousands(r.followers)),
    },
    HighlightRule {
        when: |r| !r.top_tags.is_empty(),
        text: |r| format!("Writes about {}", r.top_tags.join(", ")),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_scores() {
        let r = DevtoRecord {
            articles_published: 5,
            total_reactions: 400,
            total_comments: 25,
            followers: 2_500,
            top_tags: vec!["rust".into(), "webdev".into()],
        };
        let breakdown = score(&r);
        assert_eq!(breakdown.sub_metric("Writing").unwrap().value, 20.0);
        assert_eq!(breakdown.sub_metric("Engagement").unwrap().value, 80.0);
        assert_eq!(breakdown.sub_metric("Discussion").unwrap().value, 30.0);
        assert_eq!(breakdown.sub_metric("Audience").unwrap().value, 100.0);
        assert_eq!(breakdown.highlights[2], "Writes about rust, webdev");
    }
}

use crate::models::canonical::GithubRecord;
use crate::models::platform::Platform;
use crate::models::score::ScoreBreakdown;
use crate::scoring::common::{clamp_score, compose, dampened, ratio};
use crate::scoring::highlights::{collect, HighlightRule};

/// Quality indicators checked per repository: description, docs, issues, non-empty.
const INDICATORS_PER_REPO: f64 = 4.0;
/// A language holding this share of repositories or more counts as dominant.
const DOMINANT_SHARE: f64 = 0.7;

pub fn score(r: &GithubRecord) -> ScoreBreakdown {
    compose(
        Platform::Github,
        &[
            ("Code Quality", 0.30, code_quality(r)),
            ("Activity", 0.25, activity(r)),
            ("Impact", 0.25, impact(r)),
            ("Diversity", 0.20, diversity(r)),
        ],
        collect(Platform::Github, r, HIGHLIGHTS),
    )
}

fn code_quality(r: &GithubRecord) -> f64 {
    let indicators: f64 = [
        r.repos_with_description,
        r.repos_with_docs,
        r.repos_with_issues,
        r.non_empty_repos,
    ]
    .iter()
    .map(|&n| n as f64)
    .sum();
    clamp_score(ratio(indicators, INDICATORS_PER_REPO * r.repos_checked as f64) * 100.0)
}

fn activity(r: &GithubRecord) -> f64 {
    if r.public_repos == 0 {
        return 0.0;
    }
    let recent = (r.recently_active_repos as f64 * 5.0).min(50.0);
    let breadth = (r.public_repos as f64 * 2.0).min(30.0);
    let consistency = ratio(r.recently_active_repos as f64, r.public_repos as f64) * 20.0;
    clamp_score(recent + breadth + consistency)
}

fn impact(r: &GithubRecord) -> f64 {
    clamp_score(
        dampened(r.total_stars, 3.0, 40.0)
            + dampened(r.total_forks, 2.0, 30.0)
            + dampened(r.followers, 2.0, 30.0),
    )
}

/// Language count, plus a balance bonus when no single language dominates.
fn diversity(r: &GithubRecord) -> f64 {
    let languages = r.language_counts.len();
    let mut value = (languages as f64 * 12.0).min(80.0);

    if languages > 1 {
        let total: f64 = r.language_counts.values().map(|&n| n as f64).sum();
        let largest = r.language_counts.values().copied().max().unwrap_or(0);
        if ratio(largest as f64, total) < DOMINANT_SHARE {
            value += 20.0;
        }
    }
    clamp_score(value)
}

const HIGHLIGHTS: &[HighlightRule<GithubRecord>] = &[
    HighlightRule {
        when: |r| r.total_stars > 100,
        text: |r| format!("Earned {}+ stars across projects", r.total_stars),
    },
    HighlightRule {
        when: |r| r.total_stars > 10 && r.total_stars <= 100,
        text: |r| format!("{} stars on repositories", r.total_stars),
    },
    HighlightRule {
        when: |r| r.followers > 100,
        text: |r| format!("{} followers on GitHub", r.followers),
    },
    HighlightRule {
        when: |r| r.followers > 20 && r.followers <= 100,
        text: |r| format!("{} followers", r.followers),
    },
    HighlightRule {
        when: |r| r.public_repos > 50,
        text: |r| format!("Maintains {}+ repositories", r.public_repos),
    },
    HighlightRule {
        when: |r| r.public_repos > 10 && r.public_repos <= 50,
        text: |r| format!("{} public repositories", r.public_repos),
    },
    HighlightRule {
        when: |r| r.language_counts.len() > 5,
        text: |r| format!("Proficient in {}+ programming languages", r.language_counts.len()),
    },
    HighlightRule {
        when: |r| r.language_counts.len() > 5 && !r.top_languages.is_empty(),
        text: |r| format!("Top languages: {}", r.top_languages.join(", ")),
    },
    HighlightRule {
        when: |r| r.account_age_days / 365 > 5,
        text: |r| format!("{}+ years on GitHub", r.account_age_days / 365),
    },
];

use crate::models::canonical::ResumeRecord;
use crate::models::platform::Platform;
use crate::models::score::ScoreBreakdown;
use crate::scoring::common::{clamp_score, compose, ratio};
use crate::scoring::highlights::{collect, HighlightRule};

/// Keyword points (3 per technical, 2 per soft skill, halved) that earn a full score.
const KEYWORD_TARGET: f64 = 40.0;
const SECTION_CAP: f64 = 15.0;
const VERB_CAP: f64 = 10.0;

pub fn score(r: &ResumeRecord) -> ScoreBreakdown {
    compose(
        Platform::Resume,
        &[
            ("Keywords", 0.40, keywords(r)),
            ("Formatting", 0.20, formatting(r)),
            ("Contact", 0.20, contact(r)),
            ("Structure", 0.20, structure(r)),
        ],
        collect(Platform::Resume, r, HIGHLIGHTS),
    )
}

fn keywords(r: &ResumeRecord) -> f64 {
    let technical = r.technical_skills_found as f64;
    let soft = r.soft_skills_found as f64;
    let points = (3.0 * technical + 2.0 * soft) / 2.0;
    clamp_score(ratio(points.min(KEYWORD_TARGET), KEYWORD_TARGET) * 100.0)
}

fn points(signals: &[(bool, f64)]) -> f64 {
    signals
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, points)| points)
        .sum()
}

fn formatting(r: &ResumeRecord) -> f64 {
    points(&[
        (r.has_bullets, 35.0),
        (r.has_dates, 35.0),
        (r.sections_found > 0, 30.0),
    ])
}

fn contact(r: &ResumeRecord) -> f64 {
    points(&[(r.has_email, 40.0), (r.has_phone, 33.0), (r.has_linkedin, 27.0)])
}

fn structure(r: &ResumeRecord) -> f64 {
    let sections = (3.0 * r.sections_found as f64).min(SECTION_CAP) / SECTION_CAP * 60.0;
    let verbs = (2.0 * r.action_verbs_found as f64).min(VERB_CAP) / VERB_CAP * 40.0;
    clamp_score(sections + verbs)
}

const HIGHLIGHTS: &[HighlightRule<ResumeRecord>] = &[
    HighlightRule {
        when: |r| r.technical_skills_found >= 5,
        text: |r| format!("{} in-demand technical skills", r.technical_skills_found),
    },
    HighlightRule {
        when: |r| r.experience_years > 0,
        text: |r| format!("{}+ years of experience", r.experience_years),
    },
    HighlightRule {
        when: |r| r.certifications_found > 0,
        text: |r| format!("{} recognised certifications", r.certifications_found),
    },
    HighlightRule {
        when: |r| r.has_email && r.has_phone && r.has_linkedin,
        text: |_| "Complete contact details".to_string(),
    },
    HighlightRule {
        when: |r| r.action_verbs_found >= 5,
        text: |_| "Achievement-oriented wording".to_string(),
    },
];

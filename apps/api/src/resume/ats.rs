use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::extraction::raw::RawRecord;
use crate::models::platform::Platform;

const TECHNICAL_SKILLS: &[&str] = &[
    "python",
    "javascript",
    "java",
    "c++",
    "react",
    "node.js",
    "angular",
    "vue",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "jenkins",
    "git",
    "sql",
    "mongodb",
    "postgresql",
    "mysql",
    "redis",
    "machine learning",
    "ai",
    "data science",
    "tensorflow",
    "pytorch",
];

const SOFT_SKILLS: &[&str] = &[
    "leadership",
    "communication",
    "teamwork",
    "problem solving",
    "analytical",
    "creative",
    "adaptable",
    "organized",
];

const ACTION_VERBS: &[&str] = &[
    "developed",
    "implemented",
    "designed",
    "created",
    "built",
    "managed",
    "led",
    "improved",
    "optimized",
    "achieved",
    "delivered",
    "collaborated",
];

const CERTIFICATIONS: &[&str] = &[
    "aws certified",
    "azure certified",
    "google cloud",
    "pmp",
    "scrum master",
    "cissp",
    "comptia",
    "oracle certified",
];

const SECTIONS: &[&str] = &["experience", "education", "skills", "summary", "projects"];

/// Mentions above this are treated as noise ("100 years of combined experience").
const MAX_PLAUSIBLE_YEARS: u64 = 60;

/// A vocabulary term matched as a whole word, so "ai" does not match "maintain"
/// and "java" does not match "javascript".
struct Term {
    name: &'static str,
    pattern: Regex,
}

fn vocabulary(words: &[&'static str]) -> Vec<Term> {
    words
        .iter()
        .map(|&word| Term {
            name: word,
            pattern: Regex::new(&format!(
                r"(?:^|[^a-z0-9+#.])({})(?:$|[^a-z0-9+#])",
                regex::escape(word)
            ))
            .expect("static regex must compile"),
        })
        .collect()
}

static TECHNICAL: LazyLock<Vec<Term>> = LazyLock::new(|| vocabulary(TECHNICAL_SKILLS));
static SOFT: LazyLock<Vec<Term>> = LazyLock::new(|| vocabulary(SOFT_SKILLS));
static VERBS: LazyLock<Vec<Term>> = LazyLock::new(|| vocabulary(ACTION_VERBS));
static CERTS: LazyLock<Vec<Term>> = LazyLock::new(|| vocabulary(CERTIFICATIONS));
static HEADERS: LazyLock<Vec<Term>> = LazyLock::new(|| vocabulary(SECTIONS));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[•▪◦*\-]\s+\S").expect("static regex must compile"));
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("static regex must compile"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").expect("static regex must compile")
});
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?\(?\b\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b")
        .expect("static regex must compile")
});
static EXPERIENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\+?\s*years?").expect("static regex must compile"));

fn found<'a>(terms: &'a [Term], text: &str) -> Vec<&'a str> {
    terms
        .iter()
        .filter(|term| term.pattern.is_match(text))
        .map(|term| term.name)
        .collect()
}

fn experience_years(text: &str) -> u64 {
    EXPERIENCE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
        .filter(|years| *years <= MAX_PLAUSIBLE_YEARS)
        .max()
        .unwrap_or(0)
}

/// Builds the résumé raw record from extracted text.
pub fn resume_raw_record(text: &str) -> RawRecord {
    let lowered = text.to_lowercase();
    let technical = found(&TECHNICAL, &lowered);

    let mut raw = RawRecord::new(Platform::Resume);
    raw.set("text_length", text.chars().count() as u64);
    raw.set("technical_skills_found", technical.len() as u64);
    raw.set(
        "technical_skills",
        Value::from(technical.iter().map(|s| s.to_string()).collect::<Vec<_>>()),
    );
    raw.set("soft_skills_found", found(&SOFT, &lowered).len() as u64);
    raw.set("action_verbs_found", found(&VERBS, &lowered).len() as u64);
    raw.set("certifications_found", found(&CERTS, &lowered).len() as u64);
    raw.set("sections_found", found(&HEADERS, &lowered).len() as u64);
    raw.set("experience_years", experience_years(&lowered));
    raw.set("has_bullets", BULLET_RE.is_match(text));
    raw.set("has_dates", YEAR_RE.is_match(&lowered));
    raw.set("has_email", EMAIL_RE.is_match(&lowered));
    raw.set("has_phone", PHONE_RE.is_match(&lowered));
    raw.set("has_linkedin", lowered.contains("linkedin"));
    raw
}

//! Per-platform coaching chat with a deterministic topic gate.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::canonical::CanonicalRecord;
use crate::models::platform::Platform;
use crate::narrative::narrator::Narrator;
use crate::narrative::prompts;
use crate::narrative::report::NarrativeReport;

/// Prefix shared by every redirect; a generated answer containing it is
/// replaced by the exact redirect text.
pub const REDIRECT_MARKER: &str = "I'm specialized in";

/// Stems any platform's coach may discuss.
const CAREER_STEMS: &[&str] = &[
    "improv", "score", "profile", "strength", "weak", "plan", "goal", "progress", "career",
    "job", "interview", "tip", "advice", "next step", "better", "grow", "rank", "learn",
    "recommend", "focus", "stat", "metric", "percentile",
];

fn platform_stems(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Github => &[
            "repo", "commit", "pull request", "pr", "star", "fork", "open source", "contribut",
            "readme", "branch", "issue", "language", "project", "code",
        ],
        Platform::Leetcode => &[
            "problem", "algorithm", "data structure", "contest", "dynamic programming", "dp",
            "graph", "tree", "array", "solv", "rating", "easy", "medium", "hard", "acceptance",
        ],
        Platform::Geeksforgeeks => &[
            "problem", "dsa", "practice", "potd", "streak", "article", "coding score",
            "algorithm", "data structure", "solv", "institute",
        ],
        Platform::Codechef => &[
            "contest", "rating", "star", "division", "problem", "competitive", "solv", "upsolv",
            "starters",
        ],
        Platform::Hackerrank => &[
            "badge", "star", "certif", "challenge", "skill", "domain", "assessment", "prep kit",
        ],
        Platform::Devpost => &[
            "hackathon", "project", "team", "prize", "demo", "submission", "idea", "pitch",
        ],
        Platform::Devto => &[
            "article", "blog", "post", "writ", "tag", "reaction", "comment", "reader",
            "follower", "content", "audience",
        ],
        Platform::Linkedin => &[
            "network", "connection", "headline", "recruiter", "endorse", "post", "experience",
            "skill", "summary", "education",
        ],
        Platform::Resume => &[
            "ats", "keyword", "format", "section", "bullet", "skill", "experience", "contact",
            "action verb", "certif",
        ],
    }
}

const ALL_PLATFORMS: [Platform; 9] = [
    Platform::Github,
    Platform::Leetcode,
    Platform::Geeksforgeeks,
    Platform::Codechef,
    Platform::Hackerrank,
    Platform::Devpost,
    Platform::Devto,
    Platform::Linkedin,
    Platform::Resume,
];

pub fn redirect_message(platform: Platform) -> String {
    format!(
        "{REDIRECT_MARKER} {} only. For that topic, please use the relevant platform's AI assistant.",
        platform.as_str().to_uppercase()
    )
}

/// True when `text` contains `phrase` starting at a word boundary, and also
/// ending at one when `whole_word` is set.
fn mentions(text: &str, phrase: &str, whole_word: bool) -> bool {
    let is_word = |c: char| c.is_alphanumeric();
    text.match_indices(phrase).any(|(start, _)| {
        let before_ok = !text[..start].chars().next_back().is_some_and(is_word);
        let after_ok =
            !whole_word || !text[start + phrase.len()..].chars().next().is_some_and(is_word);
        before_ok && after_ok
    })
}

fn names_platform(text: &str, platform: Platform) -> bool {
    platform.aliases().iter().any(|alias| mentions(text, alias, true))
}

/// Deterministic gate run before the model is called.
///
/// Off-topic when the question names another platform but not this one, or
/// when it uses none of this platform's vocabulary or the shared career terms.
pub fn is_on_topic(platform: Platform, question: &str) -> bool {
    let text = question.to_lowercase();
    if names_platform(&text, platform) {
        return true;
    }
    let names_other = ALL_PLATFORMS
        .iter()
        .filter(|p| **p != platform)
        .any(|p| names_platform(&text, *p));
    if names_other {
        return false;
    }
    platform_stems(platform)
        .iter()
        .chain(CAREER_STEMS)
        .any(|stem| mentions(&text, stem, false))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatAnswer {
    pub answer: String,
    pub redirected: bool,
}

impl ChatAnswer {
    fn redirect(platform: Platform) -> Self {
        Self {
            answer: redirect_message(platform),
            redirected: true,
        }
    }
}

impl Narrator {
    /// Answers a coaching question scoped to the record's platform.
    pub async fn chat(
        &self,
        record: &CanonicalRecord,
        report: &NarrativeReport,
        question: &str,
        history: &[ChatMessage],
    ) -> ChatAnswer {
        let platform = record.platform();
        if !is_on_topic(platform, question) {
            info!("{platform} chat: redirected off-topic question");
            return ChatAnswer::redirect(platform);
        }

        let prompt = prompts::chat_prompt(record, report, question, history);
        match self
            .generator
            .generate(&prompt, &prompts::chat_system(platform))
            .await
        {
            Ok(answer) if answer.contains(REDIRECT_MARKER) => ChatAnswer::redirect(platform),
            Ok(answer) => ChatAnswer {
                answer: answer.trim().to_string(),
                redirected: false,
            },
            Err(e) => {
                warn!("{platform} chat generation failed, answering from the report: {e}");
                ChatAnswer {
                    answer: grounded_answer(platform, report),
                    redirected: false,
                }
            }
        }
    }
}

/// Answer built from the report alone when the model is unavailable.
fn grounded_answer(platform: Platform, report: &NarrativeReport) -> String {
    let mut answer = format!(
        "Your {} score is {:.1}/100 ({}).",
        platform.display_name(),
        report.overall_score,
        report.global_ranking
    );
    if let Some(best) = report.strengths.first() {
        answer.push_str(&format!(" Your strongest area is {} ({:.0}/100).", best.topic, best.score));
    }
    if let Some(worst) = report.weaknesses.first() {
        answer.push_str(&format!(
            " The biggest opportunity is {} ({:.0}/100).",
            worst.topic, worst.score
        ));
    }
    if let Some(step) = report.recommendations.first() {
        answer.push_str(&format!(" Next step: {step}."));
    }
    answer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::canonical::GithubRecord;
    use crate::narrative::fallback::fallback_report;
    use crate::narrative::narrator::tests::FakeGenerator;
    use crate::scoring;

    fn github() -> (CanonicalRecord, NarrativeReport) {
        let record = CanonicalRecord::Github(GithubRecord {
            public_repos: 5,
            followers: 3,
            total_stars: 2,
            ..Default::default()
        });
        let report = fallback_report(&scoring::score(&record));
        (record, report)
    }

    #[test]
    fn test_redirect_text_is_exact() {
        assert_eq!(
            redirect_message(Platform::Leetcode),
            "I'm specialized in LEETCODE only. For that topic, please use the relevant platform's AI assistant."
        );
    }

    #[test]
    fn test_topic_gate() {
        assert!(is_on_topic(Platform::Github, "How can I get more stars on my repos?"));
        assert!(is_on_topic(Platform::Github, "What should I improve next?"));
        assert!(is_on_topic(Platform::Github, "Should I link my GitHub from my LinkedIn?"));
        assert!(!is_on_topic(Platform::Github, "How do I raise my LeetCode contest rating?"));
        assert!(!is_on_topic(Platform::Github, "What's a good pasta recipe?"));
        assert!(!is_on_topic(Platform::Devto, "gfg potd tips"));
        assert!(!is_on_topic(Platform::Codechef, ""));
    }

    #[test]
    fn test_short_stems_need_a_word_start() {
        // "pr" must not match inside "approach"; "dp" must not match inside "wordpress".
        assert!(!mentions("what approach", "pr", false));
        assert!(mentions("open a pr today", "pr", false));
        assert!(!mentions("wordpress theme", "dp", false));
        assert!(mentions("devto", "devto", true));
        assert!(!mentions("devtools", "devto", true));
    }

    #[tokio::test]
    async fn test_off_topic_question_never_reaches_model() {
        let generator = FakeGenerator::replying("Sure, here's a recipe.");
        let narrator = Narrator::new(generator.clone());
        let (record, report) = github();

        let answer = narrator.chat(&record, &report, "Best pizza in town?", &[]).await;
        assert!(answer.redirected);
        assert_eq!(answer.answer, redirect_message(Platform::Github));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_model_redirect_is_normalized() {
        let generator = FakeGenerator::replying(
            "Hmm. I'm specialized in GitHub stuff only, sorry, try elsewhere!",
        );
        let narrator = Narrator::new(generator.clone());
        let (record, report) = github();

        let answer = narrator
            .chat(&record, &report, "How do I write a better README?", &[])
            .await;
        assert!(answer.redirected);
        assert_eq!(answer.answer, redirect_message(Platform::Github));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_on_topic_answer_is_passed_through() {
        let narrator = Narrator::new(FakeGenerator::replying("  Pin your top 6 repositories.  "));
        let (record, report) = github();

        let answer = narrator
            .chat(&record, &report, "Which repos should I pin?", &[])
            .await;
        assert!(!answer.redirected);
        assert_eq!(answer.answer, "Pin your top 6 repositories.");
    }

    #[tokio::test]
    async fn test_generation_failure_answers_from_report() {
        let narrator = Narrator::new(FakeGenerator::failing(500));
        let (record, report) = github();

        let answer = narrator
            .chat(&record, &report, "How can I improve my score?", &[])
            .await;
        assert!(!answer.redirected);
        assert!(answer.answer.starts_with("Your GitHub score is "));
        assert!(answer.answer.contains("Next step: "));
    }
}

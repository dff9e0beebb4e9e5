// Prompt constants for per-platform analysis and coaching chat.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{fill, render_fields, GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::models::canonical::CanonicalRecord;
use crate::models::platform::Platform;
use crate::models::score::ScoreBreakdown;
use crate::narrative::chat::ChatMessage;
use crate::narrative::report::{NarrativeReport, TopicAssessment};

/// Chat history turns included in the prompt, most recent last.
pub const CHAT_HISTORY_TURNS: usize = 3;

/// What a coaching assistant for `platform` is allowed to talk about.
pub fn platform_focus(platform: Platform) -> &'static str {
    match platform {
        Platform::Github => {
            "GitHub profile optimization, repository management, contribution strategies, \
             open source collaboration, and code quality"
        }
        Platform::Leetcode => {
            "LeetCode problem-solving strategies, algorithm patterns, data structures, \
             contest preparation, and coding interview techniques"
        }
        Platform::Geeksforgeeks => {
            "GeeksforGeeks practice problems, competitive programming, DSA concepts, \
             and technical interview preparation"
        }
        Platform::Codechef => {
            "CodeChef contest strategies, competitive programming techniques, \
             rating improvement, and problem-solving approaches"
        }
        Platform::Hackerrank => {
            "HackerRank skill development, certification preparation, \
             domain-specific challenges, and technical assessments"
        }
        Platform::Devpost => {
            "Hackathon participation, project showcasing, team collaboration, \
             and innovation strategies"
        }
        Platform::Devto => {
            "Technical blogging, community engagement, content creation, \
             and developer networking"
        }
        Platform::Linkedin => {
            "Professional networking, profile optimization, career development, \
             and industry connections"
        }
        Platform::Resume => {
            "Resume structure, ATS keyword optimization, formatting, \
             and presenting achievements"
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analysis
// ────────────────────────────────────────────────────────────────────────────

pub const ANALYSIS_SYSTEM: &str =
    "You are an expert developer-career analyst who benchmarks coding profiles \
    against the wider developer population.";

/// Replace `{platform}`, `{profile_data}`, `{score}`, `{sub_metrics}`,
/// `{highlights}` and `{grounding_instruction}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this {platform} profile.

PROFILE DATA:
{profile_data}

COMPUTED SCORE: {score}/100
SUB-METRICS (0-100):
{sub_metrics}

HIGHLIGHTS:
{highlights}

{grounding_instruction}

Return a JSON object with this EXACT schema:
{
  "percentileRank": 72,
  "globalRanking": "Top 30% of active users",
  "strengths": [{"topic": "Consistency", "score": 80, "description": "..."}],
  "weaknesses": [{"topic": "Hard problems", "score": 25, "description": "..."}],
  "recommendations": ["..."],
  "weeklyPlan": {"day1": "...", "day2": "...", "day3": "...", "day4": "...",
                 "day5": "...", "day6": "...", "day7": "..."},
  "keyMetrics": [{"name": "...", "value": "...", "benchmark": "...",
                  "status": "good|average|needs_improvement"}]
}

Rules:
- Provide 3-5 strengths and 3-5 weaknesses.
- Scores and percentileRank are numbers between 0 and 100.
- Every recommendation is a concrete, actionable step.
- The weekly plan has one focused activity per day."#;

pub fn analysis_system() -> String {
    format!("{ANALYSIS_SYSTEM} {JSON_ONLY_SYSTEM}")
}

pub fn analysis_prompt(record: &CanonicalRecord, breakdown: &ScoreBreakdown) -> String {
    let sub_metrics = render_fields(
        breakdown
            .sub_metrics
            .iter()
            .map(|m| (m.name.as_str(), format!("{:.1} (weight {:.2})", m.value, m.weight))),
    );
    let highlights = if breakdown.highlights.is_empty() {
        "- none".to_string()
    } else {
        breakdown
            .highlights
            .iter()
            .map(|h| format!("- {h}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    fill(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("platform", record.platform().display_name()),
            ("profile_data", render_fields(record.prompt_fields()).as_str()),
            ("score", format!("{:.1}", breakdown.platform_score).as_str()),
            ("sub_metrics", sub_metrics.as_str()),
            ("highlights", highlights.as_str()),
            ("grounding_instruction", GROUNDING_INSTRUCTION),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Chat
// ────────────────────────────────────────────────────────────────────────────

/// Replace `{platform_name}`, `{platform_upper}` and `{focus}` before sending.
pub const CHAT_SYSTEM_TEMPLATE: &str = "\
You are an expert {platform_name} coach. You ONLY discuss {focus}.

Rules:
1. ONLY answer questions about {platform_name}.
2. If the user asks about anything else, reply exactly: \
\"I'm specialized in {platform_upper} only. For that topic, please use the relevant platform's AI assistant.\"
3. Reference the user's actual data and analysis when giving advice.
4. Give specific, actionable steps.
5. Be concise: 2-4 paragraphs.";

/// Replace `{profile_data}`, `{analysis}`, `{history}`, `{question}` and
/// `{grounding_instruction}` before sending.
pub const CHAT_PROMPT_TEMPLATE: &str = "\
USER PROFILE DATA:
{profile_data}

ANALYSIS:
{analysis}

RECENT CONVERSATION:
{history}

{grounding_instruction}

QUESTION: {question}";

pub fn chat_system(platform: Platform) -> String {
    fill(
        CHAT_SYSTEM_TEMPLATE,
        &[
            ("platform_name", platform.display_name()),
            ("platform_upper", platform.as_str().to_uppercase().as_str()),
            ("focus", platform_focus(platform)),
        ],
    )
}

pub fn chat_prompt(
    record: &CanonicalRecord,
    report: &NarrativeReport,
    question: &str,
    history: &[ChatMessage],
) -> String {
    let analysis = render_fields([
        ("Overall Score", format!("{:.1}/100", report.overall_score)),
        ("Percentile", format!("{:.0}", report.percentile_rank)),
        ("Standing", report.global_ranking.clone()),
        ("Strengths", topics(&report.strengths)),
        ("Weaknesses", topics(&report.weaknesses)),
    ]);

    let recent = &history[history.len().saturating_sub(CHAT_HISTORY_TURNS)..];
    let history = if recent.is_empty() {
        "(none)".to_string()
    } else {
        recent
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    };

    fill(
        CHAT_PROMPT_TEMPLATE,
        &[
            ("profile_data", render_fields(record.prompt_fields()).as_str()),
            ("analysis", analysis.as_str()),
            ("history", history.as_str()),
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("question", question.trim()),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Career report
// ────────────────────────────────────────────────────────────────────────────

pub const CAREER_SYSTEM: &str =
    "You are a senior engineering career advisor who turns coding-profile \
    statistics into a concrete plan for a target role.";

/// Replace `{target_role}`, `{composite}`, `{platforms}` and
/// `{grounding_instruction}` before sending.
pub const CAREER_PROMPT_TEMPLATE: &str = r#"Assess this developer for the role: {target_role}
COMPOSITE SCORE: {composite}/100

PLATFORMS:
{platforms}

{grounding_instruction}

Return a JSON object with this EXACT schema:
{
  "marketAnalysis": {"demandScore": 75, "trendingSkills": ["..."],
                     "salaryEstimate": "...", "topCompanies": ["..."]},
  "recommendations": [{"title": "...", "description": "...",
                       "priority": "High|Medium|Low",
                       "category": "Skill|Project|Certification|Networking"}],
  "roadmap": [{"phase": "...", "tasks": ["..."],
               "resources": [{"name": "...", "url": "..."}]}],
  "jobMatch": {"fitPercent": 60, "gaps": ["..."]}
}

Rules:
- Provide 3-5 recommendations, highest priority first.
- The roadmap has 3 phases.
- fitPercent and demandScore are numbers between 0 and 100.
- Gaps name missing skills or experience for the role."#;

pub fn career_system() -> String {
    format!("{CAREER_SYSTEM} {JSON_ONLY_SYSTEM}")
}

pub fn career_prompt(target_role: &str, composite: f64, breakdowns: &[ScoreBreakdown]) -> String {
    let platforms = if breakdowns.is_empty() {
        "- none".to_string()
    } else {
        render_fields(breakdowns.iter().map(|b| {
            let metrics = b
                .sub_metrics
                .iter()
                .map(|m| format!("{} {:.0}", m.name, m.value))
                .collect::<Vec<_>>()
                .join(", ");
            (
                b.platform.display_name(),
                format!("{:.1}/100 ({metrics})", b.platform_score),
            )
        }))
    };

    fill(
        CAREER_PROMPT_TEMPLATE,
        &[
            ("target_role", target_role),
            ("composite", format!("{composite:.1}").as_str()),
            ("platforms", platforms.as_str()),
            ("grounding_instruction", GROUNDING_INSTRUCTION),
        ],
    )
}

fn topics(items: &[TopicAssessment]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .map(|t| format!("{} ({:.0})", t.topic, t.score))
        .collect::<Vec<_>>()
        .join(", ")
}

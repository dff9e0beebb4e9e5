//! Cross-platform career report: market context, prioritised recommendations,
//! a phased roadmap and a job match for a target role.
//!
//! Built from every successful platform's `ScoreBreakdown`. As with the
//! per-platform report, model output is coerced field by field and the
//! computed composite is never taken from the model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::platform::Platform;
use crate::models::score::ScoreBreakdown;
use crate::narrative::fallback::advice;
use crate::narrative::report::{list, score, text, ReportSource, MAX_LIST_ITEMS};
use crate::scoring::common::clamp_score;

pub const DEFAULT_TARGET_ROLE: &str = "Software Engineer";
pub const MAX_TARGET_ROLE_CHARS: usize = 100;

/// Platforms scoring below this are reported as gaps.
const GAP_THRESHOLD: f64 = 60.0;
const ROADMAP_PHASES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Skill,
    Project,
    Certification,
    Networking,
}

impl Category {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skill" => Some(Category::Skill),
            "project" => Some(Category::Project),
            "certification" => Some(Category::Certification),
            "networking" => Some(Category::Networking),
            _ => None,
        }
    }

    /// What kind of work moves the needle on `platform`.
    fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Github | Platform::Devpost => Category::Project,
            Platform::Hackerrank => Category::Certification,
            Platform::Devto | Platform::Linkedin => Category::Networking,
            Platform::Leetcode | Platform::Geeksforgeeks | Platform::Codechef | Platform::Resume => {
                Category::Skill
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub demand_score: f64,
    pub trending_skills: Vec<String>,
    pub salary_estimate: String,
    pub top_companies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRecommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub phase: String,
    pub tasks: Vec<String>,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub role: String,
    pub fit_percent: f64,
    pub gaps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerReport {
    pub target_role: String,
    pub composite_score: f64,
    pub market_analysis: MarketAnalysis,
    pub recommendations: Vec<CareerRecommendation>,
    pub roadmap: Vec<RoadmapPhase>,
    pub job_match: JobMatch,
    pub analyzed_at: DateTime<Utc>,
    pub source: ReportSource,
}

/// Trimmed target role, or the default when blank.
pub fn target_role_or_default(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TARGET_ROLE)
        .to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Deterministic report
// ────────────────────────────────────────────────────────────────────────────

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn resource(name: &str, url: &str) -> Resource {
    Resource {
        name: name.to_string(),
        url: url.to_string(),
    }
}

/// Weakest platforms first; only those below the gap threshold.
fn gaps(breakdowns: &[ScoreBreakdown]) -> Vec<&ScoreBreakdown> {
    let mut weak: Vec<&ScoreBreakdown> = breakdowns
        .iter()
        .filter(|b| b.platform_score < GAP_THRESHOLD)
        .collect();
    weak.sort_by(|a, b| a.platform_score.total_cmp(&b.platform_score));
    weak
}

/// Advice for the weakest sub-metric of one platform.
fn focus_task(breakdown: &ScoreBreakdown) -> String {
    let platform = breakdown.platform;
    match breakdown.weakest_first().first() {
        Some(metric) => format!(
            "{} ({}): {}",
            platform.display_name(),
            metric.name,
            advice(platform, &metric.name)
        ),
        None => format!("Build up your {} profile", platform.display_name()),
    }
}

fn general_recommendations() -> Vec<CareerRecommendation> {
    vec![
        CareerRecommendation {
            title: "Build Portfolio Projects".into(),
            description: "Create 2-3 full-stack projects showcasing your skills in modern frameworks."
                .into(),
            priority: Priority::High,
            category: Category::Project,
        },
        CareerRecommendation {
            title: "Learn System Design".into(),
            description:
                "Study system design patterns and architecture for senior-level interviews.".into(),
            priority: Priority::Medium,
            category: Category::Skill,
        },
        CareerRecommendation {
            title: "Grow Your Network".into(),
            description: "Share what you build and connect with engineers in your target role."
                .into(),
            priority: Priority::Low,
            category: Category::Networking,
        },
    ]
}

pub fn fallback_career_report(
    breakdowns: &[ScoreBreakdown],
    composite_score: f64,
    target_role: &str,
) -> CareerReport {
    let weak = gaps(breakdowns);

    let mut recommendations: Vec<CareerRecommendation> = weak
        .iter()
        .map(|b| CareerRecommendation {
            title: format!("Strengthen your {} profile", b.platform.display_name()),
            description: focus_task(b),
            priority: if b.platform_score < 40.0 {
                Priority::High
            } else {
                Priority::Medium
            },
            category: Category::for_platform(b.platform),
        })
        .collect();
    recommendations.extend(general_recommendations());
    recommendations.truncate(MAX_LIST_ITEMS);

    let mut foundation: Vec<String> = weak
        .iter()
        .take(ROADMAP_PHASES)
        .map(|b| focus_task(b))
        .collect();
    if foundation.is_empty() {
        foundation = strings(&[
            "Solve 50 LeetCode problems (mix of easy and medium)",
            "Study data structures and algorithms",
        ]);
    }

    let gap_names: Vec<String> = if weak.is_empty() {
        strings(&["System Design", "Cloud Services"])
    } else {
        weak.iter().map(|b| b.platform.display_name().to_string()).collect()
    };

    CareerReport {
        target_role: target_role.to_string(),
        composite_score,
        market_analysis: MarketAnalysis {
            demand_score: 75.0,
            trending_skills: strings(&[
                "Python",
                "JavaScript",
                "React",
                "Node.js",
                "AWS",
                "Docker",
                "Kubernetes",
                "System Design",
            ]),
            salary_estimate: "$80,000 - $150,000".to_string(),
            top_companies: strings(&[
                "Google", "Microsoft", "Amazon", "Meta", "Apple", "Netflix", "Uber", "Airbnb",
            ]),
        },
        recommendations,
        roadmap: vec![
            RoadmapPhase {
                phase: "Foundation (Months 1-2)".into(),
                tasks: foundation,
                resources: vec![
                    resource("LeetCode", "https://leetcode.com"),
                    resource("FreeCodeCamp", "https://freecodecamp.org"),
                ],
            },
            RoadmapPhase {
                phase: "Intermediate (Months 3-4)".into(),
                tasks: strings(&[
                    "Build a complex project with authentication and database",
                    "Learn cloud services (AWS/Azure basics)",
                    "Practice system design problems",
                ]),
                resources: vec![
                    resource("AWS Free Tier", "https://aws.amazon.com/free"),
                    resource(
                        "System Design Primer",
                        "https://github.com/donnemartin/system-design-primer",
                    ),
                ],
            },
            RoadmapPhase {
                phase: "Advanced (Months 5-6)".into(),
                tasks: strings(&[
                    "Contribute to open source projects",
                    "Prepare for technical interviews",
                    "Network with industry professionals",
                ]),
                resources: vec![
                    resource("GitHub Explore", "https://github.com/explore"),
                    resource("LinkedIn", "https://linkedin.com"),
                ],
            },
        ],
        job_match: JobMatch {
            role: target_role.to_string(),
            fit_percent: clamp_score(composite_score),
            gaps: gap_names,
        },
        analyzed_at: Utc::now(),
        source: ReportSource::Fallback,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Coercion of model output
// ────────────────────────────────────────────────────────────────────────────

impl CareerReport {
    /// Builds a report from a parsed model object. Missing or invalid fields come
    /// from `fallback`; `target_role`, `composite_score` and `job_match.role`
    /// always do.
    pub fn from_untrusted(obj: &Map<String, Value>, fallback: &CareerReport) -> Self {
        let market = obj.get("marketAnalysis").and_then(Value::as_object);
        let fallback_market = &fallback.market_analysis;
        let job = obj.get("jobMatch").and_then(Value::as_object);

        Self {
            target_role: fallback.target_role.clone(),
            composite_score: fallback.composite_score,
            market_analysis: MarketAnalysis {
                demand_score: score(market.and_then(|m| m.get("demandScore")))
                    .unwrap_or(fallback_market.demand_score),
                trending_skills: list(
                    market.and_then(|m| m.get("trendingSkills")),
                    |v| text(Some(v)),
                    &fallback_market.trending_skills,
                ),
                salary_estimate: text(market.and_then(|m| m.get("salaryEstimate")))
                    .unwrap_or_else(|| fallback_market.salary_estimate.clone()),
                top_companies: list(
                    market.and_then(|m| m.get("topCompanies")),
                    |v| text(Some(v)),
                    &fallback_market.top_companies,
                ),
            },
            recommendations: list(
                obj.get("recommendations"),
                recommendation,
                &fallback.recommendations,
            ),
            roadmap: list(obj.get("roadmap"), phase, &fallback.roadmap),
            job_match: JobMatch {
                role: fallback.job_match.role.clone(),
                fit_percent: score(job.and_then(|j| j.get("fitPercent")))
                    .unwrap_or(fallback.job_match.fit_percent),
                gaps: list(
                    job.and_then(|j| j.get("gaps")),
                    |v| text(Some(v)),
                    &fallback.job_match.gaps,
                ),
            },
            analyzed_at: Utc::now(),
            source: ReportSource::Generated,
        }
    }
}

fn recommendation(value: &Value) -> Option<CareerRecommendation> {
    let obj = value.as_object()?;
    Some(CareerRecommendation {
        title: text(obj.get("title"))?,
        description: text(obj.get("description")).unwrap_or_default(),
        priority: obj
            .get("priority")
            .and_then(Value::as_str)
            .and_then(Priority::parse)
            .unwrap_or(Priority::Medium),
        category: obj
            .get("category")
            .and_then(Value::as_str)
            .and_then(Category::parse)
            .unwrap_or(Category::Skill),
    })
}

fn phase(value: &Value) -> Option<RoadmapPhase> {
    let obj = value.as_object()?;
    let tasks = list(obj.get("tasks"), |v| text(Some(v)), &[]);
    if tasks.is_empty() {
        return None;
    }
    Some(RoadmapPhase {
        phase: text(obj.get("phase"))?,
        tasks,
        resources: list(obj.get("resources"), resource_item, &[]),
    })
}

fn resource_item(value: &Value) -> Option<Resource> {
    let obj = value.as_object()?;
    Some(Resource {
        name: text(obj.get("name"))?,
        url: text(obj.get("url")).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::models::canonical::{CanonicalRecord, GithubRecord, LeetcodeRecord};
    use crate::scoring;

    fn breakdowns() -> Vec<ScoreBreakdown> {
        vec![
            scoring::score(&CanonicalRecord::Leetcode(LeetcodeRecord {
                easy_solved: 10,
                total_solved: 10,
                ..Default::default()
            })),
            scoring::score(&CanonicalRecord::Github(GithubRecord::default())),
        ]
    }

    #[test]
    fn test_target_role_defaults_when_blank() {
        assert_eq!(target_role_or_default(None), DEFAULT_TARGET_ROLE);
        assert_eq!(target_role_or_default(Some("   ")), DEFAULT_TARGET_ROLE);
        assert_eq!(target_role_or_default(Some(" Data Engineer ")), "Data Engineer");
    }

    #[test]
    fn test_fallback_targets_weakest_platforms_first() {
        let scored = breakdowns();
        let report = fallback_career_report(&scored, 12.5, "Backend Engineer");

        assert_eq!(report.source, ReportSource::Fallback);
        assert_eq!(report.composite_score, 12.5);
        assert_eq!(report.job_match.role, "Backend Engineer");
        assert_eq!(report.job_match.fit_percent, 12.5);
        assert_eq!(report.job_match.gaps, vec!["GitHub", "LeetCode"]);
        assert_eq!(report.recommendations[0].title, "Strengthen your GitHub profile");
        assert_eq!(report.recommendations[0].priority, Priority::High);
        assert_eq!(report.recommendations[0].category, Category::Project);
        assert!(report.recommendations.len() <= MAX_LIST_ITEMS);
        assert_eq!(report.roadmap.len(), ROADMAP_PHASES);
        assert!(report.roadmap[0].tasks[0].starts_with("GitHub ("));
    }

    #[test]
    fn test_fallback_without_gaps_uses_general_advice() {
        let report = fallback_career_report(&[], 0.0, DEFAULT_TARGET_ROLE);
        assert_eq!(report.job_match.gaps, vec!["System Design", "Cloud Services"]);
        assert_eq!(report.recommendations[0].title, "Build Portfolio Projects");
        assert!(!report.roadmap[0].tasks.is_empty());
    }

    #[test]
    fn test_untrusted_object_is_coerced_and_composite_kept() {
        let fallback = fallback_career_report(&breakdowns(), 30.0, "SRE");
        let obj = json!({
            "marketAnalysis": {"demandScore": "140", "trendingSkills": ["Go", 7, ""]},
            "recommendations": [
                {"title": "Learn Kubernetes", "priority": "HIGH", "category": "skill"},
                {"description": "no title"}
            ],
            "roadmap": [{"phase": "Month 1", "tasks": []}],
            "jobMatch": {"role": "Astronaut", "fitPercent": 64, "gaps": ["Linux"]},
            "compositeScore": 99
        });

        let report = CareerReport::from_untrusted(obj.as_object().unwrap(), &fallback);
        assert_eq!(report.source, ReportSource::Generated);
        assert_eq!(report.composite_score, 30.0);
        assert_eq!(report.target_role, "SRE");
        assert_eq!(report.market_analysis.demand_score, 100.0);
        assert_eq!(report.market_analysis.trending_skills, vec!["Go"]);
        assert_eq!(report.market_analysis.salary_estimate, fallback.market_analysis.salary_estimate);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].priority, Priority::High);
        assert_eq!(report.roadmap, fallback.roadmap);
        assert_eq!(report.job_match.role, "SRE");
        assert_eq!(report.job_match.fit_percent, 64.0);
        assert_eq!(report.job_match.gaps, vec!["Linux"]);
    }
}

//! Deterministic report built from a `ScoreBreakdown` alone. No network.

use chrono::Utc;

use crate::models::platform::Platform;
use crate::models::score::{ScoreBreakdown, SubMetric};
use crate::narrative::report::{
    KeyMetric, MetricStatus, NarrativeReport, ReportSource, TopicAssessment, WeeklyPlan,
    MAX_LIST_ITEMS,
};

const STRENGTH_THRESHOLD: f64 = 60.0;

/// `(minimum score, percentile, tier description)`, best first.
const TIERS: &[(f64, f64, &str)] = &[
    (85.0, 95.0, "Top 5% of developers on this platform"),
    (70.0, 80.0, "Top 20%: well above the typical profile"),
    (55.0, 65.0, "Above average, with clear room to climb"),
    (40.0, 50.0, "Around the median of active users"),
    (25.0, 35.0, "Developing: building momentum"),
];
const BOTTOM_TIER: (f64, &str) = (20.0, "Getting started: early-stage profile");

fn tier(score: f64) -> (f64, &'static str) {
    TIERS
        .iter()
        .find(|(min, _, _)| score >= *min)
        .map(|(_, percentile, description)| (*percentile, *description))
        .unwrap_or(BOTTOM_TIER)
}

pub fn fallback_report(breakdown: &ScoreBreakdown) -> NarrativeReport {
    let platform = breakdown.platform;
    let (percentile_rank, global_ranking) = tier(breakdown.platform_score);

    let mut strong: Vec<&SubMetric> = breakdown
        .sub_metrics
        .iter()
        .filter(|m| m.value >= STRENGTH_THRESHOLD)
        .collect();
    strong.sort_by(|a, b| b.value.total_cmp(&a.value));

    let weak: Vec<&SubMetric> = breakdown
        .weakest_first()
        .into_iter()
        .filter(|m| m.value < STRENGTH_THRESHOLD)
        .collect();

    NarrativeReport {
        platform,
        percentile_rank,
        global_ranking: global_ranking.to_string(),
        overall_score: breakdown.platform_score,
        strengths: strong
            .iter()
            .take(MAX_LIST_ITEMS)
            .map(|m| assessment(platform, m, "a standout area"))
            .collect(),
        weaknesses: weak
            .iter()
            .take(MAX_LIST_ITEMS)
            .map(|m| assessment(platform, m, "the biggest opportunity for growth"))
            .collect(),
        recommendations: recommendations(platform, &weak),
        weekly_plan: weekly_plan(breakdown, &weak),
        key_metrics: breakdown
            .sub_metrics
            .iter()
            .map(|m| KeyMetric {
                name: m.name.clone(),
                value: format!("{:.0}/100", m.value),
                benchmark: "70/100".to_string(),
                status: MetricStatus::from_score(m.value),
            })
            .collect(),
        analyzed_at: Utc::now(),
        source: ReportSource::Fallback,
    }
}

fn assessment(platform: Platform, metric: &SubMetric, framing: &str) -> TopicAssessment {
    TopicAssessment {
        topic: metric.name.clone(),
        score: metric.value,
        description: format!(
            "{} scores {:.0}/100 on {}, {framing}.",
            metric.name,
            metric.value,
            platform.display_name()
        ),
    }
}

fn recommendations(platform: Platform, weak: &[&SubMetric]) -> Vec<String> {
    let mut out: Vec<String> = weak
        .iter()
        .map(|m| advice(platform, &m.name).to_string())
        .take(MAX_LIST_ITEMS - 1)
        .collect();
    out.push(general_advice(platform).to_string());
    out
}

/// Six focus days rotating through the weakest sub-metrics, then a review day.
fn weekly_plan(breakdown: &ScoreBreakdown, weak: &[&SubMetric]) -> WeeklyPlan {
    let rotation: Vec<&SubMetric> = if weak.is_empty() {
        breakdown.weakest_first()
    } else {
        weak.to_vec()
    };
    let platform = breakdown.platform;

    let days: [String; 7] = std::array::from_fn(|day| {
        if day == 6 {
            return format!(
                "Review this week's {} progress and set targets for next week",
                platform.display_name()
            );
        }
        match rotation.get(day % rotation.len().max(1)) {
            Some(metric) => format!("{}: {}", metric.name, advice(platform, &metric.name)),
            None => general_advice(platform).to_string(),
        }
    });
    WeeklyPlan::from_days(days)
}

fn general_advice(platform: Platform) -> &'static str {
    match platform {
        Platform::Github => "Pin your best repositories and keep their READMEs current",
        Platform::Leetcode => "Keep a daily practice habit, even one problem a day",
        Platform::Geeksforgeeks => "Solve the Problem of the Day to keep your streak alive",
        Platform::Codechef => "Take part in the weekly Starters contest",
        Platform::Hackerrank => "Attempt a skill certification in your strongest domain",
        Platform::Devpost => "Document every project with a demo video and clear write-up",
        Platform::Devto => "Publish on a regular schedule and reply to every comment",
        Platform::Linkedin => "Share a short post about something you built this month",
        Platform::Resume => "Tailor your résumé keywords to each job description",
    }
}

/// Platform- and sub-metric-specific advice.
pub(crate) fn advice(platform: Platform, metric: &str) -> &'static str {
    match (platform, metric) {
        (Platform::Github, "Code Quality") => {
            "Add descriptions, READMEs and issue tracking to your repositories"
        }
        (Platform::Github, "Activity") => "Push small, regular commits to active projects",
        (Platform::Github, "Impact") => "Share projects publicly to earn stars and forks",
        (Platform::Github, "Diversity") => "Build a small project in a new language",
        (Platform::Leetcode, "Problems Solved") => "Work up from easy to medium problems by topic",
        (Platform::Leetcode, "Ranking") => "Join weekly contests to climb the global ranking",
        (Platform::Leetcode, "Consistency") => "Solve at least one problem every day",
        (Platform::Leetcode, "Efficiency") => "Shift practice towards medium and hard problems",
        (Platform::Geeksforgeeks, "Problems") => "Complete a topic-wise DSA practice track",
        (Platform::Geeksforgeeks, "Coding Score") => "Target higher-difficulty problems for more points",
        (Platform::Geeksforgeeks, "Consistency") => "Keep your Problem of the Day streak going",
        (Platform::Geeksforgeeks, "Contribution") => "Write an article explaining a problem you solved",
        (Platform::Codechef, "Rating") => "Upsolve every contest problem you missed",
        (Platform::Codechef, "Problems") => "Clear the practice section by difficulty rating",
        (Platform::Codechef, "Contests") => "Enter every rated contest this month",
        (Platform::Codechef, "Global Rank") => "Focus on speed in the first two contest problems",
        (Platform::Hackerrank, "Stars") => "Push one domain to the next star level",
        (Platform::Hackerrank, "Badges") => "Start a new domain to unlock another badge",
        (Platform::Hackerrank, "Challenges") => "Finish the challenges in an interview prep kit",
        (Platform::Devpost, "Projects") => "Submit your side projects to Devpost",
        (Platform::Devpost, "Hackathons") => "Register for an online hackathon this month",
        (Platform::Devpost, "Prizes") => "Pick hackathon tracks that match your strongest skills",
        (Platform::Devpost, "Community") => "Like and comment on other builders' projects",
        (Platform::Devto, "Writing") => "Draft a post about a recent problem you solved",
        (Platform::Devto, "Engagement") => "Use popular tags and a clear, specific title",
        (Platform::Devto, "Discussion") => "End posts with a question for readers",
        (Platform::Devto, "Audience") => "Cross-post your articles and follow active writers",
        (Platform::Linkedin, "Network") => "Connect with classmates, colleagues and recruiters",
        (Platform::Linkedin, "Profile Completeness") => "Fill in your headline, location and education",
        (Platform::Linkedin, "Experience") => "List internships and projects as experience",
        (Platform::Linkedin, "Skills") => "Add your core technical skills and ask for endorsements",
        (Platform::Resume, "Keywords") => "Add more relevant technical skills and keywords",
        (Platform::Resume, "Formatting") => "Improve formatting with bullet points and clear sections",
        (Platform::Resume, "Contact") => {
            "Ensure all contact information is present (email, phone, LinkedIn)"
        }
        (Platform::Resume, "Structure") => {
            "Use standard section headers and action verbs to describe achievements"
        }
        _ => general_advice(platform),
    }
}

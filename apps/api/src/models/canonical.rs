//! Canonical per-platform schemas.
//!
//! Every field is always present. The normalizer fills anything it could not
//! read with zero / empty, so downstream code never null-checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::platform::Platform;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRecord {
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    /// Language name -> number of original repositories using it.
    pub language_counts: BTreeMap<String, u64>,
    /// Top three languages by repository count.
    pub top_languages: Vec<String>,
    /// Repositories pushed to in the last 180 days.
    pub recently_active_repos: u64,
    pub commits_last_year: u64,
    pub account_age_days: u64,
    pub repos_checked: u64,
    pub repos_with_description: u64,
    pub repos_with_docs: u64,
    pub repos_with_issues: u64,
    pub non_empty_repos: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetcodeRecord {
    pub total_solved: u64,
    pub easy_solved: u64,
    pub medium_solved: u64,
    pub hard_solved: u64,
    /// Percentage, 0–100.
    pub acceptance_rate: f64,
    /// Global ranking; 0 means unranked.
    pub ranking: u64,
    pub reputation: u64,
    pub contest_rating: f64,
    pub contests_attended: u64,
    pub recent_submissions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeeksforgeeksRecord {
    pub coding_score: u64,
    pub problems_solved: u64,
    pub institute_rank: u64,
    pub articles_published: u64,
    pub longest_streak: u64,
    pub potds_solved: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodechefRecord {
    pub current_rating: u64,
    pub stars: u64,
    pub problems_solved: u64,
    pub contests_participated: u64,
    pub global_rank: u64,
    pub country_rank: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HackerrankRecord {
    pub total_stars: u64,
    pub badges_earned: u64,
    pub challenges_solved: u64,
    pub top_badges: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevpostRecord {
    pub projects_submitted: u64,
    pub hackathons_participated: u64,
    pub prizes_won: u64,
    pub followers: u64,
    pub likes_received: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevtoRecord {
    pub articles_published: u64,
    pub total_reactions: u64,
    pub total_comments: u64,
    pub followers: u64,
    pub top_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedinRecord {
    pub connections: u64,
    pub headline: String,
    pub location: String,
    pub experience_count: u64,
    pub education_count: u64,
    pub skills_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub text_length: u64,
    pub technical_skills: Vec<String>,
    pub technical_skills_found: u64,
    pub soft_skills_found: u64,
    pub action_verbs_found: u64,
    pub certifications_found: u64,
    pub sections_found: u64,
    pub experience_years: u64,
    pub has_bullets: bool,
    pub has_dates: bool,
    pub has_email: bool,
    pub has_phone: bool,
    pub has_linkedin: bool,
}

/// Platform-tagged canonical record. Produced once per fetch, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum CanonicalRecord {
    Github(GithubRecord),
    Leetcode(LeetcodeRecord),
    Geeksforgeeks(GeeksforgeeksRecord),
    Codechef(CodechefRecord),
    Hackerrank(HackerrankRecord),
    Devpost(DevpostRecord),
    Devto(DevtoRecord),
    Linkedin(LinkedinRecord),
    Resume(ResumeRecord),
}

impl CanonicalRecord {
    pub fn platform(&self) -> Platform {
        match self {
            CanonicalRecord::Github(_) => Platform::Github,
            CanonicalRecord::Leetcode(_) => Platform::Leetcode,
            CanonicalRecord::Geeksforgeeks(_) => Platform::Geeksforgeeks,
            CanonicalRecord::Codechef(_) => Platform::Codechef,
            CanonicalRecord::Hackerrank(_) => Platform::Hackerrank,
            CanonicalRecord::Devpost(_) => Platform::Devpost,
            CanonicalRecord::Devto(_) => Platform::Devto,
            CanonicalRecord::Linkedin(_) => Platform::Linkedin,
            CanonicalRecord::Resume(_) => Platform::Resume,
        }
    }

    /// The all-default record for a platform.
    pub fn empty(platform: Platform) -> Self {
        match platform {
            Platform::Github => CanonicalRecord::Github(GithubRecord::default()),
            Platform::Leetcode => CanonicalRecord::Leetcode(LeetcodeRecord::default()),
            Platform::Geeksforgeeks => {
                CanonicalRecord::Geeksforgeeks(GeeksforgeeksRecord::default())
            }
            Platform::Codechef => CanonicalRecord::Codechef(CodechefRecord::default()),
            Platform::Hackerrank => CanonicalRecord::Hackerrank(HackerrankRecord::default()),
            Platform::Devpost => CanonicalRecord::Devpost(DevpostRecord::default()),
            Platform::Devto => CanonicalRecord::Devto(DevtoRecord::default()),
            Platform::Linkedin => CanonicalRecord::Linkedin(LinkedinRecord::default()),
            Platform::Resume => CanonicalRecord::Resume(ResumeRecord::default()),
        }
    }

    /// Flat `(label, value)` view used when embedding the record in prompts.
    pub fn prompt_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CanonicalRecord::Github(r) => vec![
                ("Public Repos", r.public_repos.to_string()),
                ("Followers", r.followers.to_string()),
                ("Following", r.following.to_string()),
                ("Total Stars", r.total_stars.to_string()),
                ("Total Forks", r.total_forks.to_string()),
                ("Commits (Last Year, estimated)", r.commits_last_year.to_string()),
                ("Recently Active Repos", r.recently_active_repos.to_string()),
                ("Top Languages", join_or_none(&r.top_languages)),
            ],
            CanonicalRecord::Leetcode(r) => vec![
                ("Total Solved", r.total_solved.to_string()),
                ("Easy Solved", r.easy_solved.to_string()),
                ("Medium Solved", r.medium_solved.to_string()),
                ("Hard Solved", r.hard_solved.to_string()),
                ("Acceptance Rate", format!("{:.1}%", r.acceptance_rate)),
                ("Ranking", rank_or_na(r.ranking)),
                ("Reputation", r.reputation.to_string()),
                ("Contest Rating", format!("{:.0}", r.contest_rating)),
                ("Contests Attended", r.contests_attended.to_string()),
            ],
            CanonicalRecord::Geeksforgeeks(r) => vec![
                ("Coding Score", r.coding_score.to_string()),
                ("Problems Solved", r.problems_solved.to_string()),
                ("Institute Rank", rank_or_na(r.institute_rank)),
                ("Articles Published", r.articles_published.to_string()),
                ("Longest Streak", format!("{} days", r.longest_streak)),
                ("POTDs Solved", r.potds_solved.to_string()),
            ],
            CanonicalRecord::Codechef(r) => vec![
                ("Rating", r.current_rating.to_string()),
                ("Stars", r.stars.to_string()),
                ("Problems Solved", r.problems_solved.to_string()),
                ("Contests", r.contests_participated.to_string()),
                ("Global Rank", rank_or_na(r.global_rank)),
                ("Country Rank", rank_or_na(r.country_rank)),
            ],
            CanonicalRecord::Hackerrank(r) => vec![
                ("Total Stars", r.total_stars.to_string()),
                ("Badges Earned", r.badges_earned.to_string()),
                ("Challenges Solved", r.challenges_solved.to_string()),
                ("Top Badges", join_or_none(&r.top_badges)),
            ],
            CanonicalRecord::Devpost(r) => vec![
                ("Projects", r.projects_submitted.to_string()),
                ("Hackathons", r.hackathons_participated.to_string()),
                ("Prizes Won", r.prizes_won.to_string()),
                ("Followers", r.followers.to_string()),
                ("Likes", r.likes_received.to_string()),
            ],
            CanonicalRecord::Devto(r) => vec![
                ("Posts", r.articles_published.to_string()),
                ("Followers", r.followers.to_string()),
                ("Post Reactions", r.total_reactions.to_string()),
                ("Comments", r.total_comments.to_string()),
                ("Tags", join_or_none(&r.top_tags)),
            ],
            CanonicalRecord::Linkedin(r) => vec![
                ("Headline", text_or_na(&r.headline)),
                ("Location", text_or_na(&r.location)),
                ("Connections", r.connections.to_string()),
                ("Experience Entries", r.experience_count.to_string()),
                ("Education Entries", r.education_count.to_string()),
                ("Skills", r.skills_count.to_string()),
            ],
            CanonicalRecord::Resume(r) => vec![
                ("Text Length", r.text_length.to_string()),
                ("Technical Skills", join_or_none(&r.technical_skills)),
                ("Soft Skills Found", r.soft_skills_found.to_string()),
                ("Action Verbs Found", r.action_verbs_found.to_string()),
                ("Certifications Found", r.certifications_found.to_string()),
                ("Standard Sections", r.sections_found.to_string()),
                ("Experience (years)", r.experience_years.to_string()),
            ],
        }
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn rank_or_na(rank: u64) -> String {
    if rank == 0 {
        "N/A".to_string()
    } else {
        rank.to_string()
    }
}

fn text_or_na(text: &str) -> String {
    if text.is_empty() {
        "N/A".to_string()
    } else {
        text.to_string()
    }
}

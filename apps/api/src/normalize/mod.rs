//! Normalizer: raw, loosely-named adapter output -> fixed canonical schema.
//!
//! Total and pure. Missing or unreadable fields become 0 / "" / [].

pub mod fields;

use std::collections::BTreeMap;

use crate::extraction::raw::RawRecord;
use crate::models::canonical::{
    CanonicalRecord, CodechefRecord, DevpostRecord, DevtoRecord, GeeksforgeeksRecord,
    GithubRecord, HackerrankRecord, LeetcodeRecord, LinkedinRecord, ResumeRecord,
};
use crate::models::platform::Platform;

use fields::{boolean, count, count_map, float, list, text};

const TOP_LANGUAGES: usize = 3;

pub fn normalize(platform: Platform, raw: &RawRecord) -> CanonicalRecord {
    match platform {
        Platform::Github => CanonicalRecord::Github(github(raw)),
        Platform::Leetcode => CanonicalRecord::Leetcode(leetcode(raw)),
        Platform::Geeksforgeeks => CanonicalRecord::Geeksforgeeks(geeksforgeeks(raw)),
        Platform::Codechef => CanonicalRecord::Codechef(codechef(raw)),
        Platform::Hackerrank => CanonicalRecord::Hackerrank(hackerrank(raw)),
        Platform::Devpost => CanonicalRecord::Devpost(devpost(raw)),
        Platform::Devto => CanonicalRecord::Devto(devto(raw)),
        Platform::Linkedin => CanonicalRecord::Linkedin(linkedin(raw)),
        Platform::Resume => CanonicalRecord::Resume(resume(raw)),
    }
}

fn github(raw: &RawRecord) -> GithubRecord {
    let language_counts = count_map(raw, "language_counts", &["languages"]);
    let mut top_languages = list(raw, "top_languages", &[]);
    if top_languages.is_empty() {
        top_languages = top_by_count(&language_counts, TOP_LANGUAGES);
    }

    GithubRecord {
        public_repos: count(raw, "public_repos", &["repositories", "repos"]),
        followers: count(raw, "followers", &[]),
        following: count(raw, "following", &[]),
        total_stars: count(raw, "total_stars", &["stars"]),
        total_forks: count(raw, "total_forks", &["forks"]),
        language_counts,
        top_languages,
        recently_active_repos: count(raw, "recently_active_repos", &["recent_activity"]),
        commits_last_year: count(raw, "commits_last_year", &["commits"]),
        account_age_days: count(raw, "account_age_days", &[]),
        repos_checked: count(raw, "repos_checked", &[]),
        repos_with_description: count(raw, "repos_with_description", &[]),
        repos_with_docs: count(raw, "repos_with_docs", &[]),
        repos_with_issues: count(raw, "repos_with_issues", &[]),
        non_empty_repos: count(raw, "non_empty_repos", &[]),
    }
}

fn top_by_count(counts: &BTreeMap<String, u64>, n: usize) -> Vec<String> {
    let mut entries: Vec<(&String, &u64)> = counts.iter().collect();
    // BTreeMap order makes the name tie-break stable.
    entries.sort_by(|a, b| b.1.cmp(a.1));
    entries.into_iter().take(n).map(|(k, _)| k.clone()).collect()
}

fn leetcode(raw: &RawRecord) -> LeetcodeRecord {
    let easy = count(raw, "easy_solved", &["easy", "Easy"]);
    let medium = count(raw, "medium_solved", &["medium", "Medium"]);
    let hard = count(raw, "hard_solved", &["hard", "Hard"]);
    let reported_total = count(raw, "total_solved", &["total", "All"]);

    LeetcodeRecord {
        total_solved: reported_total.max(easy.saturating_add(medium).saturating_add(hard)),
        easy_solved: easy,
        medium_solved: medium,
        hard_solved: hard,
        acceptance_rate: float(raw, "acceptance_rate", &["acceptance"]).min(100.0),
        ranking: count(raw, "ranking", &["rank"]),
        reputation: count(raw, "reputation", &[]),
        contest_rating: float(raw, "contest_rating", &["rating"]),
        contests_attended: count(raw, "contests_attended", &["attendedContestsCount"]),
        recent_submissions: count(raw, "recent_submissions", &["streak"]),
    }
}

fn geeksforgeeks(raw: &RawRecord) -> GeeksforgeeksRecord {
    GeeksforgeeksRecord {
        coding_score: count(raw, "coding_score", &["score"]),
        problems_solved: count(raw, "problems_solved", &["total_problems_solved"]),
        institute_rank: count(raw, "institute_rank", &[]),
        articles_published: count(raw, "articles_published", &["articles"]),
        longest_streak: count(raw, "longest_streak", &["streak"]),
        potds_solved: count(raw, "potds_solved", &["potd_solved", "potds"]),
    }
}

fn codechef(raw: &RawRecord) -> CodechefRecord {
    CodechefRecord {
        current_rating: count(raw, "current_rating", &["rating"]),
        stars: count(raw, "stars", &[]).min(7),
        problems_solved: count(raw, "problems_solved", &["fully_solved"]),
        contests_participated: count(raw, "contests_participated", &["contests"]),
        global_rank: count(raw, "global_rank", &[]),
        country_rank: count(raw, "country_rank", &[]),
    }
}

fn hackerrank(raw: &RawRecord) -> HackerrankRecord {
    HackerrankRecord {
        total_stars: count(raw, "total_stars", &["stars"]),
        badges_earned: count(raw, "badges_earned", &["badges"]),
        challenges_solved: count(raw, "challenges_solved", &["solved"]),
        top_badges: list(raw, "top_badges", &[]),
    }
}

fn devpost(raw: &RawRecord) -> DevpostRecord {
    DevpostRecord {
        projects_submitted: count(raw, "projects_submitted", &["projects"]),
        hackathons_participated: count(raw, "hackathons_participated", &["hackathons"]),
        prizes_won: count(raw, "prizes_won", &["prizes", "wins"]),
        followers: count(raw, "followers", &[]),
        likes_received: count(raw, "likes_received", &["likes"]),
    }
}

fn devto(raw: &RawRecord) -> DevtoRecord {
    DevtoRecord {
        articles_published: count(raw, "articles_published", &["posts", "articles"]),
        total_reactions: count(raw, "total_reactions", &["reactions"]),
        total_comments: count(raw, "total_comments", &["comments"]),
        followers: count(raw, "followers", &["followers_count"]),
        top_tags: list(raw, "top_tags", &["tags"]),
    }
}

fn linkedin(raw: &RawRecord) -> LinkedinRecord {
    LinkedinRecord {
        connections: count(raw, "connections", &[]),
        headline: text(raw, "headline", &[]),
        location: text(raw, "location", &[]),
        experience_count: count(raw, "experience_count", &["experience"]),
        education_count: count(raw, "education_count", &["education"]),
        skills_count: count(raw, "skills_count", &["skills"]),
    }
}

fn resume(raw: &RawRecord) -> ResumeRecord {
    let technical_skills = list(raw, "technical_skills", &["skills"]);
    let technical_skills_found = count(raw, "technical_skills_found", &[])
        .max(technical_skills.len() as u64);

    ResumeRecord {
        text_length: count(raw, "text_length", &[]),
        technical_skills,
        technical_skills_found,
        soft_skills_found: count(raw, "soft_skills_found", &[]),
        action_verbs_found: count(raw, "action_verbs_found", &[]),
        certifications_found: count(raw, "certifications_found", &[]),
        sections_found: count(raw, "sections_found", &[]),
        experience_years: count(raw, "experience_years", &[]),
        has_bullets: boolean(raw, "has_bullets", &[]),
        has_dates: boolean(raw, "has_dates", &[]),
        has_email: boolean(raw, "has_email", &[]),
        has_phone: boolean(raw, "has_phone", &[]),
        has_linkedin: boolean(raw, "has_linkedin", &[]),
    }
}

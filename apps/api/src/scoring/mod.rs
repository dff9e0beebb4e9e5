//! Scoring engine: canonical record -> `ScoreBreakdown`.
//!
//! Pure and deterministic. Every platform has a fixed set of weighted
//! sub-metrics in [0,100] plus an ordered list of highlight rules.

pub mod codechef;
pub mod common;
pub mod devpost;
pub mod devto;
pub mod geeksforgeeks;
pub mod github;
pub mod hackerrank;
pub mod highlights;
pub mod leetcode;
pub mod linkedin;
pub mod resume;

use crate::models::canonical::CanonicalRecord;
use crate::models::score::ScoreBreakdown;

pub fn score(record: &CanonicalRecord) -> ScoreBreakdown {
    match record {
        CanonicalRecord::Github(r) => github::score(r),
        CanonicalRecord::Leetcode(r) => leetcode::score(r),
        CanonicalRecord::Geeksforgeeks(r) => geeksforgeeks::score(r),
        CanonicalRecord::Codechef(r) => codechef::score(r),
        CanonicalRecord::Hackerrank(r) => hackerrank::score(r),
        CanonicalRecord::Devpost(r) => devpost::score(r),
        CanonicalRecord::Devto(r) => devto::score(r),
        CanonicalRecord::Linkedin(r) => linkedin::score(r),
        CanonicalRecord::Resume(r) => resume::score(r),
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every source the service knows how to score.
///
/// `Resume` has no extraction adapter: its raw record is built locally from
/// uploaded text (see `resume::resume_raw_record`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Github,
    Leetcode,
    Geeksforgeeks,
    Codechef,
    Hackerrank,
    Devpost,
    Devto,
    Linkedin,
    Resume,
}

impl Platform {
    /// Platforms fetched through an extraction adapter, in display order.
    pub const FETCHABLE: [Platform; 8] = [
        Platform::Github,
        Platform::Leetcode,
        Platform::Geeksforgeeks,
        Platform::Codechef,
        Platform::Hackerrank,
        Platform::Devpost,
        Platform::Devto,
        Platform::Linkedin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Github => "github",
            Platform::Leetcode => "leetcode",
            Platform::Geeksforgeeks => "geeksforgeeks",
            Platform::Codechef => "codechef",
            Platform::Hackerrank => "hackerrank",
            Platform::Devpost => "devpost",
            Platform::Devto => "devto",
            Platform::Linkedin => "linkedin",
            Platform::Resume => "resume",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Github => "GitHub",
            Platform::Leetcode => "LeetCode",
            Platform::Geeksforgeeks => "GeeksforGeeks",
            Platform::Codechef => "CodeChef",
            Platform::Hackerrank => "HackerRank",
            Platform::Devpost => "DevPost",
            Platform::Devto => "Dev.to",
            Platform::Linkedin => "LinkedIn",
            Platform::Resume => "Resume",
        }
    }

    /// Lowercase names a user might type when referring to this platform.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Platform::Github => &["github", "git hub"],
            Platform::Leetcode => &["leetcode", "leet code"],
            Platform::Geeksforgeeks => &["geeksforgeeks", "geeks for geeks", "gfg"],
            Platform::Codechef => &["codechef", "code chef"],
            Platform::Hackerrank => &["hackerrank", "hacker rank"],
            Platform::Devpost => &["devpost", "dev post"],
            Platform::Devto => &["dev.to", "devto", "dev to"],
            Platform::Linkedin => &["linkedin", "linked in"],
            Platform::Resume => &["resume", "résumé", "cv"],
        }
    }

    /// True when the identifier is a profile URL or slug rather than a username.
    pub fn takes_profile_url(&self) -> bool {
        matches!(self, Platform::Linkedin)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Platform::FETCHABLE
            .iter()
            .chain(std::iter::once(&Platform::Resume))
            .find(|p| p.as_str() == lowered)
            .copied()
            .ok_or_else(|| format!("Unknown platform: {s}"))
    }
}

/// A resolved `(platform, identifier)` pair handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub platform: Platform,
    pub identifier: String,
}

impl Credential {
    pub fn new(platform: Platform, identifier: impl Into<String>) -> Self {
        Self {
            platform,
            identifier: identifier.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trips_through_from_str() {
        for platform in Platform::FETCHABLE {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
        assert_eq!("Resume".parse::<Platform>().unwrap(), Platform::Resume);
    }

    #[test]
    fn test_unknown_platform_is_rejected() {
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_serializes_lowercase() {
        let json = serde_json::to_string(&Platform::Geeksforgeeks).unwrap();
        assert_eq!(json, "\"geeksforgeeks\"");
    }

    #[test]
    fn test_only_linkedin_takes_profile_url() {
        assert!(Platform::Linkedin.takes_profile_url());
        assert!(!Platform::Github.takes_profile_url());
    }
}

use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::error::ValidationError;
use crate::models::platform::Platform;

pub const MAX_IDENTIFIER_LEN: usize = 100;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("static regex must compile"));
static LINKEDIN_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_%\-]+$").expect("static regex must compile"));

/// Checks an identifier's shape and returns the form the adapter should use.
///
/// For LinkedIn a full profile URL is reduced to its `/in/<slug>` part.
pub fn validate_identifier(platform: Platform, raw: &str) -> Result<String, ValidationError> {
    let identifier = raw.trim();

    if identifier.is_empty() {
        return Err(ValidationError::Empty { platform });
    }
    if identifier.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            platform,
            max: MAX_IDENTIFIER_LEN,
        });
    }
    if identifier
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(invalid(platform, identifier));
    }

    if platform.takes_profile_url() {
        let slug = linkedin_slug(identifier);
        if slug.is_empty() || !LINKEDIN_SLUG_RE.is_match(slug) {
            return Err(invalid(platform, identifier));
        }
        return Ok(slug.to_string());
    }

    // `.` and `..` would resolve to a parent path in the profile URL.
    if !USERNAME_RE.is_match(identifier) || identifier.chars().all(|c| c == '.') {
        return Err(invalid(platform, identifier));
    }
    Ok(identifier.to_string())
}

/// `https://www.linkedin.com/in/jane-doe/?x=1` -> `jane-doe`. A bare slug is returned as is.
fn linkedin_slug(identifier: &str) -> &str {
    match identifier.find("/in/") {
        Some(idx) => {
            let rest = &identifier[idx + 4..];
            let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
            &rest[..end]
        }
        None => identifier,
    }
}

fn invalid(platform: Platform, identifier: &str) -> ValidationError {
    ValidationError::InvalidCharacters {
        platform,
        identifier: identifier.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_is_trimmed() {
        assert_eq!(
            validate_identifier(Platform::Github, "  octocat ").unwrap(),
            "octocat"
        );
    }

    #[test]
    fn test_empty_identifier_rejected() {
        assert_eq!(
            validate_identifier(Platform::Leetcode, "   "),
            Err(ValidationError::Empty {
                platform: Platform::Leetcode
            })
        );
    }

    #[test]
    fn test_overlong_identifier_rejected() {
        let long = "a".repeat(MAX_IDENTIFIER_LEN + 1);
        assert!(matches!(
            validate_identifier(Platform::Devto, &long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_inner_whitespace_and_slashes_rejected() {
        assert!(validate_identifier(Platform::Github, "octo cat").is_err());
        assert!(validate_identifier(Platform::Codechef, "../etc/passwd").is_err());
        assert!(validate_identifier(Platform::Hackerrank, "a\u{0007}b").is_err());
    }

    #[test]
    fn test_dot_only_identifiers_rejected() {
        for identifier in [".", "..", "..."] {
            assert!(
                matches!(
                    validate_identifier(Platform::Codechef, identifier),
                    Err(ValidationError::InvalidCharacters { .. })
                ),
                "{identifier}"
            );
        }
        assert_eq!(
            validate_identifier(Platform::Github, "jane.doe").unwrap(),
            "jane.doe"
        );
    }

    #[test]
    fn test_linkedin_url_reduced_to_slug() {
        assert_eq!(
            validate_identifier(
                Platform::Linkedin,
                "https://www.linkedin.com/in/jane-doe-42/?originalSubdomain=in"
            )
            .unwrap(),
            "jane-doe-42"
        );
        assert_eq!(
            validate_identifier(Platform::Linkedin, "jane-doe").unwrap(),
            "jane-doe"
        );
    }

    #[test]
    fn test_linkedin_url_without_slug_rejected() {
        assert!(validate_identifier(Platform::Linkedin, "https://www.linkedin.com/in/").is_err());
    }
}

use crate::models::platform::Platform;

pub const MAX_HIGHLIGHTS: usize = 5;

/// Condition -> text pair evaluated against a canonical record.
pub struct HighlightRule<R> {
    pub when: fn(&R) -> bool,
    pub text: fn(&R) -> String,
}

/// Keeps the first `MAX_HIGHLIGHTS` rules that fire, in rule order.
/// Falls back to a single "Active on <Platform>" line when none do.
pub fn collect<R>(platform: Platform, record: &R, rules: &[HighlightRule<R>]) -> Vec<String> {
    let highlights: Vec<String> = rules
        .iter()
        .filter(|rule| (rule.when)(record))
        .take(MAX_HIGHLIGHTS)
        .map(|rule| (rule.text)(record))
        .collect();

    if highlights.is_empty() {
        vec![format!("Active on {}", platform.display_name())]
    } else {
        highlights
    }
}

/// `1234567` -> `1,234,567`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_highlight_when_nothing_fires() {
        let rules: [HighlightRule<u64>; 1] = [HighlightRule {
            when: |n| *n > 10,
            text: |n| format!("{n} things"),
        }];
        assert_eq!(collect(Platform::Devto, &3, &rules), vec!["Active on Dev.to"]);
        assert_eq!(collect(Platform::Devto, &30, &rules), vec!["30 things"]);
    }

    #[test]
    fn test_highlights_capped_at_five() {
        let rules: Vec<HighlightRule<u64>> = (0..8)
            .map(|_| HighlightRule {
                when: |_| true,
                text: |_| "x".to_string(),
            })
            .collect();
        assert_eq!(collect(Platform::Github, &1, &rules).len(), MAX_HIGHLIGHTS);
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_240_776), "1,240,776");
    }
}

//! Ordered pattern rules applied to a rendered document.
//!
//! Each field is tried independently. The first pattern yielding an acceptable
//! value wins; a field with no acceptable match is left out of the record.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Capture group 1 parsed as a count (`1,234`, `1.2K`, `3M`, `50+`).
    Count,
    /// Capture group 1 with tags stripped and whitespace collapsed.
    Text { max_len: usize },
    /// Number of matches of the pattern, capped.
    Occurrences { cap: u64 },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    pub patterns: &'static [&'static str],
    /// Counts below this are treated as noise and skipped.
    pub min: u64,
}

impl FieldRule {
    pub const fn count(field: &'static str, patterns: &'static [&'static str]) -> Self {
        Self {
            field,
            kind: FieldKind::Count,
            patterns,
            min: 0,
        }
    }

    pub const fn text(
        field: &'static str,
        max_len: usize,
        patterns: &'static [&'static str],
    ) -> Self {
        Self {
            field,
            kind: FieldKind::Text { max_len },
            patterns,
            min: 0,
        }
    }

    pub const fn occurrences(
        field: &'static str,
        cap: u64,
        patterns: &'static [&'static str],
    ) -> Self {
        Self {
            field,
            kind: FieldKind::Occurrences { cap },
            patterns,
            min: 0,
        }
    }

    pub const fn at_least(mut self, min: u64) -> Self {
        self.min = min;
        self
    }
}

#[derive(Debug, Clone)]
pub struct CompiledRule {
    field: &'static str,
    kind: FieldKind,
    patterns: Vec<Regex>,
    min: u64,
}

impl CompiledRule {
    pub fn compile(rule: &FieldRule) -> Result<Self, regex::Error> {
        let patterns = rule
            .patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            field: rule.field,
            kind: rule.kind,
            patterns,
            min: rule.min,
        })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    fn extract(&self, html: &str) -> Option<Value> {
        match self.kind {
            FieldKind::Count => self.patterns.iter().find_map(|re| {
                re.captures_iter(html)
                    .filter_map(|caps| caps.get(1).and_then(|m| parse_count(m.as_str())))
                    .find(|n| *n >= self.min)
                    .map(Value::from)
            }),
            FieldKind::Text { max_len } => self.patterns.iter().find_map(|re| {
                re.captures_iter(html)
                    .filter_map(|caps| caps.get(1).map(|m| clean_text(m.as_str(), max_len)))
                    .find(|s| !s.is_empty())
                    .map(Value::from)
            }),
            FieldKind::Occurrences { cap } => self.patterns.iter().find_map(|re| {
                let found = re.find_iter(html).count() as u64;
                (found > 0 && found >= self.min).then(|| Value::from(found.min(cap)))
            }),
        }
    }
}

pub fn compile_rules(rules: &[FieldRule]) -> Result<Vec<CompiledRule>, regex::Error> {
    rules.iter().map(CompiledRule::compile).collect()
}

/// Runs every rule over the document. Missing fields are simply absent.
pub fn extract_fields(rules: &[CompiledRule], html: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    for rule in rules {
        if let Some(value) = rule.extract(html) {
            fields.insert(rule.field.to_string(), value);
        }
    }
    fields
}

/// Parses human-formatted counts: `1,234` -> 1234, `1.2K` -> 1200, `3M` -> 3000000, `500+` -> 500.
pub fn parse_count(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('+')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    let (number, multiplier) = match cleaned.chars().last()? {
        'k' | 'K' => (&cleaned[..cleaned.len() - 1], 1_000.0),
        'm' | 'M' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };

    let value: f64 = number.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * multiplier).round() as u64)
}

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex must compile"));
static WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex must compile"));

fn clean_text(raw: &str, max_len: usize) -> String {
    let without_tags = TAG_RE.replace_all(raw, " ");
    let decoded = without_tags
        .replace("&amp;", "&")
        .replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    let collapsed = WS_RE.replace_all(&decoded, " ");
    collapsed.trim().chars().take(max_len).collect()
}

//! Tolerant field readers. Each takes the canonical snake_case key, also tries
//! its camelCase spelling, then any platform-specific aliases, in that order.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::extraction::patterns::parse_count;
use crate::extraction::raw::RawRecord;

/// Strings adapters have historically used to mean "no value".
const PLACEHOLDER_TEXT: &[&str] = &["not available", "n/a", "na", "none", "null", "-"];

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn lookup<'a>(raw: &'a RawRecord, key: &str, aliases: &[&str]) -> Option<&'a Value> {
    if let Some(v) = raw.get(key).filter(|v| !v.is_null()) {
        return Some(v);
    }
    let camel = camel_case(key);
    if let Some(v) = raw.get(&camel).filter(|v| !v.is_null()) {
        return Some(v);
    }
    aliases
        .iter()
        .find_map(|alias| raw.get(alias).filter(|v| !v.is_null()))
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => parse_count(s),
        Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (f.is_finite() && f >= 0.0).then_some(f)
}

/// Non-negative integer; 0 when missing or unreadable.
pub fn count(raw: &RawRecord, key: &str, aliases: &[&str]) -> u64 {
    lookup(raw, key, aliases).and_then(as_count).unwrap_or(0)
}

/// Non-negative finite float; 0.0 when missing or unreadable.
pub fn float(raw: &RawRecord, key: &str, aliases: &[&str]) -> f64 {
    lookup(raw, key, aliases).and_then(as_float).unwrap_or(0.0)
}

pub fn text(raw: &RawRecord, key: &str, aliases: &[&str]) -> String {
    match lookup(raw, key, aliases) {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if PLACEHOLDER_TEXT.contains(&trimmed.to_lowercase().as_str()) {
                String::new()
            } else {
                trimmed.to_string()
            }
        }
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Array of strings, or a comma-separated string. Blank entries are dropped.
pub fn list(raw: &RawRecord, key: &str, aliases: &[&str]) -> Vec<String> {
    let items: Vec<String> = match lookup(raw, key, aliases) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Object(o) => o
                    .get("name")
                    .and_then(|n| n.as_str())
                    .map(|s| s.trim().to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(joined)) => joined.split(',').map(|s| s.trim().to_string()).collect(),
        _ => Vec::new(),
    };
    items.into_iter().filter(|s| !s.is_empty()).collect()
}

pub fn boolean(raw: &RawRecord, key: &str, aliases: &[&str]) -> bool {
    match lookup(raw, key, aliases) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

/// Object of name -> count. Non-numeric entries are dropped.
pub fn count_map(raw: &RawRecord, key: &str, aliases: &[&str]) -> BTreeMap<String, u64> {
    match lookup(raw, key, aliases) {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(k, v)| as_count(v).map(|n| (k.clone(), n)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

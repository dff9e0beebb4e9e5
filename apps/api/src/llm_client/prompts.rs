// Shared prompt fragments. Each module that calls the LLM keeps its own
// prompts.rs alongside it and pulls cross-cutting pieces from here.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that carries profile data.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Base every statement on the profile data provided above. \
    Quote the actual numbers when you refer to them. \
    Do NOT invent statistics, achievements or rankings that are not in the data. \
    If the data does not support a claim, omit it.";

/// Renders `(label, value)` pairs as one `- label: value` line each.
pub fn render_fields<'a>(fields: impl IntoIterator<Item = (&'a str, String)>) -> String {
    fields
        .into_iter()
        .map(|(label, value)| format!("- {label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitutes `{key}` placeholders in one pass over `template`.
///
/// Substituted values are never rescanned, so user text containing `{key}`
/// stays literal. Braces that do not name a key are copied as is.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let matched = values
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match matched {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

//! Best-effort recovery of JSON from chat-model answers.
//!
//! Models wrap JSON in Markdown fences, add prose around it, or leave
//! trailing commas. These helpers peel that away before `serde_json` sees it.

use anyhow::{Context, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

/// Parse a model answer as `T`, tolerating fences, surrounding prose and
/// trailing commas.
pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T> {
    let stripped = strip_code_fences(content);
    if let Ok(value) = serde_json::from_str::<T>(stripped) {
        return Ok(value);
    }

    let candidate = extract_json(stripped).unwrap_or(stripped);
    let repaired = remove_trailing_commas(candidate);
    serde_json::from_str(&repaired)
        .with_context(|| format!("Model answer is not valid JSON: {}", preview(content)))
}

/// Remove a surrounding ```json ... ``` block if present.
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the language tag on the opening fence line
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}

/// The outermost JSON array or object in `content`, whichever starts first.
pub fn extract_json(content: &str) -> Option<&str> {
    let start = content.find(['[', '{'])?;
    let close = if content[start..].starts_with('[') { ']' } else { '}' };
    let end = content.rfind(close)?;
    (end > start).then(|| &content[start..=end])
}

/// Drop commas that directly precede a closing bracket or brace.
pub fn remove_trailing_commas(content: &str) -> String {
    static TRAILING: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING.get_or_init(|| Regex::new(r",\s*([\]}])").expect("static regex"));
    re.replace_all(content, "$1").into_owned()
}

fn preview(content: &str) -> String {
    const MAX: usize = 200;
    if content.len() <= MAX {
        return content.to_string();
    }
    let mut end = MAX;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &content[..end])
}

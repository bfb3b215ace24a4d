// ABOUTME: Deployment argument templating: ${NAME} substitution and JSON decoding.
// ABOUTME: Unresolved placeholders are kept verbatim; \$ escapes a literal dollar.

use indexmap::IndexMap;
use serde_json::error::Category;
use std::collections::HashMap;
use thiserror::Error;

/// Deployment arguments in the order they were written.
pub type Arguments = IndexMap<String, String>;

#[derive(Debug, Error)]
pub enum ArgumentsError {
    #[error("deserialization error: JSON keys and values must be strings")]
    NotStringMap(#[source] serde_json::Error),

    #[error("error parsing JSON arguments")]
    InvalidJson(#[source] serde_json::Error),
}

/// Replace `${NAME}` placeholders with values from `env`.
///
/// A placeholder is `${`, zero or more word characters, `}`, and at most one
/// trailing whitespace character, not preceded by a backslash. A known name
/// replaces the whole placeholder including the trailing whitespace. Unknown
/// names are left untouched. Every `\$` in the result is then turned into `$`.
pub fn substitute(template: &str, env: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = template[pos..].find("${") {
        let start = pos + offset;
        if start > 0 && template.as_bytes()[start - 1] == b'\\' {
            pos = start + 1;
            continue;
        }

        let Some((name, end)) = match_placeholder(template, start) else {
            pos = start + 1;
            continue;
        };

        if let Some(value) = env.get(name) {
            out.push_str(&template[copied..start]);
            out.push_str(value);
            copied = end;
        }
        pos = end;
    }
    out.push_str(&template[copied..]);

    out.replace("\\$", "$")
}

/// Match a placeholder starting at `start` (which points at `${`).
/// Returns the captured name and the byte offset just past the match.
fn match_placeholder(template: &str, start: usize) -> Option<(&str, usize)> {
    let name_start = start + 2;
    let rest = &template[name_start..];
    let name_len = rest
        .find(|c: char| !is_word_char(c))
        .unwrap_or(rest.len());

    if !rest[name_len..].starts_with('}') {
        return None;
    }

    let mut end = name_start + name_len + 1;
    if let Some(c) = template[end..].chars().next()
        && is_whitespace(c)
    {
        end += c.len_utf8();
    }

    Some((&template[name_start..name_start + name_len], end))
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Decode a JSON object of string keys to string values.
pub fn parse_arguments(json: &str) -> Result<Arguments, ArgumentsError> {
    serde_json::from_str(json).map_err(|e| match e.classify() {
        Category::Data => ArgumentsError::NotStringMap(e),
        _ => ArgumentsError::InvalidJson(e),
    })
}

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::literal::parse_literal;
use crate::error::{ChatlabError, Result};
use crate::models::Session;

/// A decoding strategy: raw text to a JSON value, or a reason it failed
type Strategy = fn(&str) -> std::result::Result<Value, String>;

/// Tried in order; the first success wins
const STRATEGIES: &[(&str, Strategy)] = &[
    ("strict-json", decode_strict),
    ("relaxed-literal", decode_relaxed),
    ("repaired-literal", decode_repaired),
];

fn trailing_comma_re() -> &'static Regex {
    static TRAILING_COMMA_RE: OnceLock<Regex> = OnceLock::new();
    TRAILING_COMMA_RE
        .get_or_init(|| Regex::new(r",(\s*[}\]])").expect("valid trailing comma regex"))
}

fn decode_strict(text: &str) -> std::result::Result<Value, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}

fn decode_relaxed(text: &str) -> std::result::Result<Value, String> {
    parse_literal(text).map_err(|e| e.to_string())
}

/// Strip trailing commas before closing brackets and braces, then read as a literal
fn decode_repaired(text: &str) -> std::result::Result<Value, String> {
    let repaired = trailing_comma_re().replace_all(text, "$1");
    parse_literal(&repaired).map_err(|e| e.to_string())
}

/// Decode a document with the strategy chain, collecting every failure reason
pub fn decode_document(text: &str) -> Result<Value> {
    let text = strip_bom(text).trim();
    let mut failures = Vec::new();

    for (name, strategy) in STRATEGIES {
        match strategy(text) {
            Ok(value) => {
                debug!(strategy = *name, "decoded document");
                return Ok(value);
            }
            Err(reason) => {
                debug!(strategy = *name, %reason, "strategy failed");
                failures.push(format!("{}: {}", name, reason));
            }
        }
    }

    Err(ChatlabError::format("json", strategy_names(), failures.join("; ")))
}

pub(crate) fn strategy_names() -> Vec<&'static str> {
    STRATEGIES.iter().map(|(name, _)| *name).collect()
}

/// Build a session from a decoded canonical document
pub fn session_from_value(value: Value) -> Result<Session> {
    if !value.is_object() {
        return Err(ChatlabError::format(
            "json",
            vec!["canonical-schema"],
            "top-level value is not an object",
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| ChatlabError::format("json", vec!["canonical-schema"], e.to_string()))
}

/// Parse a canonical document given as strict JSON or the relaxed literal dialect
pub fn parse_json_str(text: &str) -> Result<Session> {
    session_from_value(decode_document(text)?)
}

/// Parse a canonical document file. Read failures propagate unchanged.
pub fn parse_json_file(path: &Path) -> Result<Session> {
    let text = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "read JSON document");
    parse_json_str(&text)
}

pub(crate) fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

use std::path::Path;

use tracing::debug;

use super::json::{parse_json_file, parse_json_str, strategy_names};
use super::jsonl::{TYPE_KEY, parse_jsonl_file, parse_jsonl_str};
use crate::error::{ChatlabError, Result};
use crate::models::Session;

/// Pick a parser from the file extension: `.jsonl` reads as JSON Lines, anything else as JSON
pub fn parse_auto_path(path: &Path) -> Result<Session> {
    let is_jsonl = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"));

    if is_jsonl { parse_jsonl_file(path) } else { parse_json_file(path) }
}

fn looks_like_jsonl(text: &str) -> bool {
    text.contains('\n') && text.contains(&format!("\"{}\"", TYPE_KEY))
}

/// Sniff raw text.
///
/// Multi-line text mentioning `"_type"` is tried as JSON Lines first; everything else, and
/// anything JSON Lines rejects, goes through the JSON document chain.
pub fn parse_auto_str(text: &str) -> Result<Session> {
    let mut reasons = Vec::new();

    if looks_like_jsonl(text) {
        match parse_jsonl_str(text) {
            Ok(session) => return Ok(session),
            Err(e) => {
                debug!(error = %e, "JSON Lines sniff failed, falling back to JSON");
                reasons.push(e.to_string());
            }
        }
    }

    match parse_json_str(text) {
        Ok(session) => Ok(session),
        Err(e) if reasons.is_empty() => Err(e),
        Err(e) => {
            reasons.push(e.to_string());
            let mut strategies = vec!["json-lines"];
            strategies.extend(strategy_names());
            Err(ChatlabError::format("auto", strategies, reasons.join("; ")))
        }
    }
}

//! Serializers from a [`Session`](crate::models::Session) back to the supported formats
//!
//! - [`json`] - the canonical document, pretty or compact, optionally ASCII-only
//! - [`jsonl`] - one `header` record, then `member` and `message` records
//! - [`csv`] - a flat six-column table of messages

pub mod csv;
pub mod json;
pub mod jsonl;

pub use csv::{CSV_HEADER, CsvExportOptions, write_csv, write_csv_to};
pub use json::{JsonExportOptions, to_json_string, write_json};
pub use jsonl::{jsonl_lines, to_jsonl_string, write_jsonl};

use std::fs;
use std::path::Path;

/// Create the parent directory of an output path if it is missing
pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use super::ensure_parent_dir;
use crate::error::Result;
use crate::models::Session;

/// Layout of the exported JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonExportOptions {
    /// Spaces per nesting level; `None` writes a single compact line
    pub indent: Option<usize>,
    /// Escape every non-ASCII character as `\uXXXX`
    pub ensure_ascii: bool,
}

impl Default for JsonExportOptions {
    fn default() -> Self {
        Self { indent: Some(2), ensure_ascii: false }
    }
}

impl JsonExportOptions {
    pub fn compact() -> Self {
        Self { indent: None, ..Self::default() }
    }
}

pub fn to_json_string(session: &Session, options: &JsonExportOptions) -> Result<String> {
    let json = match options.indent {
        None => serde_json::to_string(session)?,
        Some(width) => {
            let indent = " ".repeat(width);
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = Serializer::with_formatter(&mut buf, formatter);
            session.serialize(&mut serializer)?;
            String::from_utf8_lossy(&buf).into_owned()
        }
    };

    Ok(if options.ensure_ascii { escape_non_ascii(&json) } else { json })
}

/// Write the document, creating missing parent directories
pub fn write_json(session: &Session, path: &Path, options: &JsonExportOptions) -> Result<()> {
    let json = to_json_string(session, options)?;
    ensure_parent_dir(path)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), messages = session.message_count(), "wrote JSON export");
    Ok(())
}

/// Non-ASCII text only occurs inside string literals of serializer output, so escaping
/// each UTF-16 unit keeps the document valid.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for ch in json.chars() {
        if ch.is_ascii() {
            out.push(ch);
            continue;
        }
        for unit in ch.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{:04x}", unit));
        }
    }
    out
}

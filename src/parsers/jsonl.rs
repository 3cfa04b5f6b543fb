use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::json::strip_bom;
use crate::error::{ChatlabError, Result};
use crate::models::{Member, Message, Session, SessionMeta, VersionInfo};

/// Discriminator key carried by every JSON Lines record
pub const TYPE_KEY: &str = "_type";

/// Payload of the `header` record
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HeaderLine {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    chatlab: VersionInfo,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    meta: SessionMeta,
}

/// Collects header, member and message records line by line
#[derive(Debug, Default)]
struct JsonlAssembler {
    header: Option<HeaderLine>,
    members: Vec<Member>,
    messages: Vec<Message>,
    skipped: usize,
}

impl JsonlAssembler {
    fn push_line(&mut self, line_num: usize, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let value = match serde_json::from_str::<Value>(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(line = line_num + 1, error = %e, "skipping malformed JSON Lines record");
                self.skipped += 1;
                return;
            }
        };

        let kind = value.get(TYPE_KEY).and_then(Value::as_str).map(str::to_owned);
        match kind.as_deref() {
            Some("header") => match serde_json::from_value::<HeaderLine>(value) {
                Ok(header) => {
                    if self.header.replace(header).is_some() {
                        warn!(line = line_num + 1, "repeated header record replaces earlier one");
                    }
                }
                Err(e) => self.skip(line_num, "header", e),
            },
            Some("member") => match serde_json::from_value::<Member>(value) {
                Ok(member) => self.members.push(member),
                Err(e) => self.skip(line_num, "member", e),
            },
            Some("message") => match serde_json::from_value::<Message>(value) {
                Ok(message) => self.messages.push(message),
                Err(e) => self.skip(line_num, "message", e),
            },
            other => {
                // Silently skip records this schema doesn't know about
                debug!(line = line_num + 1, kind = ?other, "ignoring untyped record");
            }
        }
    }

    fn skip(&mut self, line_num: usize, kind: &str, error: serde_json::Error) {
        warn!(line = line_num + 1, kind, error = %error, "skipping undecodable record");
        self.skipped += 1;
    }

    fn finish(self) -> Result<Session> {
        let header = self.header.ok_or_else(|| {
            ChatlabError::format("jsonl", vec!["json-lines"], "missing header record")
        })?;

        if self.skipped > 0 {
            warn!(
                members = self.members.len(),
                messages = self.messages.len(),
                skipped = self.skipped,
                "parsed JSON Lines input with skipped records"
            );
        }

        Ok(Session::new(header.chatlab, header.meta, self.members, self.messages))
    }
}

/// Parse JSON Lines text.
///
/// Malformed lines are skipped; a missing `header` record is fatal. When several
/// `header` records appear, the last decodable one is used.
pub fn parse_jsonl_str(text: &str) -> Result<Session> {
    let mut assembler = JsonlAssembler::default();
    for (line_num, line) in strip_bom(text).lines().enumerate() {
        assembler.push_line(line_num, line);
    }
    assembler.finish()
}

/// Parse a JSON Lines file, reading one line at a time
pub fn parse_jsonl_file(path: &Path) -> Result<Session> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut assembler = JsonlAssembler::default();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line = if line_num == 0 { strip_bom(&line).to_string() } else { line };
        assembler.push_line(line_num, &line);
    }

    debug!(path = %path.display(), "read JSON Lines document");
    assembler.finish()
}

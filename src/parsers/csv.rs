//! CSV import with header-based column inference.
//!
//! Exports from different tools name their columns differently (`time`,
//! `时间`, `Timestamp`, ...). Each logical field has an ordered alias list;
//! the first alias present in the header row (case-insensitive) wins.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::json::strip_bom;
use crate::error::{ChatlabError, Result};
use crate::models::{ChatType, Member, Message, Session, SessionMeta, VersionInfo};
use crate::utils::time::{now_epoch_seconds, parse_timestamp};

pub const CSV_GENERATOR: &str = "chatlab-csv-parser";

/// Logical columns read from a CSV export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvField {
    Time,
    Sender,
    Content,
    DisplayName,
    Type,
}

impl CsvField {
    /// The field's own column name, first in its alias list
    pub fn name(self) -> &'static str {
        match self {
            CsvField::Time => "time",
            CsvField::Sender => "sender",
            CsvField::Content => "content",
            CsvField::DisplayName => "name",
            CsvField::Type => "type",
        }
    }
}

/// Known header aliases per field, in priority order (lowercase)
pub const COLUMN_ALIASES: &[(CsvField, &[&str])] = &[
    (CsvField::Time, &["time", "timestamp", "日期", "时间"]),
    (CsvField::Sender, &["sender", "sender_id", "发送者", "用户", "from"]),
    (CsvField::Content, &["content", "message", "内容", "消息"]),
    (CsvField::DisplayName, &["name", "account_name", "昵称", "sendername"]),
    (CsvField::Type, &["type", "msg_type", "类型"]),
];

/// Session-level values a CSV export cannot carry itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub platform: String,
    pub chat_name: String,
    pub chat_type: ChatType,
    pub owner_id: String,
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            platform: "unknown".to_string(),
            chat_name: "Unknown".to_string(),
            chat_type: ChatType::Private,
            owner_id: String::new(),
            delimiter: b',',
        }
    }
}

/// Resolved header positions for each logical field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub time: Option<usize>,
    pub sender: Option<usize>,
    pub content: Option<usize>,
    pub display_name: Option<usize>,
    pub msg_type: Option<usize>,
}

impl ColumnMap {
    /// Resolve each field to the first of its aliases present in `headers`.
    ///
    /// Every alias list starts with the field's own name, so a column literally
    /// called `time`, `sender`, ... is always found.
    pub fn detect<'h>(headers: impl IntoIterator<Item = &'h str>) -> Self {
        let lowered: Vec<String> =
            headers.into_iter().map(|h| h.trim().to_lowercase()).collect();

        let resolve = |field: CsvField| -> Option<usize> {
            let aliases = COLUMN_ALIASES
                .iter()
                .find(|(f, _)| *f == field)
                .map(|(_, aliases)| *aliases)
                .unwrap_or(&[]);
            aliases.iter().find_map(|alias| lowered.iter().position(|h| h == alias))
        };

        Self {
            time: resolve(CsvField::Time),
            sender: resolve(CsvField::Sender),
            content: resolve(CsvField::Content),
            display_name: resolve(CsvField::DisplayName),
            msg_type: resolve(CsvField::Type),
        }
    }
}

/// Parse CSV text into a session.
///
/// Fails only when there are no data rows. Unreadable timestamps fall back to
/// the zero-based row index and unreadable type codes to 0 (text).
pub fn parse_csv_str(text: &str, options: &CsvOptions) -> Result<Session> {
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(strip_bom(text).as_bytes());

    let columns = match reader.headers() {
        Ok(headers) => ColumnMap::detect(headers.iter()),
        Err(e) => return Err(ChatlabError::format("csv", vec!["csv"], e.to_string())),
    };
    debug!(?columns, "detected CSV columns");

    let mut messages = Vec::new();
    let mut members = Vec::new();
    let mut seen_senders = HashSet::new();
    let mut time_fallbacks = 0usize;

    for (idx, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(row = idx, error = %e, "skipping unreadable CSV row");
                continue;
            }
        };
        let cell = |column: Option<usize>| column.and_then(|i| record.get(i));

        let timestamp = match cell(columns.time).and_then(parse_timestamp) {
            Some(ts) => ts,
            None => {
                time_fallbacks += 1;
                idx as i64
            }
        };
        let sender = cell(columns.sender).unwrap_or_default().to_string();
        let account_name = match columns.display_name {
            Some(_) => cell(columns.display_name).unwrap_or_default().to_string(),
            None => sender.clone(),
        };
        let content = cell(columns.content).unwrap_or_default().to_string();
        let msg_type = cell(columns.msg_type).map(parse_type_code).unwrap_or(0);

        if seen_senders.insert(sender.clone()) {
            members.push(Member::new(sender.clone(), account_name.clone()));
        }

        messages.push(Message {
            sender,
            account_name,
            timestamp,
            msg_type,
            content,
            platform_message_id: format!("csv_{}", idx),
            reply_to: None,
        });
    }

    if messages.is_empty() {
        return Err(ChatlabError::format("csv", vec!["csv"], "empty input"));
    }
    if time_fallbacks > 0 {
        warn!(rows = time_fallbacks, "unparseable CSV timestamps replaced by row index");
    }

    let meta = SessionMeta {
        name: options.chat_name.clone(),
        platform: options.platform.clone(),
        chat_type: options.chat_type.clone(),
        owner_id: options.owner_id.clone(),
        avatar: None,
        description: None,
    };

    Ok(Session::new(VersionInfo::new(now_epoch_seconds(), CSV_GENERATOR), meta, members, messages))
}

/// Parse a CSV file. Read and UTF-8 decoding failures propagate unchanged.
pub fn parse_csv_file(path: &Path, options: &CsvOptions) -> Result<Session> {
    let text = fs::read_to_string(path)?;
    parse_csv_str(&text, options)
}

fn parse_type_code(raw: &str) -> i64 {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        .unwrap_or(0)
}

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use super::ensure_parent_dir;
use crate::error::Result;
use crate::models::Session;

/// Fixed column layout of CSV exports
pub const CSV_HEADER: [&str; 6] =
    ["timestamp", "datetime", "sender", "account_name", "type", "content"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvExportOptions {
    pub delimiter: u8,
}

impl Default for CsvExportOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Write one row per message in session order.
///
/// `datetime` is rendered in local time and `type` is the raw integer code.
pub fn write_csv_to<W: Write>(
    session: &Session,
    writer: W,
    options: &CsvExportOptions,
) -> Result<()> {
    let mut writer = ::csv::WriterBuilder::new().delimiter(options.delimiter).from_writer(writer);
    writer.write_record(CSV_HEADER)?;
    for message in session.messages() {
        writer.write_record([
            message.timestamp.to_string(),
            message.datetime_str(),
            message.sender.clone(),
            message.account_name.clone(),
            message.msg_type.to_string(),
            message.content.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a CSV file, creating missing parent directories
pub fn write_csv(session: &Session, path: &Path, options: &CsvExportOptions) -> Result<()> {
    ensure_parent_dir(path)?;
    write_csv_to(session, File::create(path)?, options)?;
    debug!(path = %path.display(), rows = session.message_count(), "wrote CSV export");
    Ok(())
}

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use super::ensure_parent_dir;
use crate::error::Result;
use crate::models::{Session, SessionMeta, VersionInfo};
use crate::parsers::jsonl::TYPE_KEY;

#[derive(Serialize)]
struct HeaderRecord<'a> {
    chatlab: &'a VersionInfo,
    meta: &'a SessionMeta,
}

/// A record flattened next to its `_type` discriminator
#[derive(Serialize)]
struct Tagged<'a, T: Serialize> {
    #[serde(rename = "_type")]
    kind: &'static str,
    #[serde(flatten)]
    record: &'a T,
}

fn tagged_line<T: Serialize>(kind: &'static str, record: &T) -> Result<String> {
    Ok(serde_json::to_string(&Tagged { kind, record })?)
}

/// Lazily render a session as JSON Lines: the header, every member, then every message
pub fn jsonl_lines(session: &Session) -> impl Iterator<Item = Result<String>> + '_ {
    let header = HeaderRecord { chatlab: session.version(), meta: session.meta() };
    std::iter::once(tagged_line("header", &header))
        .chain(session.members().iter().map(|member| tagged_line("member", member)))
        .chain(session.messages().iter().map(|message| tagged_line("message", message)))
}

/// Lines joined with `\n`, without a trailing newline
pub fn to_jsonl_string(session: &Session) -> Result<String> {
    let lines = jsonl_lines(session).collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

/// Stream records to a file, one per line, creating missing parent directories
pub fn write_jsonl(session: &Session, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    for line in jsonl_lines(session) {
        writeln!(writer, "{}", line?)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), key = TYPE_KEY, "wrote JSON Lines export");
    Ok(())
}

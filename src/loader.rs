//! Entry points that pick a parser or exporter from a format selector

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ChatlabError, Result};
use crate::exporters::{
    CsvExportOptions, JsonExportOptions, to_json_string, to_jsonl_string, write_csv, write_json,
    write_jsonl,
};
use crate::models::Session;
use crate::parsers::{
    CsvOptions, parse_auto_path, parse_auto_str, parse_csv_file, parse_csv_str, parse_json_file,
    parse_json_str, parse_jsonl_file, parse_jsonl_str,
};

/// Format selector for reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    #[default]
    Auto,
    Json,
    Jsonl,
    Csv,
}

/// Format selector for writing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Jsonl,
    Csv,
}

impl FromStr for InputFormat {
    type Err = ChatlabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(InputFormat::Auto),
            "json" => Ok(InputFormat::Json),
            "jsonl" => Ok(InputFormat::Jsonl),
            "csv" => Ok(InputFormat::Csv),
            _ => Err(ChatlabError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ChatlabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ChatlabError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputFormat::Auto => "auto",
            InputFormat::Json => "json",
            InputFormat::Jsonl => "jsonl",
            InputFormat::Csv => "csv",
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Csv => "csv",
        })
    }
}

/// Exporter settings used by [`save`] and [`saves`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    pub json: JsonExportOptions,
    pub csv: CsvExportOptions,
}

/// Load a session from a file. `csv` is only consulted for CSV input.
pub fn load(path: &Path, format: InputFormat, csv: &CsvOptions) -> Result<Session> {
    match format {
        InputFormat::Auto => parse_auto_path(path),
        InputFormat::Json => parse_json_file(path),
        InputFormat::Jsonl => parse_jsonl_file(path),
        InputFormat::Csv => parse_csv_file(path, csv),
    }
}

/// Load a session from text already in memory
pub fn loads(text: &str, format: InputFormat, csv: &CsvOptions) -> Result<Session> {
    match format {
        InputFormat::Auto => parse_auto_str(text),
        InputFormat::Json => parse_json_str(text),
        InputFormat::Jsonl => parse_jsonl_str(text),
        InputFormat::Csv => parse_csv_str(text, csv),
    }
}

/// Write a session to a file, creating missing parent directories
pub fn save(
    session: &Session,
    path: &Path,
    format: OutputFormat,
    options: &SaveOptions,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(session, path, &options.json),
        OutputFormat::Jsonl => write_jsonl(session, path),
        OutputFormat::Csv => write_csv(session, path, &options.csv),
    }
}

/// Serialize to a string. Only JSON and JSON Lines have a string form.
pub fn saves(session: &Session, format: OutputFormat, options: &SaveOptions) -> Result<String> {
    match format {
        OutputFormat::Json => to_json_string(session, &options.json),
        OutputFormat::Jsonl => to_jsonl_string(session),
        OutputFormat::Csv => Err(ChatlabError::UnsupportedFormat(format.to_string())),
    }
}

/// Whether the text parses with format auto-detection
pub fn validate(text: &str) -> bool {
    parse_auto_str(text).is_ok()
}

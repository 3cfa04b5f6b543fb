//! Importers for chat exports in JSON, JSON Lines and CSV
//!
//! # Error Handling Strategy
//!
//! Each format degrades differently:
//!
//! - **JSON documents** are all-or-nothing. The text is decoded with a chain of strategies
//!   (strict JSON, then a relaxed literal dialect, then the same dialect after stripping
//!   trailing commas). When every strategy fails the error names all of them.
//!
//! - **JSON Lines** degrade per line. Malformed or undecodable records are logged through
//!   `tracing` and skipped; only a missing `header` record is fatal.
//!
//! - **CSV** degrades per cell. Unreadable timestamps fall back to the row index and unreadable
//!   type codes to text; an input without data rows is fatal.
//!
//! I/O failures always propagate unchanged as [`ChatlabError::Io`](crate::error::ChatlabError).

pub mod auto;
pub mod csv;
pub mod deserializers;
pub mod json;
pub mod jsonl;
pub mod literal;

pub use auto::{parse_auto_path, parse_auto_str};
pub use csv::{CsvOptions, parse_csv_file, parse_csv_str};
pub use json::{parse_json_file, parse_json_str};
pub use jsonl::{parse_jsonl_file, parse_jsonl_str};

//! ChatLab - normalize, analyze and convert chat exports
//!
//! Chat exports arrive as strict JSON, as JSON written with single quotes and
//! `True`/`None` literals, as JSON Lines, or as CSV with tool-specific column names.
//! This library reads all of them into one canonical [`Session`] and offers:
//!
//! - Format auto-detection with ordered parser fallbacks
//! - Queries over messages: by sender, name, type, date prefix, keyword or id
//! - Statistics, per-day timelines and time-gap conversation threads
//! - A small filter language (`sender:u1 type:image date:2024-03`)
//! - Export back to JSON, JSON Lines or CSV
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use chatlab::{CsvOptions, InputFormat, load};
//!
//! let session = load(Path::new("chat.json"), InputFormat::Auto, &CsvOptions::default())?;
//! let stats = session.statistics();
//! println!("{} messages from {} senders", stats.total_messages, stats.unique_senders);
//!
//! for thread in session.conversation_threads(30.0) {
//!     println!("thread of {} messages", thread.len());
//! }
//! # Ok::<(), chatlab::ChatlabError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod exporters;
pub mod filters;
pub mod loader;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod query;
pub mod utils;

// Re-export commonly used types
pub use error::{ChatlabError, Result};
pub use exporters::{CsvExportOptions, JsonExportOptions};
pub use loader::{InputFormat, OutputFormat, SaveOptions, load, loads, save, saves, validate};
pub use models::{
    ChatType, Member, Message, MessageType, SPEC_VERSION, Session, SessionMeta, VersionInfo,
};
pub use parsers::CsvOptions;
pub use query::{DateRange, SenderStats, Statistics, split_messages_by_time};

//! Read-only queries over a constructed [`Session`](crate::models::Session)
//!
//! Everything here borrows the session and returns views into it. Results keep the
//! session's timestamp order and never modify it.

pub mod select;
pub mod stats;
pub mod threads;

pub use stats::{DateRange, SenderStats, Statistics};
pub use threads::split_messages_by_time;

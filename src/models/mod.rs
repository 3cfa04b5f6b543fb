//! Canonical chat session model.
//!
//! Every supported input format is normalized into these types:
//!
//! - [`Session`] - a whole conversation, messages kept in timestamp order
//! - [`VersionInfo`] - schema version, export time and generator (`chatlab` block)
//! - [`SessionMeta`] - chat name, platform, chat type and owner (`meta` block)
//! - [`Member`] - a participant keyed by platform id
//! - [`Message`] - a single message with its raw type code
//!
//! Absent fields default silently. The lenient field deserializers live in
//! `parsers::deserializers`.

pub mod member;
pub mod message;
pub mod session;

pub use member::Member;
pub use message::{Message, MessageType};
pub use session::{ChatType, SPEC_VERSION, Session, SessionMeta, VersionInfo};

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Member, Message};

/// Version string of the canonical schema this crate reads and writes
pub const SPEC_VERSION: &str = "0.0.1";

/// The `chatlab` block: which schema version and which tool produced the export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string")]
    pub version: String,
    #[serde(
        rename = "exportedAt",
        deserialize_with = "crate::parsers::deserializers::deserialize_epoch_seconds"
    )]
    pub exported_at: i64,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string")]
    pub generator: String,
}

impl VersionInfo {
    pub fn new(exported_at: i64, generator: impl Into<String>) -> Self {
        Self { version: SPEC_VERSION.to_string(), exported_at, generator: generator.into() }
    }
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self::new(0, "unknown")
    }
}

/// Kind of conversation. Anything other than `private`/`group` is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ChatType {
    #[default]
    Private,
    Group,
    Other(String),
}

impl ChatType {
    pub fn as_str(&self) -> &str {
        match self {
            ChatType::Private => "private",
            ChatType::Group => "group",
            ChatType::Other(s) => s,
        }
    }

    /// Fold free-form text naming a known kind back onto that kind, as decoding does
    fn canonical(self) -> Self {
        match self {
            ChatType::Other(s) if s.is_empty() => ChatType::Private,
            ChatType::Other(s) => ChatType::from(s),
            known => known,
        }
    }
}

impl From<String> for ChatType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "private" => ChatType::Private,
            "group" => ChatType::Group,
            _ => ChatType::Other(s),
        }
    }
}

impl From<&str> for ChatType {
    fn from(s: &str) -> Self {
        ChatType::from(s.to_string())
    }
}

impl fmt::Display for ChatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChatType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChatType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = crate::parsers::deserializers::deserialize_lenient_string(deserializer)?;
        Ok(if s.is_empty() { ChatType::Private } else { ChatType::from(s) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionMeta {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string")]
    pub platform: String,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    #[serde(
        rename = "ownerId",
        deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string"
    )]
    pub owner_id: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_string"
    )]
    pub avatar: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_string"
    )]
    pub description: Option<String>,
}

impl Default for SessionMeta {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            platform: "unknown".to_string(),
            chat_type: ChatType::Private,
            owner_id: String::new(),
            avatar: None,
            description: None,
        }
    }
}

/// A complete, normalized chat session.
///
/// Messages are kept in ascending timestamp order. The sort is stable, so
/// messages sharing a timestamp stay in input order. A session is not edited
/// after construction; the query layer only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SessionDocument")]
pub struct Session {
    #[serde(rename = "chatlab")]
    version: VersionInfo,
    meta: SessionMeta,
    members: Vec<Member>,
    messages: Vec<Message>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl Session {
    /// Build a session in canonical form.
    ///
    /// Messages are stably sorted by timestamp. Empty optional strings become `None` and a
    /// free-form chat type spelling `private`/`group` becomes that variant, so the result
    /// serializes and decodes back to an equal value.
    pub fn new(
        version: VersionInfo,
        mut meta: SessionMeta,
        mut members: Vec<Member>,
        mut messages: Vec<Message>,
    ) -> Self {
        meta.chat_type = meta.chat_type.canonical();
        meta.avatar = non_empty(meta.avatar.take());
        meta.description = non_empty(meta.description.take());
        for member in &mut members {
            member.role = non_empty(member.role.take());
            member.avatar = non_empty(member.avatar.take());
            member.remark = non_empty(member.remark.take());
        }
        for message in &mut messages {
            message.reply_to = non_empty(message.reply_to.take());
        }
        messages.sort_by_key(|m| m.timestamp);
        Self { version, meta, members, messages }
    }

    pub fn version(&self) -> &VersionInfo {
        &self.version
    }

    pub fn meta(&self) -> &SessionMeta {
        &self.meta
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Messages in ascending timestamp order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn member(&self, platform_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.platform_id == platform_id)
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Session '{}' ({} messages, {} members)",
            self.meta.name,
            self.messages.len(),
            self.members.len()
        )
    }
}

/// Wire shape of the canonical document; every block may be missing
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SessionDocument {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    chatlab: VersionInfo,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    meta: SessionMeta,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    members: Vec<Member>,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    messages: Vec<Message>,
}

impl From<SessionDocument> for Session {
    fn from(doc: SessionDocument) -> Self {
        Session::new(doc.chatlab, doc.meta, doc.members, doc.messages)
    }
}

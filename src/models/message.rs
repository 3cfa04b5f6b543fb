use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::utils::time::{format_local, format_local_date, local_datetime};

/// Closed set of message kinds.
///
/// Messages store the raw integer code; this enum is only a view over it.
/// Codes outside the table read as [`MessageType::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    Image,
    Voice,
    Video,
    File,
    Location,
    Link,
    Sticker,
    System,
    Revoked,
}

impl MessageType {
    pub const ALL: [MessageType; 10] = [
        MessageType::Text,
        MessageType::Image,
        MessageType::Voice,
        MessageType::Video,
        MessageType::File,
        MessageType::Location,
        MessageType::Link,
        MessageType::Sticker,
        MessageType::System,
        MessageType::Revoked,
    ];

    pub fn from_code(code: i64) -> Self {
        usize::try_from(code).ok().and_then(|i| Self::ALL.get(i).copied()).unwrap_or(Self::Text)
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn label(self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::Voice => "voice",
            MessageType::Video => "video",
            MessageType::File => "file",
            MessageType::Location => "location",
            MessageType::Link => "link",
            MessageType::Sticker => "sticker",
            MessageType::System => "system",
            MessageType::Revoked => "revoked",
        }
    }

    /// Look up a type by its label (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.to_lowercase();
        Self::ALL.into_iter().find(|t| t.label() == lower)
    }
}

impl From<MessageType> for i64 {
    fn from(value: MessageType) -> Self {
        value.code()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string")]
    pub sender: String,
    #[serde(
        rename = "accountName",
        deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string"
    )]
    pub account_name: String,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_epoch_seconds")]
    pub timestamp: i64,
    #[serde(
        rename = "type",
        deserialize_with = "crate::parsers::deserializers::deserialize_type_code"
    )]
    pub msg_type: i64,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string")]
    pub content: String,
    #[serde(
        rename = "platformMessageId",
        deserialize_with = "crate::parsers::deserializers::deserialize_lenient_string"
    )]
    pub platform_message_id: String,
    #[serde(
        rename = "replyTo",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_string"
    )]
    pub reply_to: Option<String>,
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        MessageType::from_code(self.msg_type)
    }

    pub fn datetime(&self) -> DateTime<Local> {
        local_datetime(self.timestamp)
    }

    /// Local time rendered as `YYYY-MM-DD HH:MM:SS`
    pub fn datetime_str(&self) -> String {
        format_local(self.timestamp)
    }

    /// Local calendar date rendered as `YYYY-MM-DD`
    pub fn date_str(&self) -> String {
        format_local_date(self.timestamp)
    }
}

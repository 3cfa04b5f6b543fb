//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for a scratch directory holding chat export files
pub struct ExportDirBuilder {
    temp_dir: TempDir,
}

impl ExportDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file with the given content
    pub fn with_file(self, name: &str, content: &str) -> Self {
        fs::write(self.temp_dir.path().join(name), content).expect("Failed to write test file");
        self
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ExportDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single canonical message record
#[derive(Clone)]
pub struct MessageBuilder {
    sender: String,
    account_name: String,
    timestamp: i64,
    msg_type: i64,
    content: String,
    id: String,
    reply_to: Option<String>,
}

impl MessageBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            sender: "wxid_alice".to_string(),
            account_name: "Alice".to_string(),
            timestamp: 1_710_000_000,
            msg_type: 0,
            content: "Test message".to_string(),
            id: id.to_string(),
            reply_to: None,
        }
    }

    /// Set sender id and display name
    pub fn from(mut self, sender: &str, account_name: &str) -> Self {
        self.sender = sender.to_string();
        self.account_name = account_name.to_string();
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn msg_type(mut self, msg_type: i64) -> Self {
        self.msg_type = msg_type;
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn reply_to(mut self, id: &str) -> Self {
        self.reply_to = Some(id.to_string());
        self
    }

    /// Record fields without enclosing braces
    fn fields(&self) -> String {
        let reply =
            self.reply_to.as_ref().map(|r| format!(r#","replyTo":"{}""#, r)).unwrap_or_default();
        format!(
            r#""sender":"{}","accountName":"{}","timestamp":{},"type":{},"content":{},"platformMessageId":"{}"{}"#,
            self.sender,
            self.account_name,
            self.timestamp,
            self.msg_type,
            serde_json::to_string(&self.content).expect("string serializes"),
            self.id,
            reply
        )
    }

    pub fn to_json(&self) -> String {
        format!("{{{}}}", self.fields())
    }

    pub fn to_jsonl(&self) -> String {
        format!(r#"{{"_type":"message",{}}}"#, self.fields())
    }
}

/// Builder for a whole export, rendered as a canonical document or as JSON Lines
pub struct SessionDocBuilder {
    name: String,
    platform: String,
    chat_type: String,
    avatar: Option<String>,
    description: Option<String>,
    members: Vec<MemberEntry>,
    messages: Vec<MessageBuilder>,
}

/// A member record; optional fields are written only when set
#[derive(Default)]
pub struct MemberEntry {
    pub platform_id: String,
    pub account_name: String,
    pub role: Option<String>,
    pub avatar: Option<String>,
    pub remark: Option<String>,
}

impl MemberEntry {
    fn fields(&self) -> String {
        let mut fields = format!(
            r#""platformId":"{}","accountName":"{}""#,
            self.platform_id, self.account_name
        );
        fields.push_str(&optional_fields(&[
            ("role", &self.role),
            ("avatar", &self.avatar),
            ("remark", &self.remark),
        ]));
        fields
    }
}

/// `,"key":"value"` for each optional field that is set
fn optional_fields(fields: &[(&str, &Option<String>)]) -> String {
    fields
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!(r#","{}":"{}""#, key, v)))
        .collect()
}

impl SessionDocBuilder {
    pub fn new() -> Self {
        Self {
            name: "Test Chat".to_string(),
            platform: "wechat".to_string(),
            chat_type: "group".to_string(),
            avatar: None,
            description: None,
            members: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the optional avatar and description of the chat
    pub fn meta_details(mut self, avatar: &str, description: &str) -> Self {
        self.avatar = Some(avatar.to_string());
        self.description = Some(description.to_string());
        self
    }

    pub fn member(self, platform_id: &str, account_name: &str) -> Self {
        self.member_entry(MemberEntry {
            platform_id: platform_id.to_string(),
            account_name: account_name.to_string(),
            ..Default::default()
        })
    }

    pub fn member_entry(mut self, member: MemberEntry) -> Self {
        self.members.push(member);
        self
    }

    pub fn message(mut self, message: MessageBuilder) -> Self {
        self.messages.push(message);
        self
    }

    fn header_fields(&self) -> String {
        format!(
            r#""chatlab":{{"version":"0.0.1","exportedAt":1770985548,"generator":"test"}},"meta":{{"name":"{}","platform":"{}","type":"{}","ownerId":"owner"{}}}"#,
            self.name,
            self.platform,
            self.chat_type,
            optional_fields(&[("avatar", &self.avatar), ("description", &self.description)])
        )
    }

    pub fn to_json(&self) -> String {
        let members: Vec<_> = self.members.iter().map(|m| format!("{{{}}}", m.fields())).collect();
        let messages: Vec<_> = self.messages.iter().map(|m| m.to_json()).collect();
        format!(
            r#"{{{},"members":[{}],"messages":[{}]}}"#,
            self.header_fields(),
            members.join(","),
            messages.join(",")
        )
    }

    pub fn to_jsonl(&self) -> String {
        let mut lines = vec![format!(r#"{{"_type":"header",{}}}"#, self.header_fields())];
        for member in &self.members {
            lines.push(format!(r#"{{"_type":"member",{}}}"#, member.fields()));
        }
        lines.extend(self.messages.iter().map(|m| m.to_jsonl()));
        lines.join("\n")
    }
}

impl Default for SessionDocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Three messages from two senders across two days, out of order.
/// Every optional field of the schema is set somewhere.
pub fn sample_doc() -> SessionDocBuilder {
    SessionDocBuilder::new()
        .meta_details("https://example.com/chat.png", "Weekend plans")
        .member_entry(MemberEntry {
            platform_id: "wxid_alice".to_string(),
            account_name: "Alice".to_string(),
            role: Some("owner".to_string()),
            avatar: Some("https://example.com/alice.png".to_string()),
            remark: Some("organizer".to_string()),
        })
        .member("wxid_bob", "Bob")
        .message(MessageBuilder::new("m3").timestamp(1_710_090_000).content("Hello everyone"))
        .message(
            MessageBuilder::new("m1")
                .from("wxid_bob", "Bob")
                .timestamp(1_710_000_000)
                .content("今天天气不错"),
        )
        .message(
            MessageBuilder::new("m2")
                .timestamp(1_710_000_600)
                .msg_type(1)
                .content("[图片]")
                .reply_to("m1"),
        )
}

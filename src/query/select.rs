use crate::models::{Message, Session};

impl Session {
    fn select<'a>(&'a self, predicate: impl Fn(&Message) -> bool) -> Vec<&'a Message> {
        self.messages().iter().filter(|m| predicate(*m)).collect()
    }

    /// Messages whose sender id matches exactly
    pub fn messages_by_sender(&self, sender_id: &str) -> Vec<&Message> {
        self.select(|m| m.sender == sender_id)
    }

    /// Messages whose display name matches exactly
    pub fn messages_by_name(&self, name: &str) -> Vec<&Message> {
        self.select(|m| m.account_name == name)
    }

    /// Messages with the given raw type code.
    ///
    /// Accepts a [`MessageType`](crate::models::MessageType) too.
    pub fn messages_by_type(&self, msg_type: impl Into<i64>) -> Vec<&Message> {
        let code = msg_type.into();
        self.select(|m| m.msg_type == code)
    }

    /// Messages whose local `YYYY-MM-DD HH:MM:SS` rendering starts with `prefix`.
    ///
    /// A full date selects one day; `2024-03` selects a month.
    pub fn messages_by_date(&self, prefix: &str) -> Vec<&Message> {
        self.select(|m| m.datetime_str().starts_with(prefix))
    }

    /// Substring search over message content
    pub fn search(&self, keyword: &str, case_sensitive: bool) -> Vec<&Message> {
        if case_sensitive {
            return self.select(|m| m.content.contains(keyword));
        }
        let needle = keyword.to_lowercase();
        self.select(|m| m.content.to_lowercase().contains(&needle))
    }

    /// First message carrying `platform_message_id`, in timestamp order
    pub fn message_by_id(&self, platform_message_id: &str) -> Option<&Message> {
        self.messages().iter().find(|m| m.platform_message_id == platform_message_id)
    }
}

use crate::models::{Message, Session};

/// Split timestamp-ordered messages wherever the gap to the previous message exceeds
/// `max_gap_minutes`.
///
/// A gap exactly equal to the threshold stays in the same thread. An empty slice yields no
/// threads.
pub fn split_messages_by_time(messages: &[Message], max_gap_minutes: f64) -> Vec<&[Message]> {
    let mut threads = Vec::new();
    let mut start = 0;

    for (i, pair) in messages.windows(2).enumerate() {
        let gap_seconds = i128::from(pair[1].timestamp) - i128::from(pair[0].timestamp);
        let gap_minutes = gap_seconds as f64 / 60.0;
        if gap_minutes > max_gap_minutes {
            threads.push(&messages[start..=i]);
            start = i + 1;
        }
    }
    if start < messages.len() {
        threads.push(&messages[start..]);
    }

    threads
}

impl Session {
    /// Segment the session into conversation threads by idle time
    pub fn conversation_threads(&self, max_gap_minutes: f64) -> Vec<&[Message]> {
        split_messages_by_time(self.messages(), max_gap_minutes)
    }
}

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::models::Session;
use crate::utils::time::format_local;

/// Per-sender activity summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderStats {
    pub sender_id: String,
    /// Display name on the sender's first message
    pub account_name: String,
    pub count: usize,
    /// Epoch seconds of the sender's first message
    pub first_message: i64,
    /// Epoch seconds of the sender's last message
    pub last_message: i64,
}

/// Timestamps of the first and last message in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    pub fn start_str(&self) -> String {
        format_local(self.start)
    }

    pub fn end_str(&self) -> String {
        format_local(self.end)
    }
}

/// Aggregate statistics for a whole session.
///
/// An empty session yields zero counts, empty maps and no date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_messages: usize,
    pub unique_senders: usize,
    pub date_range: Option<DateRange>,
    /// Message counts keyed by type label
    pub message_types: BTreeMap<&'static str, usize>,
    pub timeline: BTreeMap<String, usize>,
    /// One entry per sender, in order of first appearance
    pub sender_stats: Vec<SenderStats>,
}

impl Session {
    /// Message count per local calendar date, ascending by date
    pub fn timeline(&self) -> BTreeMap<String, usize> {
        let mut timeline = BTreeMap::new();
        for message in self.messages() {
            *timeline.entry(message.date_str()).or_insert(0) += 1;
        }
        timeline
    }

    pub fn sender_stats(&self) -> Vec<SenderStats> {
        let mut stats: Vec<SenderStats> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for message in self.messages() {
            match index.get(message.sender.as_str()) {
                Some(&i) => {
                    stats[i].count += 1;
                    stats[i].last_message = message.timestamp;
                }
                None => {
                    index.insert(&message.sender, stats.len());
                    stats.push(SenderStats {
                        sender_id: message.sender.clone(),
                        account_name: message.account_name.clone(),
                        count: 1,
                        first_message: message.timestamp,
                        last_message: message.timestamp,
                    });
                }
            }
        }

        stats
    }

    pub fn statistics(&self) -> Statistics {
        let messages = self.messages();
        let (Some(first), Some(last)) = (messages.first(), messages.last()) else {
            return Statistics::default();
        };

        let mut message_types = BTreeMap::new();
        for message in messages {
            *message_types.entry(message.message_type().label()).or_insert(0) += 1;
        }
        let unique_senders =
            messages.iter().map(|m| m.sender.as_str()).collect::<HashSet<_>>().len();

        Statistics {
            total_messages: messages.len(),
            unique_senders,
            date_range: Some(DateRange { start: first.timestamp, end: last.timestamp }),
            message_types,
            timeline: self.timeline(),
            sender_stats: self.sender_stats(),
        }
    }
}

use super::ast::{FieldFilter, FilterExpr, FilterField, FilterOperator};
use crate::models::{Message, MessageType, Session};

/// Apply a filter expression to messages, keeping their order
///
/// Filter logic:
/// - Same-field OR: sender:u1 sender:u2 → (u1 OR u2)
/// - Cross-field AND: sender:u1 type:image → (u1 AND image)
/// - Explicit operators override defaults
///
/// Terms are folded left to right without precedence.
pub fn apply_filters<'a>(messages: &'a [Message], filter: &FilterExpr) -> Vec<&'a Message> {
    messages.iter().filter(|message| evaluate_filter(message, filter)).collect()
}

impl Session {
    /// Messages matching a parsed filter expression
    pub fn filter(&self, filter: &FilterExpr) -> Vec<&Message> {
        apply_filters(self.messages(), filter)
    }
}

/// Evaluate filter expression against a single message
fn evaluate_filter(message: &Message, filter: &FilterExpr) -> bool {
    let Some((first, rest)) = filter.filters.split_first() else {
        return true;
    };

    let mut result = evaluate_field_filter(message, first);
    for (operator, next) in filter.operators.iter().zip(rest) {
        let matched = evaluate_field_filter(message, next);
        result = match operator {
            FilterOperator::And => result && matched,
            FilterOperator::Or => result || matched,
        };
    }

    result
}

fn evaluate_field_filter(message: &Message, filter: &FieldFilter) -> bool {
    let value = filter.value.as_str();
    match filter.field {
        FilterField::Sender => message.sender == value,
        FilterField::Name => contains_ignore_case(&message.account_name, value),
        FilterField::Type => match_type(message, value),
        FilterField::Date => message.date_str().starts_with(value),
        FilterField::Since => message.date_str().as_str() >= value,
        FilterField::Keyword => contains_ignore_case(&message.content, value),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Integer values compare against the raw code; labels compare against the display type,
/// so `type:text` also matches unknown codes.
fn match_type(message: &Message, value: &str) -> bool {
    if let Ok(code) = value.parse::<i64>() {
        return message.msg_type == code;
    }
    MessageType::from_label(value).is_some_and(|t| message.message_type() == t)
}

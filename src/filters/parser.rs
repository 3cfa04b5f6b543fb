//! Filter query parser for narrowing a session's messages.
//!
//! Parses user-provided filter expressions into an AST ([`FilterExpr`]) for evaluation.
//! Supports field-based filtering with operators and quoted values.
//!
//! # Syntax
//!
//! ```text
//! filter_expr := field_filter (operator field_filter)*
//! field_filter := field_name:value | field_name:"quoted value"
//! operator := AND | OR (case-insensitive)
//! field_name := sender | name | type | date | since | keyword (case-insensitive)
//! ```
//!
//! # Supported Fields
//!
//! - `sender:id` - Exact sender id
//! - `name:text` - Display name contains text (case-insensitive)
//! - `type:label|code` - Message type by label (`image`, `voice`, ...) or integer code
//! - `date:prefix` - Local date starts with prefix (`2024`, `2024-03`, `2024-03-15`)
//! - `since:YYYY-MM-DD` - Messages on or after a local date
//! - `keyword:text` - Content contains text (case-insensitive)
//!
//! # Examples
//!
//! ```rust
//! # use chatlab::filters::parser::parse_filter;
//! // Single filter
//! let expr = parse_filter("sender:wxid_alice").unwrap();
//!
//! // Multiple filters with implicit AND (different fields)
//! let expr = parse_filter("sender:wxid_alice type:image").unwrap();
//!
//! // Same field gets implicit OR
//! let expr = parse_filter("type:image type:video").unwrap();
//!
//! // Quoted values for spaces
//! let expr = parse_filter("keyword:\"good morning\"").unwrap();
//!
//! // Mixed
//! let expr = parse_filter("date:2024-03 AND keyword:天气 OR keyword:weather").unwrap();
//! ```
//!
//! # Operator Precedence
//!
//! - Implicit operators (no keyword): AND for different fields, OR for same field
//! - Explicit operators (AND/OR keywords): Always respected
//!
//! # Validation
//!
//! - `type` values must be a known label or an integer code
//! - `date` values may only contain digits and `-`
//! - `since` dates must be YYYY-MM-DD format and semantically valid
//! - Empty field names or values are rejected

use std::iter::Peekable;
use std::str::Chars;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;

use super::ast::{FieldFilter, FilterExpr, FilterField, FilterOperator};
use crate::models::MessageType;

/// Token types produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// field:value or field:"quoted value"
    FieldValue { field: String, value: String },
    /// AND keyword
    And,
    /// OR keyword
    Or,
}

/// Split filter input into tokens.
///
/// Words are whitespace separated. A value opening with `"` runs to the matching quote,
/// spaces included.
fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }
        let word = read_word(&mut chars);
        tokens.push(classify_word(&word, &mut chars)?);
    }

    Ok(tokens)
}

fn classify_word(word: &str, chars: &mut Peekable<Chars>) -> Result<Token> {
    if word.eq_ignore_ascii_case("and") {
        return Ok(Token::And);
    }
    if word.eq_ignore_ascii_case("or") {
        return Ok(Token::Or);
    }

    let Some((field, raw_value)) = word.split_once(':') else {
        return Err(anyhow!("Invalid token: '{}' (expected field:value or AND/OR)", word));
    };
    let value = if raw_value.starts_with('"') {
        read_quoted_value(chars, raw_value)?
    } else {
        raw_value.to_string()
    };

    if field.is_empty() || value.is_empty() {
        return Err(anyhow!("Invalid field:value format: {}", word));
    }
    Ok(Token::FieldValue { field: field.to_string(), value })
}

/// Read a word (until whitespace or end)
fn read_word(chars: &mut Peekable<Chars>) -> String {
    let mut word = String::new();
    while let Some(ch) = chars.next_if(|c| !c.is_whitespace()) {
        word.push(ch);
    }
    word
}

/// Read a quoted value, handling the case where word already contains the opening quote
fn read_quoted_value(chars: &mut Peekable<Chars>, initial: &str) -> Result<String> {
    // initial is `"foo"` or `"foo` when the value continues past whitespace
    let mut value = initial[1..].to_string();
    if let Some(quote_pos) = value.find('"') {
        value.truncate(quote_pos);
        return Ok(value);
    }

    for ch in chars.by_ref() {
        if ch == '"' {
            return Ok(value);
        }
        value.push(ch);
    }

    Err(anyhow!("Unterminated quoted string"))
}

/// Parse field name into FilterField enum
fn parse_field(field: &str) -> Result<FilterField> {
    match field.to_lowercase().as_str() {
        "sender" => Ok(FilterField::Sender),
        "name" => Ok(FilterField::Name),
        "type" => Ok(FilterField::Type),
        "date" => Ok(FilterField::Date),
        "since" => Ok(FilterField::Since),
        "keyword" => Ok(FilterField::Keyword),
        _ => Err(anyhow!(
            "Unknown field: '{}' (valid fields: sender, name, type, date, since, keyword)",
            field
        )),
    }
}

/// Parse filter string into FilterExpr
///
/// Examples:
/// - "sender:u1" → single filter
/// - "sender:u1 type:image" → two filters with implicit AND
/// - "type:image OR type:video" → two filters with explicit OR
/// - "sender:u1 sender:u2" → two filters with implicit OR (same field)
/// - "keyword:\"foo bar\"" → filter with quoted value containing spaces
pub fn parse_filter(input: &str) -> Result<FilterExpr> {
    if input.trim().is_empty() {
        return Ok(FilterExpr::new());
    }

    let tokens = tokenize(input).context("Failed to tokenize filter")?;

    if tokens.is_empty() {
        return Ok(FilterExpr::new());
    }

    let mut expr = FilterExpr::new();
    let mut expecting_filter = true;
    let mut last_field: Option<FilterField> = None;

    for token in tokens {
        match token {
            Token::FieldValue { field, value } => {
                let filter_field = parse_field(&field)?;

                validate_value(&filter_field, &value)?;

                // No explicit operator since the previous term
                if !expecting_filter {
                    let implicit_op = match last_field {
                        Some(prev_field) if prev_field == filter_field => FilterOperator::Or,
                        _ => FilterOperator::And,
                    };
                    expr.add_operator(implicit_op);
                }

                expr.add_filter(FieldFilter::new(filter_field, value));
                last_field = Some(filter_field);
                expecting_filter = false;
            }
            Token::And => {
                if expecting_filter {
                    return Err(anyhow!("Unexpected AND operator (expected field:value)"));
                }
                expr.add_operator(FilterOperator::And);
                expecting_filter = true;
            }
            Token::Or => {
                if expecting_filter {
                    return Err(anyhow!("Unexpected OR operator (expected field:value)"));
                }
                expr.add_operator(FilterOperator::Or);
                expecting_filter = true;
            }
        }
    }

    if expecting_filter {
        return Err(anyhow!("Filter ended with operator (expected field:value)"));
    }

    debug_assert_eq!(expr.operators.len(), expr.filters.len() - 1);
    Ok(expr)
}

/// Validate filter value based on field type
fn validate_value(field: &FilterField, value: &str) -> Result<()> {
    match field {
        FilterField::Type => {
            if MessageType::from_label(value).is_some() || value.parse::<i64>().is_ok() {
                return Ok(());
            }
            let labels: Vec<_> = MessageType::ALL.iter().map(|t| t.label()).collect();
            Err(anyhow!(
                "Invalid type value: '{}' (expected an integer code or one of: {})",
                value,
                labels.join(", ")
            ))
        }
        FilterField::Date => {
            if value.chars().all(|c| c.is_ascii_digit() || c == '-') {
                Ok(())
            } else {
                Err(anyhow!("Invalid date prefix: '{}' (expected e.g. 2024-03)", value))
            }
        }
        FilterField::Since => {
            // Must be YYYY-MM-DD format
            if !is_valid_date_format(value) {
                return Err(anyhow!("Invalid date format: '{}' (expected YYYY-MM-DD)", value));
            }
            Ok(())
        }
        FilterField::Sender | FilterField::Name | FilterField::Keyword => {
            if value.is_empty() {
                return Err(anyhow!("Filter value cannot be empty"));
            }
            Ok(())
        }
    }
}

/// Check if string is valid YYYY-MM-DD format
fn is_valid_date_format(s: &str) -> bool {
    // Enforce strict YYYY-MM-DD format (10 chars)
    if s.len() != 10 {
        return false;
    }
    // Use chrono for semantic validation (e.g., reject 2024-02-31)
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

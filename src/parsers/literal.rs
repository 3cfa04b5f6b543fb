//! Reader for the relaxed literal dialect.
//!
//! Some export tools write native-language literals instead of JSON: single
//! quoted strings, `True`/`False`/`None`, tuples. This reader accepts that
//! dialect (and plain JSON tokens) and produces a [`serde_json::Value`] so the
//! rest of the pipeline only ever deals with JSON values.
//!
//! Accepted, best effort:
//!
//! - strings in `'...'` or `"..."`, optional `u` prefix, adjacent literals
//!   concatenated, escapes `\\ \' \" \n \r \t \b \f \v \a \0`, octal,
//!   `\xhh`, `\uXXXX`, `\UXXXXXXXX`, and backslash-newline continuations
//! - integers and floats with optional sign and exponent
//! - `True`/`False`/`None` and `true`/`false`/`null`
//! - dicts, lists and tuples; non-string dict keys are rendered as text
//!
//! Trailing commas in dicts and lists are rejected; the JSON parser strips
//! them in its repair pass before retrying.

use serde_json::{Map, Number, Value};
use thiserror::Error;

const MAX_DEPTH: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

/// Parse a whole document in the relaxed literal dialect
pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut reader = LiteralReader { text, pos: 0, depth: 0 };
    reader.skip_whitespace();
    let value = reader.read_value()?;
    reader.skip_whitespace();
    if reader.pos < text.len() {
        return Err(reader.error("trailing characters after value"));
    }
    Ok(value)
}

struct LiteralReader<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> LiteralReader<'a> {
    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError { offset: self.pos, message: message.into() }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn read_value(&mut self) -> Result<Value, LiteralError> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('{') => self.nested(Self::read_dict),
            Some('[') => self.nested(Self::read_list),
            Some('(') => self.nested(Self::read_tuple),
            Some('\'') | Some('"') => self.read_strings().map(Value::String),
            Some('u') | Some('U') if matches!(self.peek_nth(1), Some('\'') | Some('"')) => {
                self.read_strings().map(Value::String)
            }
            Some(ch) if ch == '-' || ch == '+' || ch == '.' || ch.is_ascii_digit() => {
                self.read_number()
            }
            Some(ch) if ch.is_alphabetic() || ch == '_' => self.read_keyword(),
            Some(ch) => Err(self.error(format!("unexpected character '{}'", ch))),
        }
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(n)
    }

    fn nested(
        &mut self,
        read: fn(&mut Self) -> Result<Value, LiteralError>,
    ) -> Result<Value, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn read_dict(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut map = Map::new();
        self.skip_whitespace();
        if self.eat('}') {
            return Ok(Value::Object(map));
        }
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                return Err(self.error("trailing comma in dict"));
            }
            let key = match self.read_value()? {
                Value::String(s) => s,
                Value::Object(_) | Value::Array(_) => {
                    return Err(self.error("unhashable dict key"));
                }
                other => other.to_string(),
            };
            self.skip_whitespace();
            if !self.eat(':') {
                return Err(self.error("expected ':' after dict key"));
            }
            self.skip_whitespace();
            let value = self.read_value()?;
            map.insert(key, value);
            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            return Err(self.error("expected ',' or '}' in dict"));
        }
    }

    fn read_list(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.eat(']') {
            return Ok(Value::Array(items));
        }
        loop {
            self.skip_whitespace();
            if self.peek() == Some(']') {
                return Err(self.error("trailing comma in list"));
            }
            items.push(self.read_value()?);
            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                return Ok(Value::Array(items));
            }
            return Err(self.error("expected ',' or ']' in list"));
        }
    }

    /// `()` is empty, `(x)` is just `x`, `(x,)` and `(x, y)` are sequences
    fn read_tuple(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_whitespace();
            if self.eat(')') {
                break;
            }
            items.push(self.read_value()?);
            self.skip_whitespace();
            if self.eat(',') {
                saw_comma = true;
                continue;
            }
            if self.eat(')') {
                break;
            }
            return Err(self.error("expected ',' or ')' in tuple"));
        }
        if items.len() == 1 && !saw_comma {
            return Ok(items.remove(0));
        }
        Ok(Value::Array(items))
    }

    fn read_strings(&mut self) -> Result<String, LiteralError> {
        let mut out = self.read_string()?;
        loop {
            let checkpoint = self.pos;
            self.skip_whitespace();
            let starts_string = match self.peek() {
                Some('\'') | Some('"') => true,
                Some('u') | Some('U') => matches!(self.peek_nth(1), Some('\'') | Some('"')),
                _ => false,
            };
            if !starts_string {
                self.pos = checkpoint;
                return Ok(out);
            }
            out.push_str(&self.read_string()?);
        }
    }

    fn read_string(&mut self) -> Result<String, LiteralError> {
        if matches!(self.peek(), Some('u') | Some('U')) {
            self.bump();
        }
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected string")),
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('\n') => return Err(self.error("newline in string")),
                Some(ch) if ch == quote => return Ok(out),
                Some('\\') => self.read_escape(&mut out)?,
                Some(ch) => out.push(ch),
            }
        }
    }

    fn read_escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let ch = self.bump().ok_or_else(|| self.error("unterminated escape"))?;
        match ch {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            'a' => out.push('\u{07}'),
            '0'..='7' => {
                let mut code = ch.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            'x' => {
                let code = self.read_hex(2)?;
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            'u' => {
                let code = self.read_hex(4)?;
                out.push(self.finish_utf16(code));
            }
            'U' => {
                let code = self.read_hex(8)?;
                out.push(char::from_u32(code).ok_or_else(|| self.error("invalid code point"))?);
            }
            other => {
                // unknown escapes keep their backslash
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    /// Join a `\uD8xx\uDCxx` surrogate pair; lone surrogates become U+FFFD
    fn finish_utf16(&mut self, high: u32) -> char {
        if (0xD800..0xDC00).contains(&high) && self.text[self.pos..].starts_with("\\u") {
            let checkpoint = self.pos;
            self.pos += 2;
            if let Ok(low) = self.read_hex(4) {
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(code).unwrap_or('\u{fffd}');
                }
            }
            self.pos = checkpoint;
        }
        char::from_u32(high).unwrap_or('\u{fffd}')
    }

    fn read_hex(&mut self, digits: usize) -> Result<u32, LiteralError> {
        let end = self.pos + digits;
        let hex = self.text.get(self.pos..end).ok_or_else(|| self.error("truncated escape"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid hex escape"))?;
        self.pos = end;
        Ok(code)
    }

    fn read_number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('+') | Some('-')) {
            self.bump();
        }
        while let Some(ch) = self.peek() {
            let in_exponent = matches!(ch, '+' | '-')
                && matches!(self.text[..self.pos].chars().last(), Some('e') | Some('E'));
            if ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '_') || in_exponent {
                self.bump();
            } else {
                break;
            }
        }
        let raw: String = self.text[start..self.pos].chars().filter(|c| *c != '_').collect();
        let literal = raw.strip_prefix('+').unwrap_or(&raw);

        if let Ok(i) = literal.parse::<i64>() {
            return Ok(Value::Number(i.into()));
        }
        if let Ok(u) = literal.parse::<u64>() {
            return Ok(Value::Number(u.into()));
        }
        literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| LiteralError {
                offset: start,
                message: format!("invalid number '{}'", raw),
            })
    }

    fn read_keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.bump();
            } else {
                break;
            }
        }
        match &self.text[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            name => {
                Err(LiteralError { offset: start, message: format!("unexpected name '{}'", name) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_single_quotes_and_native_booleans() {
        let value = parse_literal("{'a': 1, 'b': True, 'c': None, 'd': False}").unwrap();
        assert_eq!(value, json!({"a": 1, "b": true, "c": null, "d": false}));
    }

    #[test]
    fn test_mixed_quotes_and_escapes() {
        let value = parse_literal(r#"{'it\'s': "say \"hi\"", 'tab': 'a\tb', 'zh': '今天'}"#)
            .unwrap();
        assert_eq!(value["it's"], "say \"hi\"");
        assert_eq!(value["tab"], "a\tb");
        assert_eq!(value["zh"], "今天");
    }

    #[test]
    fn test_unicode_passthrough_and_prefix() {
        let value = parse_literal("{u'name': u'测试群', 'emoji': '😀'}").unwrap();
        assert_eq!(value, json!({"name": "测试群", "emoji": "😀"}));
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let value = parse_literal(r"'\ud83d\ude00'").unwrap();
        assert_eq!(value, json!("😀"));
    }

    #[test]
    fn test_numbers() {
        let value = parse_literal("[1, -2, +3, 1.5, 1e3, 1_000, 18446744073709551615]").unwrap();
        assert_eq!(value[0], 1);
        assert_eq!(value[1], -2);
        assert_eq!(value[2], 3);
        assert_eq!(value[3], 1.5);
        assert_eq!(value[4], 1000.0);
        assert_eq!(value[5], 1000);
        assert_eq!(value[6], u64::MAX);
    }

    #[test]
    fn test_tuples() {
        assert_eq!(parse_literal("(1, 2)").unwrap(), json!([1, 2]));
        assert_eq!(parse_literal("(1,)").unwrap(), json!([1]));
        assert_eq!(parse_literal("(1)").unwrap(), json!(1));
        assert_eq!(parse_literal("()").unwrap(), json!([]));
    }

    #[test]
    fn test_adjacent_strings_concatenate() {
        assert_eq!(parse_literal("'ab' 'cd'").unwrap(), json!("abcd"));
    }

    #[test]
    fn test_non_string_keys() {
        assert_eq!(parse_literal("{1: 'a', True: 'b'}").unwrap(), json!({"1": "a", "true": "b"}));
    }

    #[test]
    fn test_rejects_trailing_commas() {
        assert!(parse_literal("{'a': 1,}").is_err());
        assert!(parse_literal("[1, 2,]").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse_literal("{'a': 1").is_err());
        assert!(parse_literal("{'a' 1}").is_err());
        assert!(parse_literal("'unterminated").is_err());
        assert!(parse_literal("{'a': undefined}").is_err());
        assert!(parse_literal("{'a': 1} extra").is_err());
        assert!(parse_literal("").is_err());
    }

    #[test]
    fn test_error_reports_offset() {
        let err = parse_literal("[1, @]").unwrap_err();
        assert_eq!(err.offset, 4);
        assert!(err.message.contains("unexpected character"));
    }

    #[test]
    fn test_depth_limit() {
        let deep = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
        assert!(parse_literal(&deep).unwrap_err().message.contains("too deep"));
    }
}

//! Stateless helpers for message content.

use std::sync::OnceLock;

use regex::Regex;

fn mention_re() -> &'static Regex {
    static MENTION_RE: OnceLock<Regex> = OnceLock::new();
    MENTION_RE.get_or_init(|| Regex::new(r"@([^\s@]+)").expect("valid mention regex"))
}

fn url_re() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| {
        Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).expect("valid url regex")
    })
}

fn email_re() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("valid email regex")
    })
}

/// Patterns masked by [`mask_sensitive_info`], applied in order:
/// mainland mobile numbers, resident id numbers, bank card numbers
fn sensitive_res() -> &'static [Regex; 3] {
    static SENSITIVE_RES: OnceLock<[Regex; 3]> = OnceLock::new();
    SENSITIVE_RES.get_or_init(|| {
        [
            Regex::new(r"1[3-9]\d{9}").expect("valid phone regex"),
            Regex::new(r"\d{17}[\dXx]").expect("valid id number regex"),
            Regex::new(r"\d{16,19}").expect("valid card number regex"),
        ]
    })
}

fn cjk_re() -> &'static Regex {
    static CJK_RE: OnceLock<Regex> = OnceLock::new();
    CJK_RE.get_or_init(|| Regex::new(r"[\u{4e00}-\u{9fff}]").expect("valid cjk regex"))
}

fn latin_word_re() -> &'static Regex {
    static LATIN_WORD_RE: OnceLock<Regex> = OnceLock::new();
    LATIN_WORD_RE.get_or_init(|| Regex::new(r"[a-zA-Z]+").expect("valid word regex"))
}

/// Names following an `@`, without the `@`
pub fn extract_mentions(content: &str) -> Vec<String> {
    mention_re().captures_iter(content).map(|c| c[1].to_string()).collect()
}

pub fn extract_urls(content: &str) -> Vec<String> {
    url_re().find_iter(content).map(|m| m.as_str().to_string()).collect()
}

pub fn extract_emails(content: &str) -> Vec<String> {
    email_re().find_iter(content).map(|m| m.as_str().to_string()).collect()
}

/// Replace phone, id and card numbers with `mask`
pub fn mask_sensitive_info(content: &str, mask: &str) -> String {
    sensitive_res()
        .iter()
        .fold(content.to_string(), |acc, re| {
            re.replace_all(&acc, regex::NoExpand(mask)).into_owned()
        })
}

/// Shorten `text` to at most `max_chars` characters, ending with `suffix`
pub fn truncate_text(text: &str, max_chars: usize, suffix: &str) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(suffix.chars().count());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(suffix);
    truncated
}

/// Estimated reading time in seconds, never less than one.
///
/// Each CJK ideograph and each Latin word counts as one word.
pub fn estimate_reading_time(content: &str, words_per_minute: u32) -> u64 {
    let words = cjk_re().find_iter(content).count() + latin_word_re().find_iter(content).count();
    let minutes = words as f64 / f64::from(words_per_minute.max(1));
    ((minutes * 60.0) as u64).max(1)
}

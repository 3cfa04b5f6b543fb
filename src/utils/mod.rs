pub mod text;
pub mod time;

pub use text::{
    estimate_reading_time, extract_emails, extract_mentions, extract_urls, mask_sensitive_info,
    truncate_text,
};
pub use time::{format_local, format_local_date, normalize_epoch, parse_timestamp};

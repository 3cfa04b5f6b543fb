use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamps above this are taken to be milliseconds
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// Human-readable layouts accepted for imported timestamps, tried in order
#[derive(Debug, Clone, Copy)]
enum HumanFormat {
    DateTime(&'static str),
    Date(&'static str),
    /// Time of day only; the date is pinned to 1900-01-01
    Time(&'static str),
}

const HUMAN_FORMATS: &[HumanFormat] = &[
    HumanFormat::DateTime("%Y-%m-%d %H:%M:%S"),
    HumanFormat::DateTime("%Y/%m/%d %H:%M:%S"),
    HumanFormat::DateTime("%d/%m/%Y %H:%M:%S"),
    HumanFormat::Date("%Y-%m-%d"),
    HumanFormat::Time("%H:%M:%S"),
    HumanFormat::DateTime("%Y年%m月%d日 %H:%M"),
];

/// Convert epoch seconds to local time. Out-of-range values clamp to the epoch.
pub fn local_datetime(timestamp: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_default().with_timezone(&Local)
}

/// Render epoch seconds as local `YYYY-MM-DD HH:MM:SS`
pub fn format_local(timestamp: i64) -> String {
    local_datetime(timestamp).format(DATETIME_FORMAT).to_string()
}

/// Render epoch seconds as a local `YYYY-MM-DD` date
pub fn format_local_date(timestamp: i64) -> String {
    local_datetime(timestamp).format(DATE_FORMAT).to_string()
}

pub fn now_epoch_seconds() -> i64 {
    Utc::now().timestamp()
}

/// Bring a seconds-or-milliseconds epoch value to seconds
pub fn normalize_epoch(value: i64) -> i64 {
    if value > MILLIS_THRESHOLD { value / 1000 } else { value }
}

/// Parse a timestamp as written in a chat export.
///
/// Tries a plain epoch number first (integer or float, truncated; millisecond
/// values are brought to seconds), then RFC 3339, then each human layout in
/// [`HUMAN_FORMATS`] interpreted in local time. Returns `None` when nothing
/// matches.
pub fn parse_timestamp(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(normalize_epoch(value));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => return Some(normalize_epoch(value.trunc() as i64)),
        _ => {}
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp());
    }

    HUMAN_FORMATS.iter().find_map(|format| parse_human(trimmed, *format))
}

fn parse_human(input: &str, format: HumanFormat) -> Option<i64> {
    let naive = match format {
        HumanFormat::DateTime(f) => NaiveDateTime::parse_from_str(input, f).ok()?,
        HumanFormat::Date(f) => NaiveDate::parse_from_str(input, f).ok()?.and_hms_opt(0, 0, 0)?,
        HumanFormat::Time(f) => {
            let time = NaiveTime::parse_from_str(input, f).ok()?;
            NaiveDate::from_ymd_opt(1900, 1, 1)?.and_time(time)
        }
    };
    Local.from_local_datetime(&naive).earliest().map(|dt| dt.timestamp())
}

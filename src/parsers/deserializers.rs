use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Custom deserializer for epoch-second fields that accepts integers, floats
/// (truncated toward zero) and numeric strings. `null` reads as 0.
pub fn deserialize_epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    integer_from_value(&value).map_err(Error::custom)
}

/// Custom deserializer for message type codes, same leniency as timestamps
pub fn deserialize_type_code<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    integer_from_value(&value).map_err(|e| Error::custom(format!("invalid type code: {}", e)))
}

/// Custom deserializer for required text fields.
///
/// Chat exports frequently carry numeric user ids, so numbers and booleans are
/// rendered as text. `null` reads as the empty string.
pub fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(Error::custom("expected a string")),
    }
}

/// Custom deserializer for optional text fields. Empty strings are treated as
/// absent so that serialization (which omits absent fields) round-trips.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = deserialize_lenient_string(deserializer)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

/// Treat an explicit `null` like a missing field
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn integer_from_value(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                Ok(f.trunc() as i64)
            } else {
                Err(format!("number out of range: {}", n))
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(i);
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(f.trunc() as i64),
                _ => Err(format!("not a number: '{}'", s)),
            }
        }
        Value::Null => Ok(0),
        _ => Err("expected a number or numeric string".to_string()),
    }
}

//! Lenient field coercion for incoming JSON bodies.
//!
//! Numeric and boolean book fields arrive from loosely typed clients as
//! numbers, numeric strings or anything else. Unusable values become `None`
//! so the validator reports them instead of the body being rejected outright.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Integer coercion: integers as-is, floats truncated, strings by their
/// leading integer prefix (`"328 pages"` -> 328).
pub fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => leading_int(s),
        _ => None,
    }
}

fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Truthiness coercion used for flags such as `inStock`
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Keep a value only when it is a JSON array, stringifying non-text entries
pub fn tags_from_value(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    })
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

pub fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(int_from_value(&value))
}

pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(truthy(&value))
}

pub fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(tags_from_value(&value))
}

/// Text such as `birthDate`; non-string scalars keep their JSON rendering
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_from_value() {
        assert_eq!(int_from_value(&json!(1925)), Some(1925));
        assert_eq!(int_from_value(&json!(180.9)), Some(180));
        assert_eq!(int_from_value(&json!("1949")), Some(1949));
        assert_eq!(int_from_value(&json!("  328 pages")), Some(328));
        assert_eq!(int_from_value(&json!("-12")), Some(-12));
        assert_eq!(int_from_value(&json!("abc")), None);
        assert_eq!(int_from_value(&json!(null)), None);
        assert_eq!(int_from_value(&json!(true)), None);
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("false")));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(null)));
    }

    #[test]
    fn test_tags_from_value() {
        assert_eq!(
            tags_from_value(&json!(["Fiction", "Classic"])),
            Some(vec!["Fiction".to_string(), "Classic".to_string()])
        );
        assert_eq!(tags_from_value(&json!([])), Some(vec![]));
        assert_eq!(tags_from_value(&json!("Fiction")), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("1896-09-24"), NaiveDate::from_ymd_opt(1896, 9, 24));
        assert_eq!(
            parse_date("1903-06-25T00:00:00Z"),
            NaiveDate::from_ymd_opt(1903, 6, 25)
        );
        assert_eq!(parse_date("yesterday"), None);
    }
}

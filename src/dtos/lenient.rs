// src/dtos/lenient.rs
//
// Form input arrives as loosely typed JSON: numbers may be strings, blanks
// or junk. Amounts that cannot be read are treated as 0.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::AppError;

/// Reads a JSON number or numeric string. Anything else, including
/// non-finite values, is `None`.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// `#[serde(deserialize_with)]` helper: unreadable amounts become `0.0`.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_number).unwrap_or(0.0))
}

/// Like [`number`] but blank input means "not entered".
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(v) if is_blank(&v) => None,
        Some(v) => Some(parse_number(&v).unwrap_or(0.0)),
    })
}

/// Parses a `YYYY-MM-DD` date. A full timestamp (`T` or space after the date)
/// is cut down to its date part; blank input is `None`.
pub fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(s) => s,
    };

    let date_part = match raw.get(10..) {
        Some(rest) if rest.starts_with(['T', ' ']) => &raw[..10],
        _ => raw,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AppError::validation(format!("{field} must be a YYYY-MM-DD date, got \"{raw}\"")))
}

/// Rejects amounts the data model requires to be non-negative.
pub fn non_negative(field: &str, value: f64) -> Result<f64, AppError> {
    if value < 0.0 {
        return Err(AppError::validation(format!("{field} cannot be negative")));
    }
    Ok(value)
}

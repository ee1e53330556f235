//! Parse-with-default helpers for text form fields.
//!
//! The admin UI submits everything as text, so each field gets one
//! documented parsing policy instead of ad hoc truthy checks.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;

/// JSON-text list field (`ingredients`, `quiz_score`). Absent or empty is
/// an empty list; present-but-malformed JSON fails the request instead of
/// silently dropping the caller's data.
pub fn parse_json_list<T: DeserializeOwned>(
    field: &str,
    value: Option<&str>,
) -> Result<Vec<T>, ApiError> {
    match value {
        None => Ok(Vec::new()),
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text)
            .map_err(|_| ApiError::validation(format!("Field '{field}' is not valid JSON"))),
    }
}

/// Price field: parsed as a floating-point number, taken as given
/// (no range validation); absent or non-numeric input becomes 0.
pub fn parse_price(value: Option<&str>) -> f64 {
    value
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0.0)
}

/// Discount field: integer percentage, 0 when absent or non-numeric.
pub fn parse_discount(value: Option<&str>) -> i64 {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Featured flag: true only on an exact `"true"` marker.
pub fn parse_featured(value: Option<&str>) -> bool {
    value == Some("true")
}

/// Coupon discount: accepts a JSON number or a numeric string, 0 otherwise.
pub fn coupon_discount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Coupon active flag: defaults to true unless explicitly set to the
/// string `"false"` (form submissions) or the JSON boolean `false`.
pub fn coupon_active(value: &Value) -> bool {
    !matches!(value, Value::String(s) if s == "false") && !matches!(value, Value::Bool(false))
}

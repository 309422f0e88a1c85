//! Lenient deserializers for client-supplied observation fields.
//!
//! Clients are game scripts that send whatever they have at hand. A bad field
//! must never reject the whole message, so these helpers accept any JSON value
//! and fold the unusable ones into a default.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept any JSON value; keep it only if it is a finite number.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|v| v.is_finite()))
}

/// Accept any JSON value and reduce it to its truthiness.
///
/// `null`, `false`, `0`, and `""` are false; everything else is true.
pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

/// Truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

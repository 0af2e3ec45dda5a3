//! Lenient conversions for form input and legacy persisted values.
//!
//! Counts follow JavaScript `Number` semantics closely enough that data
//! written by the browser tool survives a load/save cycle unchanged.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serializer};

/// Largest magnitude below which whole counts are written as JSON integers.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Converts raw form text into a contract count.
///
/// Blank text is `0`, finite numeric text is taken as-is (fractions
/// included), and anything else is `0`. Negative values pass.
pub fn coerce_count(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) => finite_or_zero(value),
        Err(_) => 0.0,
    }
}

/// Renders a count the way JavaScript's `String(number)` does for typical
/// values: `2` not `2.0`, `1.5` stays `1.5`, `-0` prints as `0`.
pub fn format_count(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }
    value.to_string()
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientCount {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Reads a count written by any version of the storage layout.
///
/// Accepts JSON numbers, numeric strings and `null`.
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LenientCount>::deserialize(deserializer)?;
    Ok(match value {
        Some(LenientCount::Number(value)) => finite_or_zero(value),
        Some(LenientCount::Text(text)) => coerce_count(&text),
        Some(LenientCount::Other(_)) | None => 0.0,
    })
}

/// Writes whole counts as JSON integers, like `JSON.stringify` does.
pub(crate) fn serialize_count<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Reads a text field that may be `null` in legacy data.
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

//! Serde helpers that accept form-style numeric input.
//!
//! Inputs arrive from form fields, so an amount may be a JSON number, a numeric
//! string, an empty string or `null`. Empty values mean "not entered" and
//! deserialize to zero or `None`; text that does not parse becomes `NaN` (for
//! amounts) or `None` (for day and count fields) so that the input policy can
//! decide whether to degrade or reject.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Day and count fields further out than ten years of days are treated as unusable.
const MAX_DAY_MAGNITUDE: f64 = 366.0 * 10.0;

fn whole_number_of(value: &Value) -> Option<i64> {
    let number = number_of(value)?;
    if number.is_finite() && number.fract() == 0.0 && number.abs() <= MAX_DAY_MAGNITUDE {
        Some(number as i64)
    } else {
        None
    }
}

/// Amount field: blank is `0.0`, unparseable is `NaN`.
pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if is_blank(&value) {
        return Ok(0.0);
    }
    Ok(number_of(&value).unwrap_or(f64::NAN))
}

/// Signed day-of-month field. Anchors may sit before day 1 of the month.
pub fn signed_day<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(whole_number_of(&value))
}

/// Positive whole-number field (day numbers, week counts). Zero and negatives are absent.
pub fn positive<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(whole_number_of(&value)
        .filter(|number| *number > 0)
        .and_then(|number| u32::try_from(number).ok()))
}

/// List of signed days, accepting either a JSON array or a comma-separated string
/// such as `"1,15"`. Entries that do not parse are skipped.
pub fn day_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let days = match value {
        Value::Array(items) => items.iter().filter_map(whole_number_of).collect(),
        Value::String(text) => text
            .split(',')
            .filter_map(|part| whole_number_of(&Value::String(part.to_string())))
            .collect(),
        other => whole_number_of(&other).into_iter().collect(),
    };
    Ok(days)
}

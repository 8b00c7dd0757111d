//! Tolerant field decoding for backend payloads.
//!
//! Deployments disagree on whether ids and priorities come back as numbers or
//! numeric strings, so the typed models decode them through these helpers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Largest integer a JSON number can carry without losing precision.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Interprets a scalar as a positive integer id.
///
/// Numbers must be integral and positive; strings are trimmed and parsed the
/// same way. Everything else (null, bool, arrays, objects) yields `None`.
pub fn positive_id(value: &Value) -> Option<u64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.is_finite() && n.fract() == 0.0 && n > 0.0 && n <= MAX_EXACT_INTEGER {
        Some(n as u64)
    } else {
        None
    }
}

/// Interprets a scalar as a finite number, accepting numeric strings.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

pub(crate) fn de_positive_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    positive_id(&value).ok_or_else(|| {
        serde::de::Error::custom(format!("expected positive integer id, got {value}"))
    })
}

pub(crate) fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(positive_id))
}

pub(crate) fn de_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number)
        .filter(|n| n.fract() == 0.0)
        .map(|n| n as i64))
}

pub(crate) fn de_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

pub(crate) fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn positive_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(positive_id(&json!(42)), Some(42));
        assert_eq!(positive_id(&json!(42.0)), Some(42));
        assert_eq!(positive_id(&json!("17")), Some(17));
        assert_eq!(positive_id(&json!(" 9 ")), Some(9));
    }

    #[test]
    fn positive_id_rejects_everything_else() {
        for v in [
            json!(0),
            json!(-3),
            json!(1.5),
            json!(""),
            json!("abc"),
            json!("NaN"),
            json!(true),
            json!(null),
            json!([1]),
            json!({"id": 1}),
        ] {
            assert_eq!(positive_id(&v), None, "value {v}");
        }
    }

    #[test]
    fn number_parses_strings() {
        assert_eq!(number(&json!("3.5")), Some(3.5));
        assert_eq!(number(&json!(7)), Some(7.0));
        assert_eq!(number(&json!("inf")), None);
        assert_eq!(number(&json!(null)), None);
    }
}

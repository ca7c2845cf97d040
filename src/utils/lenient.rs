//! Tolerant field decoding
//!
//! Both datasets are hand-maintained JSON. Identifiers show up as numbers in one
//! file and strings in the other, and coordinates are occasionally null or quoted.
//!
//! Base records use the serde decoders below. Enrichment records go through
//! `take_typed`: a value that does not fit its field is left in place for the
//! record's `extra` map, so nothing the curated file defines is lost.

use serde::{de::DeserializeOwned, de::Error, Deserialize, Deserializer};
use serde_json::{Map, Value};

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Required identifier: string or number, rendered as text.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_string(value).ok_or_else(|| D::Error::custom("expected a string or number"))
}

/// Coordinates must be real JSON numbers; quoted or null values are "missing".
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite()))
}

/// Identifier that may be absent: null, missing or non-scalar reads as ""
pub fn identifier(value: Option<Value>) -> String {
    value.and_then(value_to_string).unwrap_or_default()
}

/// Remove `key` from `fields` and decode it as `T`.
///
/// Null and absent are `None`. A value of the wrong shape is put back under
/// the same key and `None` is returned.
pub fn take_typed<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Option<T> {
    match fields.remove(key)? {
        Value::Null => None,
        raw => match serde_json::from_value(raw.clone()) {
            Ok(typed) => Some(typed),
            Err(_) => {
                fields.insert(key.to_string(), raw);
                None
            }
        },
    }
}

//! Field decoders for remote payloads that substitute a default instead of
//! failing when a value is null or has the wrong JSON type.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::model::answer::Answer;

fn raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Option::<Value>::deserialize(deserializer)
}

/// Only a JSON `true` reads as `true`.
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(raw(deserializer)?, Some(Value::Bool(true))))
}

pub(crate) fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(raw(deserializer)?.as_ref().and_then(Value::as_f64))
}

pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match raw(deserializer)? {
        Some(Value::String(text)) => Some(text),
        _ => None,
    })
}

pub(crate) fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text(deserializer)?.unwrap_or_default())
}

pub(crate) fn answer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Answer>, D::Error> {
    Ok(raw(deserializer)?.and_then(|value| Answer::deserialize(value).ok()))
}

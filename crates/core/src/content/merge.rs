//! Reconciling a stored document with the built-in one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::ContentError;
use super::migrate::migrate;
use super::model::ContentDocument;
use super::sanitize::{sanitize_list, LIST_SECTIONS};

/// Sections merged field by field, so fields added to the built-in document
/// show up in older stored documents.
pub const MERGED_SECTIONS: [&str; 5] = ["general", "contact", "social", "bank", "multimedia"];

/// Turn stored bytes into a fully populated document.
///
/// Migrates first, then overlays stored top-level keys on the defaults,
/// shallow-merges [`MERGED_SECTIONS`] and sanitises every list. Only bytes
/// that are not a JSON object are an error; a stored field of the wrong type
/// is dropped on its own and the default takes its place.
pub fn reconcile(bytes: &[u8], defaults: &ContentDocument) -> Result<ContentDocument, ContentError> {
    let stored = match serde_json::from_slice::<Value>(bytes).map_err(ContentError::Decode)? {
        Value::Object(map) => map,
        other => return Err(ContentError::NotAnObject(json_kind(&other))),
    };
    let stored = migrate(stored, defaults);

    let mut merged = match serde_json::to_value(defaults).map_err(ContentError::Encode)? {
        Value::Object(map) => map,
        other => return Err(ContentError::NotAnObject(json_kind(&other))),
    };

    for (key, value) in stored {
        if value.is_null() {
            continue;
        }
        let value = if MERGED_SECTIONS.contains(&key.as_str()) {
            merge_section(merged.remove(&key), value, &key)
        } else if LIST_SECTIONS.contains(&key.as_str()) {
            Value::Array(sanitize_list(value))
        } else {
            value
        };
        merged.insert(key, value);
    }

    let mut take = |key: &str| merged.remove(key).unwrap_or(Value::Null);
    Ok(ContentDocument {
        version: decode_field("version", take("version"), &defaults.version),
        general: decode_field("general", take("general"), &defaults.general),
        contact: decode_field("contact", take("contact"), &defaults.contact),
        social: decode_field("social", take("social"), &defaults.social),
        bank: decode_field("bank", take("bank"), &defaults.bank),
        history: decode_field("history", take("history"), &defaults.history),
        sermons: decode_list("sermons", take("sermons"), &defaults.sermons),
        services: decode_list("services", take("services"), &defaults.services),
        events: decode_list("events", take("events"), &defaults.events),
        gallery: decode_list("gallery", take("gallery"), &defaults.gallery),
        multimedia: decode_field("multimedia", take("multimedia"), &defaults.multimedia),
    })
}

/// Decode `value` as a `T`. When that fails and `value` is an object, every
/// field that fits is kept on top of `fallback` and the rest are dropped;
/// anything else yields `fallback`.
fn decode_field<T>(section: &str, value: Value, fallback: &T) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    let value = match serde_json::from_value::<T>(value.clone()) {
        Ok(decoded) => return decoded,
        Err(e) => {
            tracing::debug!(section, error = %e, "stored section needs field-by-field decoding");
            value
        }
    };

    let (Value::Object(fields), Ok(Value::Object(mut kept))) = (value, serde_json::to_value(fallback))
    else {
        tracing::warn!(section, "ignoring stored value of the wrong type");
        return fallback.clone();
    };

    for (field, stored) in fields {
        let previous = kept.insert(field.clone(), stored);
        if serde_json::from_value::<T>(Value::Object(kept.clone())).is_err() {
            tracing::warn!(section, %field, "ignoring stored field of the wrong type");
            match previous {
                Some(previous) => kept.insert(field, previous),
                None => kept.remove(&field),
            };
        }
    }

    serde_json::from_value(Value::Object(kept)).unwrap_or_else(|_| fallback.clone())
}

/// Decode a sanitised list entry by entry. Entries are decoded against an
/// empty item, so a bad field reads as blank instead of dropping the entry.
fn decode_list<T>(section: &str, value: Value, fallback: &[T]) -> Vec<T>
where
    T: Serialize + DeserializeOwned + Clone + Default,
{
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| decode_field(section, item, &T::default()))
            .collect(),
        _ => fallback.to_vec(),
    }
}

/// `{ ...default, ...stored }` for one section. A stored section that is not
/// an object is ignored.
fn merge_section(default: Option<Value>, stored: Value, key: &str) -> Value {
    let mut base = match default {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    match stored {
        Value::Object(fields) => base.extend(fields),
        other => {
            tracing::warn!(section = key, kind = json_kind(&other), "ignoring malformed stored section");
        }
    }
    Value::Object(base)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! List sanitising: every list entry is an object with a unique, non-empty
//! string id.

use std::collections::HashSet;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::model::ListItem;

/// Top-level keys holding id-carrying lists.
pub const LIST_SECTIONS: [&str; 4] = ["sermons", "services", "events", "gallery"];

/// Hands out ids that are unique within one list.
#[derive(Debug, Default)]
pub struct IdAllocator {
    seen: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `candidate` when it is non-blank and unused, otherwise mint a
    /// fresh id.
    pub fn claim(&mut self, candidate: Option<String>) -> String {
        if let Some(id) = candidate.filter(|id| !id.trim().is_empty()) {
            if self.seen.insert(id.clone()) {
                return id;
            }
            tracing::debug!(%id, "duplicate list id replaced");
        }
        loop {
            let fresh = generate_id();
            if self.seen.insert(fresh.clone()) {
                return fresh;
            }
        }
    }
}

/// Random lowercase alphanumeric id.
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}

/// Sanitise a raw list value.
///
/// Non-arrays become an empty list and non-object entries are dropped. Truthy
/// ids are coerced to strings; missing, falsy or duplicate ids are replaced.
pub fn sanitize_list(value: Value) -> Vec<Value> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    let mut ids = IdAllocator::new();
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(mut fields) => {
                let candidate = fields.get("id").and_then(id_string);
                fields.insert("id".into(), Value::String(ids.claim(candidate)));
                Some(Value::Object(fields))
            }
            _ => None,
        })
        .collect()
}

/// Sanitise every list present in a raw document or patch, in place. Null
/// lists are left alone and read as absent.
pub fn sanitize_lists(doc: &mut Map<String, Value>) {
    for key in LIST_SECTIONS {
        if let Some(value) = doc.get_mut(key).filter(|v| !v.is_null()) {
            *value = Value::Array(sanitize_list(value.take()));
        }
    }
}

/// Typed counterpart of [`sanitize_list`] for lists built in code.
pub fn ensure_unique_ids<T: ListItem>(items: &mut [T]) {
    let mut ids = IdAllocator::new();
    for item in items {
        let id = ids.claim(Some(item.id().to_string()));
        if id != item.id() {
            item.set_id(id);
        }
    }
}

/// JSON truthiness: null, false, 0, "" and a missing value are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn id_string(value: &Value) -> Option<String> {
    if !is_truthy(Some(value)) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

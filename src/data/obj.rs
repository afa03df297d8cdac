//! Object helpers. Paths are dot separated; numeric segments index arrays.

use serde_json::{Map, Value};

use super::{SearchMode, SearchTarget, search_text};

/// Merge `source` into a copy of `target`. Nested objects merge key by key;
/// anything else in `source` replaces what `target` had.
pub fn deep_merge(target: &Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Object(base), Value::Object(overlay)) => {
            let mut merged = base.clone();
            for (key, value) in overlay {
                let next = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        _ => source.clone(),
    }
}

/// A new object holding only `keys`. Non-objects give `{}`.
pub fn pick(object: &Value, keys: &[&str]) -> Value {
    let Value::Object(map) = object else {
        return Value::Object(Map::new());
    };
    let picked = keys
        .iter()
        .filter_map(|&key| map.get(key).map(|v| (key.to_string(), v.clone())))
        .collect();
    Value::Object(picked)
}

/// A copy without `keys`. Non-objects give `{}`.
pub fn omit(object: &Value, keys: &[&str]) -> Value {
    let Value::Object(map) = object else {
        return Value::Object(Map::new());
    };
    let kept = map
        .iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Value::Object(kept)
}

/// The value at a dot path, if every segment resolves.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Largest gap of nulls `set_path` will pad an array with.
const MAX_ARRAY_PADDING: usize = 1 << 16;

/// Write `new_value` at a dot path, creating objects along the way.
///
/// The empty path replaces `value` itself. A numeric segment on an array
/// indexes it, padding with nulls when the index is past the end; indices
/// more than [`MAX_ARRAY_PADDING`] past the end leave `value` unchanged.
/// A scalar in the way is replaced by an object.
pub fn set_path(value: &mut Value, path: &str, new_value: Value) {
    if path.is_empty() {
        *value = new_value;
        return;
    }
    let mut current = value;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let index = if current.is_array() {
            segment.parse::<usize>().ok()
        } else {
            None
        };
        let slot = match index {
            Some(index) => match array_slot(current, index) {
                Some(slot) => slot,
                None => {
                    tracing::debug!(path, index, "array index too far past the end");
                    return;
                }
            },
            None => object_slot(current, segment),
        };
        if segments.peek().is_none() {
            *slot = new_value;
            return;
        }
        current = slot;
    }
}

fn array_slot(value: &mut Value, index: usize) -> Option<&mut Value> {
    let Value::Array(items) = value else {
        return None;
    };
    if index >= items.len() {
        if index - items.len() >= MAX_ARRAY_PADDING {
            return None;
        }
        items.resize(index + 1, Value::Null);
    }
    items.get_mut(index)
}

fn object_slot<'a>(value: &'a mut Value, key: &str) -> &'a mut Value {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    &mut value[key]
}

/// Top-level entries whose key or value matches `query`, as a new object.
pub fn search(object: &Value, query: &str, mode: SearchMode, target: SearchTarget) -> Value {
    let Value::Object(map) = object else {
        return Value::Object(Map::new());
    };
    let found = map
        .iter()
        .filter(|(key, value)| match target {
            SearchTarget::Keys => mode.matches(key, query),
            SearchTarget::Values => search_text(value).is_some_and(|t| mode.matches(&t, query)),
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Value::Object(found)
}

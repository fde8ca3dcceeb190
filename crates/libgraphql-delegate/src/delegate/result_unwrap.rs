use crate::delegate::DelegationError;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

/// Pull the delegated field's value out of a remote result's `data`.
///
/// The generated document nests the delegated selection `path_len` fields
/// deep, so `path_len + 1` levels of single-entry objects are unwrapped.
/// Missing data, a `null` at any level, or an empty object at any level
/// yields `null`. More than one entry at a level is ambiguous and fails.
pub fn unwrap_result(
    data: Option<&JsonMap<String, JsonValue>>,
    path_len: usize,
) -> Result<JsonValue, DelegationError> {
    let Some(mut current) = data else {
        return Ok(JsonValue::Null);
    };

    for level in 0..=path_len {
        let value = match sole_entry(current, level)? {
            Some(value) => value,
            None => return Ok(JsonValue::Null),
        };

        if level == path_len {
            return Ok(value.clone());
        }

        current = match value {
            JsonValue::Null => return Ok(JsonValue::Null),
            JsonValue::Object(next) => next,
            _ => return Err(DelegationError::UnexpectedResultShape { level }),
        };
    }

    Ok(JsonValue::Null)
}

fn sole_entry(
    map: &JsonMap<String, JsonValue>,
    level: usize,
) -> Result<Option<&JsonValue>, DelegationError> {
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (None, _) => Ok(None),
        (Some((_, value)), None) => Ok(Some(value)),
        (Some(_), Some(_)) => Err(DelegationError::AmbiguousRemoteResult {
            entries: map.keys().cloned().collect(),
            level,
        }),
    }
}

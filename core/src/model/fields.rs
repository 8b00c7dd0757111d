use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, ZentaoError};

/// Serializes a request type into the top-level fields of a JSON body.
pub(crate) fn to_fields<T: Serialize + ?Sized>(
    what: &str,
    value: &T,
) -> Result<Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ZentaoError::Validation(format!(
            "{what} must serialize to an object, got {other}"
        ))),
        Err(err) => Err(ZentaoError::Validation(format!("{what} is not serializable: {err}"))),
    }
}

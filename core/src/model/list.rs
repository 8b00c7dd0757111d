use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, ZentaoError};

/// How strictly a listing response must match `[..]` or `{key: [..]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListShape {
    /// Anything else is a `ResponseShape` error.
    Strict,
    /// A missing or malformed list reads as empty.
    Lenient,
}

/// Extracts the list under `key` (or a bare array) and decodes each entry.
///
/// Entries that fail to decode are skipped; the returned count still includes
/// them so callers can apply paging rules to what the backend actually sent.
pub(crate) fn decode_list<T: DeserializeOwned>(
    operation: &str,
    value: &Value,
    key: &str,
    shape: ListShape,
) -> Result<(Vec<T>, usize)> {
    let items = match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get(key).and_then(Value::as_array),
        _ => None,
    };
    let Some(items) = items else {
        return match shape {
            ListShape::Lenient => Ok((Vec::new(), 0)),
            ListShape::Strict => Err(ZentaoError::response_shape(operation, value)),
        };
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<T>(item.clone()) {
            Ok(decoded) => out.push(decoded),
            Err(err) => {
                tracing::debug!(
                    target: "zentao.http",
                    stage = "decode.skip",
                    operation = operation,
                    error = %err,
                    "skipping undecodable list entry"
                );
            }
        }
    }
    Ok((out, items.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Project;
    use serde_json::json;

    #[test]
    fn accepts_bare_array_and_wrapped() {
        let bare = json!([{"id": 1, "name": "A"}]);
        let wrapped = json!({"projects": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]});
        let (a, _) = decode_list::<Project>("p", &bare, "projects", ListShape::Strict).unwrap();
        let (b, n) = decode_list::<Project>("p", &wrapped, "projects", ListShape::Strict).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!((b.len(), n), (2, 2));
    }

    #[test]
    fn strict_rejects_missing_key() {
        let payload = json!({"data": []});
        let err = decode_list::<Project>("get_projects", &payload, "projects", ListShape::Strict)
            .unwrap_err();
        assert!(matches!(err, ZentaoError::ResponseShape { .. }));
    }

    #[test]
    fn lenient_reads_missing_as_empty() {
        let payload = json!({"total": 0});
        let (items, n) =
            decode_list::<Project>("x", &payload, "projects", ListShape::Lenient).unwrap();
        assert!(items.is_empty());
        assert_eq!(n, 0);
    }

    #[test]
    fn bad_entries_are_skipped_but_counted() {
        let v = json!({"projects": [{"id": 1}, {"name": "no id"}, "junk"]});
        let (items, n) = decode_list::<Project>("x", &v, "projects", ListShape::Strict).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(n, 3);
    }
}

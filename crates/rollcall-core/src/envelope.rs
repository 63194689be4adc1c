//! Response envelope adapter.
//!
//! The backend wraps most payloads as `{ "data": ... }` but some endpoints
//! return the bare payload. Every service call funnels its response through
//! [`unwrap_envelope`] so callers never see the difference.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ClientError;

/// Returns `value.data` when it is present and non-null, else `value` itself.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Unwraps the envelope and decodes the payload into `T`.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    Ok(serde_json::from_value(unwrap_envelope(value))?)
}

/// Takes a named member out of an object, falling back to the whole value.
///
/// Used where an endpoint nests its resource under a key such as `user`.
pub fn pluck(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) => match map.remove(key) {
            Some(inner) if !inner.is_null() => inner,
            Some(inner) => {
                map.insert(key.to_string(), inner);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        code: String,
    }

    #[test]
    fn test_unwraps_data_member() {
        let value = json!({"data": [{"code": "CS"}], "message": "ok"});
        assert_eq!(unwrap_envelope(value), json!([{"code": "CS"}]));
    }

    #[test]
    fn test_bare_payload_passes_through() {
        let value = json!([{"code": "CS"}]);
        assert_eq!(unwrap_envelope(value.clone()), value);
    }

    #[test]
    fn test_null_data_falls_back_to_body() {
        let value = json!({"data": null, "code": "EE"});
        assert_eq!(unwrap_envelope(value.clone()), value);
    }

    #[test]
    fn test_decode_reports_shape_mismatch() {
        let err = decode::<Vec<Item>>(json!({"data": {"code": 1}})).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_decode_enveloped_and_bare_alike() {
        let wrapped: Item = decode(json!({"data": {"code": "CS"}})).unwrap();
        let bare: Item = decode(json!({"code": "CS"})).unwrap();
        assert_eq!(wrapped, bare);
    }

    #[test]
    fn test_pluck_nested_member() {
        let value = json!({"user": {"code": "u1"}, "token": "t"});
        assert_eq!(pluck(value, "user"), json!({"code": "u1"}));
        assert_eq!(pluck(json!({"code": "u1"}), "user"), json!({"code": "u1"}));
    }
}

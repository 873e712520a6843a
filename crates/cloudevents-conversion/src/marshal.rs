//! Default payload marshallers.

use cloudevents_core::Value;
use tracing::trace;

/// Structured-mode default: the payload is embedded as-is.
pub fn identity(value: &Value) -> Value {
    value.clone()
}

/// Binary-mode default: JSON text of the payload, or the payload itself
/// when it holds something JSON cannot carry (bytes, times, variants).
pub fn best_effort_serialize_to_json(value: &Value) -> Value {
    match value.try_to_json() {
        Some(json) => Value::Str(json.to_string()),
        None => {
            trace!(kind = value.kind(), "payload is not JSON serializable, passing through");
            value.clone()
        }
    }
}

/// Default unmarshaller: parses text or bytes as JSON and falls back to the
/// raw input when that fails.
pub fn json_or_raw(content: &Value) -> Value {
    let parsed = match content {
        Value::Str(text) => serde_json::from_str(text),
        Value::Bytes(bytes) => serde_json::from_slice(bytes),
        _ => return content.clone(),
    };
    match parsed {
        Ok(json) => Value::from_json(json),
        Err(_) => content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_json_values() {
        assert_eq!(best_effort_serialize_to_json(&Value::from("hi")), Value::from("\"hi\""));
        assert_eq!(best_effort_serialize_to_json(&Value::from(3)), Value::from("3"));
    }

    #[test]
    fn passes_through_unserializable_values() {
        let bytes = Value::Bytes(vec![0xff, 0x00]);
        assert_eq!(best_effort_serialize_to_json(&bytes), bytes);
    }

    #[test]
    fn unmarshals_json_or_returns_raw() {
        assert_eq!(json_or_raw(&Value::from("[1]")), Value::Array(vec![Value::Integer(1)]));
        assert_eq!(json_or_raw(&Value::Bytes(b"true".to_vec())), Value::Bool(true));
        assert_eq!(json_or_raw(&Value::from("not json")), Value::from("not json"));
        assert_eq!(json_or_raw(&Value::from("")), Value::from(""));
        let binary = Value::Bytes(vec![0xde, 0xad]);
        assert_eq!(json_or_raw(&binary), binary);
    }
}

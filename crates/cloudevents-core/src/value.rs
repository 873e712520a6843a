//! Dynamic attribute and payload [`Value`].

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{Map, Number, Value as JsonValue};

/// Attribute map of an event.
///
/// Keys are case-sensitive. The map is key-sorted, so two maps holding the
/// same pairs compare equal regardless of insertion order.
pub type Attributes = BTreeMap<String, Value>;

/// A weakly-typed value as it travels through the conversion layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Offset-aware timestamp. Rendered as RFC 3339 text on the wire.
    Time(DateTime<FixedOffset>),
    /// An enumerated value: a label plus the primitive it stands for.
    Variant { name: String, value: Box<Value> },
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn variant(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Value::Variant {
            name: name.into(),
            value: Box::new(value.into()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// `true` for an empty string or an empty byte buffer.
    pub fn is_empty_payload(&self) -> bool {
        match self {
            Value::Str(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            _ => false,
        }
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Time(_) => "time",
            Value::Variant { .. } => "variant",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Converts a parsed JSON document into a [`Value`].
    ///
    /// Integers outside the `i64` range become floats.
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => number_to_value(&n),
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Total conversion to JSON.
    ///
    /// Bytes become standard base64 text, times RFC 3339 text, variants
    /// their inner value. Non-finite floats become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Integer(i) => JsonValue::Number((*i).into()),
            Value::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::Bytes(b) => JsonValue::String(STANDARD.encode(b)),
            Value::Time(t) => JsonValue::String(t.to_rfc3339()),
            Value::Variant { value, .. } => value.to_json(),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, JsonValue>>(),
            ),
        }
    }

    /// Strict conversion to JSON: `None` when the value holds anything
    /// plain JSON cannot carry (bytes, times, variants, non-finite floats).
    pub fn try_to_json(&self) -> Option<JsonValue> {
        Some(match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Integer(i) => JsonValue::Number((*i).into()),
            Value::Float(f) => JsonValue::Number(Number::from_f64(*f)?),
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::Bytes(_) | Value::Time(_) | Value::Variant { .. } => return None,
            Value::Array(items) => JsonValue::Array(
                items
                    .iter()
                    .map(Value::try_to_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k.clone(), v.try_to_json()?);
                }
                JsonValue::Object(out)
            }
        })
    }

    /// Renders a value as HTTP header text.
    pub fn render_header(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::Bytes(b) => STANDARD.encode(b),
            Value::Time(t) => t.to_rfc3339(),
            Value::Variant { value, .. } => value.render_header(),
            Value::Array(_) | Value::Object(_) => self.to_json().to_string(),
        }
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Integer(i)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Value::Time(t)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t.fixed_offset())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        Value::from_json(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_conversion_keeps_structure() {
        let doc = json!({"a": [1, 2.5, "x", null, true], "b": {"c": -7}});
        let value = Value::from_json(doc.clone());
        assert_eq!(value.to_json(), doc);
        assert_eq!(value.try_to_json(), Some(doc));
    }

    #[test]
    fn huge_unsigned_becomes_float() {
        let value = Value::from_json(json!(u64::MAX));
        assert!(matches!(value, Value::Float(_)));
    }

    #[test]
    fn strict_json_rejects_non_json_values() {
        assert_eq!(Value::Bytes(vec![1, 2]).try_to_json(), None);
        assert_eq!(Value::variant("RED", "red").try_to_json(), None);
        assert_eq!(Value::Array(vec![Value::Bytes(vec![])]).try_to_json(), None);
        assert_eq!(Value::Float(f64::NAN).try_to_json(), None);
    }

    #[test]
    fn lenient_json_renders_bytes_and_time_as_text() {
        let time = DateTime::parse_from_rfc3339("2018-04-05T17:31:00+02:00").unwrap();
        assert_eq!(Value::Bytes(b"hi".to_vec()).to_json(), json!("aGk="));
        assert_eq!(Value::Time(time).to_json(), json!("2018-04-05T17:31:00+02:00"));
        assert_eq!(Value::variant("ONE", 1).to_json(), json!(1));
    }

    #[test]
    fn header_rendering() {
        assert_eq!(Value::from("abc").render_header(), "abc");
        assert_eq!(Value::from(42).render_header(), "42");
        assert_eq!(Value::from(true).render_header(), "true");
        assert_eq!(Value::variant("A", "a").render_header(), "a");
        assert_eq!(Value::from_json(json!([1, 2])).render_header(), "[1,2]");
    }

    #[test]
    fn empty_payload_detection() {
        assert!(Value::from("").is_empty_payload());
        assert!(Value::Bytes(Vec::new()).is_empty_payload());
        assert!(!Value::from(" ").is_empty_payload());
        assert!(!Value::Null.is_empty_payload());
    }
}

//! Attribute codec and the plain-dictionary form.

use std::collections::BTreeMap;

use cloudevents_core::{CloudEvent, CloudEventError, Value};

/// Dictionary form of an event: attributes at top level, payload under
/// `data`.
pub type EventDict = BTreeMap<String, Value>;

const DATA_KEY: &str = "data";

/// Makes a value wire-safe: variants reduce to their primitive, times to
/// RFC 3339 text. Everything else is returned unchanged.
pub fn best_effort_encode_attribute_value(value: Value) -> Value {
    match value {
        Value::Variant { value, .. } => best_effort_encode_attribute_value(*value),
        Value::Time(time) => Value::Str(time.to_rfc3339()),
        other => other,
    }
}

/// Builds an event from its dictionary form. A `null` payload counts as
/// absent.
pub fn from_dict<E: CloudEvent>(mut dict: EventDict) -> Result<E, CloudEventError> {
    let data = dict.remove(DATA_KEY).filter(|d| !d.is_null());
    let attributes = dict
        .into_iter()
        .map(|(name, value)| (name, best_effort_encode_attribute_value(value)))
        .collect();
    E::create(attributes, data)
}

/// Dictionary form of `event`. The event itself is left untouched.
pub fn to_dict<E: CloudEvent>(event: &E) -> EventDict {
    let mut result = event.attributes().clone();
    result.insert(
        DATA_KEY.to_owned(),
        event.data().cloned().unwrap_or(Value::Null),
    );
    result
}

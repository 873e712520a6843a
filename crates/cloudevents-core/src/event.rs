use std::collections::btree_map::Keys;

use crate::{Attributes, CloudEventError, Value};

/// Keys owned by the wire formats. They never appear inside an attribute
/// map; conversion code merges or strips them.
pub const RESERVED_KEYS: [&str; 2] = ["data", "extensions"];

/// Operations every concrete event representation exposes.
///
/// Implementations own their storage. The conversion layer reads events
/// through [`CloudEvent::attributes`] and [`CloudEvent::data`] and builds
/// them only through [`CloudEvent::create`], so it never depends on how a
/// concrete type is laid out in memory.
pub trait CloudEvent: Sized {
    /// Factory used by every decoder. Receives a plain attribute map
    /// (without `data`/`extensions`) and the optional payload.
    fn create(attributes: Attributes, data: Option<Value>) -> Result<Self, CloudEventError>;

    /// Read-only attribute view. Callers must not assume it outlives the
    /// next mutation of the event.
    fn attributes(&self) -> &Attributes;

    /// Read-only payload view.
    fn data(&self) -> Option<&Value>;

    /// Writes one attribute. Which keys are writable is up to the
    /// implementation.
    fn set(&mut self, key: &str, value: Value) -> Result<(), CloudEventError>;

    /// Deletes one attribute, returning the previous value if any.
    fn remove(&mut self, key: &str) -> Result<Option<Value>, CloudEventError>;

    /// Attribute lookup that never fails.
    fn get(&self, key: &str) -> Option<&Value> {
        self.attributes().get(key)
    }

    fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.get(key).unwrap_or(default)
    }

    /// Indexed read: reports [`CloudEventError::KeyNotFound`] on absence.
    fn try_get(&self, key: &str) -> Result<&Value, CloudEventError> {
        self.get(key)
            .ok_or_else(|| CloudEventError::KeyNotFound(key.to_owned()))
    }

    fn keys(&self) -> Keys<'_, String, Value> {
        self.attributes().keys()
    }

    fn contains(&self, key: &str) -> bool {
        self.attributes().contains_key(key)
    }

    fn len(&self) -> usize {
        self.attributes().len()
    }

    fn is_empty(&self) -> bool {
        self.attributes().is_empty()
    }

    fn specversion(&self) -> Option<&str> {
        self.get("specversion").and_then(Value::as_str)
    }

    /// Structural equality across implementations: same attribute map and
    /// same payload.
    fn same_event<E: CloudEvent>(&self, other: &E) -> bool {
        self.data() == other.data() && self.attributes() == other.attributes()
    }
}

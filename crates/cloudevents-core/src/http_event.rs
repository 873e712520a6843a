//! [`HttpEvent`], the stock event representation.

use std::ops::Index;

use chrono::Utc;
use uuid::Uuid;

use crate::event::RESERVED_KEYS;
use crate::{Attributes, CloudEvent, CloudEventError, Value};

pub const DEFAULT_SPEC_VERSION: &str = "1.0";

/// Attributes every event must carry.
pub const REQUIRED_ATTRIBUTES: [&str; 4] = ["specversion", "id", "source", "type"];

/// A plain in-memory event: one attribute map plus an optional payload.
#[derive(Debug, Clone)]
pub struct HttpEvent {
    attributes: Attributes,
    data: Option<Value>,
}

impl HttpEvent {
    /// Authors a fresh event.
    ///
    /// Missing `specversion`, `id` and `time` are filled in (`1.0`, a random
    /// UUID, the current UTC time); `source` and `type` must be supplied.
    pub fn new(mut attributes: Attributes, data: Option<Value>) -> Result<Self, CloudEventError> {
        attributes
            .entry("specversion".to_owned())
            .or_insert_with(|| Value::from(DEFAULT_SPEC_VERSION));
        attributes
            .entry("id".to_owned())
            .or_insert_with(|| Value::Str(Uuid::new_v4().to_string()));
        attributes
            .entry("time".to_owned())
            .or_insert_with(|| Value::Str(Utc::now().to_rfc3339()));
        Self::create(attributes, data)
    }

    pub fn set_data(&mut self, data: Option<Value>) {
        self.data = data.filter(|d| !d.is_null());
    }

    pub fn into_parts(self) -> (Attributes, Option<Value>) {
        (self.attributes, self.data)
    }
}

impl CloudEvent for HttpEvent {
    fn create(attributes: Attributes, data: Option<Value>) -> Result<Self, CloudEventError> {
        if let Some(key) = RESERVED_KEYS.iter().find(|k| attributes.contains_key(**k)) {
            return Err(CloudEventError::ReservedAttribute((*key).to_owned()));
        }
        let missing: Vec<&str> = REQUIRED_ATTRIBUTES
            .iter()
            .copied()
            .filter(|k| attributes.get(*k).map_or(true, Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(CloudEventError::MissingRequiredFields(missing.join(", ")));
        }
        Ok(Self {
            attributes,
            data: data.filter(|d| !d.is_null()),
        })
    }

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), CloudEventError> {
        if RESERVED_KEYS.contains(&key) {
            return Err(CloudEventError::ReservedAttribute(key.to_owned()));
        }
        if key == "specversion" {
            return Err(CloudEventError::ReadOnlyAttribute(key.to_owned()));
        }
        self.attributes.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<Option<Value>, CloudEventError> {
        if REQUIRED_ATTRIBUTES.contains(&key) {
            return Err(CloudEventError::ReadOnlyAttribute(key.to_owned()));
        }
        Ok(self.attributes.remove(key))
    }
}

impl<E: CloudEvent> PartialEq<E> for HttpEvent {
    fn eq(&self, other: &E) -> bool {
        self.same_event(other)
    }
}

impl Index<&str> for HttpEvent {
    type Output = Value;

    /// Panics when the attribute is absent; use [`CloudEvent::try_get`] to
    /// get an error instead.
    fn index(&self, key: &str) -> &Value {
        match self.attributes.get(key) {
            Some(value) => value,
            None => panic!("attribute not found: {key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn new_fills_defaults() {
        let event = HttpEvent::new(attrs(&[("source", "s"), ("type", "t")]), None).unwrap();
        assert_eq!(event.specversion(), Some("1.0"));
        assert!(event.contains("id"));
        assert!(event.contains("time"));
        assert_eq!(event.len(), 5);
    }

    #[test]
    fn new_requires_source_and_type() {
        let err = HttpEvent::new(attrs(&[("source", "s")]), None).unwrap_err();
        assert_eq!(err, CloudEventError::MissingRequiredFields("type".into()));
    }

    #[test]
    fn create_keeps_attributes_verbatim() {
        let event = HttpEvent::create(
            attrs(&[("specversion", "1.0"), ("id", "1"), ("source", "s"), ("type", "t")]),
            None,
        )
        .unwrap();
        assert_eq!(event.len(), 4);
        assert!(!event.contains("time"));
    }

    #[test]
    fn create_rejects_reserved_keys() {
        let mut attributes = attrs(&[("specversion", "1.0"), ("id", "1"), ("source", "s"), ("type", "t")]);
        attributes.insert("extensions".into(), Value::Object(Default::default()));
        let err = HttpEvent::create(attributes, None).unwrap_err();
        assert_eq!(err, CloudEventError::ReservedAttribute("extensions".into()));
    }

    #[test]
    fn lookup_operations() {
        let event = HttpEvent::new(attrs(&[("source", "s"), ("type", "t")]), Some("x".into())).unwrap();
        assert_eq!(event.get("source"), Some(&Value::from("s")));
        assert_eq!(event.get("missing"), None);
        let fallback = Value::from("fallback");
        assert_eq!(event.get_or("missing", &fallback), &fallback);
        assert_eq!(event["type"], Value::from("t"));
        assert_eq!(
            event.try_get("missing"),
            Err(CloudEventError::KeyNotFound("missing".into()))
        );
        assert_eq!(event.keys().count(), event.len());
    }

    #[test]
    #[should_panic(expected = "attribute not found: nope")]
    fn index_panics_on_absent_key() {
        let event = HttpEvent::new(attrs(&[("source", "s"), ("type", "t")]), None).unwrap();
        let _ = &event["nope"];
    }

    #[test]
    fn mutation_rules() {
        let mut event = HttpEvent::new(attrs(&[("source", "s"), ("type", "t")]), None).unwrap();
        event.set("subject", "sub".into()).unwrap();
        assert_eq!(event.get("subject"), Some(&Value::from("sub")));
        assert_eq!(event.remove("subject").unwrap(), Some(Value::from("sub")));
        assert_eq!(
            event.set("specversion", "0.3".into()),
            Err(CloudEventError::ReadOnlyAttribute("specversion".into()))
        );
        assert_eq!(
            event.set("data", "x".into()),
            Err(CloudEventError::ReservedAttribute("data".into()))
        );
        assert_eq!(
            event.remove("id"),
            Err(CloudEventError::ReadOnlyAttribute("id".into()))
        );
    }

    #[test]
    fn null_payload_is_absent() {
        let mut event = HttpEvent::new(attrs(&[("source", "s"), ("type", "t")]), Some(Value::Null)).unwrap();
        assert_eq!(event.data(), None);
        event.set_data(Some(Value::from(3)));
        assert_eq!(event.data(), Some(&Value::Integer(3)));
    }
}

//! Version-specific working handlers.

pub mod v03;
pub mod v1;

use cloudevents_core::{Attributes, Value};

/// Attribute layout of one specification version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub version: &'static str,
    /// Context attributes defined by the version; anything else is an
    /// extension.
    pub attributes: &'static [&'static str],
    pub required: &'static [&'static str],
}

impl AttributeSpec {
    pub fn is_known(&self, name: &str) -> bool {
        self.attributes.contains(&name)
    }
}

/// A mutable, version-aware attribute container scoped to one conversion.
pub trait EventHandler {
    fn spec(&self) -> &AttributeSpec;

    /// Stores `value` under `name`. `data` targets the payload slot, known
    /// context attributes the core map, everything else the extensions.
    /// A `Null` value clears the attribute.
    fn set(&mut self, name: &str, value: Value);

    fn get(&self, name: &str) -> Option<&Value>;

    fn data(&self) -> Option<&Value>;

    fn set_data(&mut self, data: Option<Value>);

    fn take_data(&mut self) -> Option<Value>;

    fn extensions(&self) -> &Attributes;

    /// Populated context attributes, extensions excluded.
    fn properties(&self) -> Attributes;

    fn spec_version(&self) -> &'static str {
        self.spec().version
    }

    fn content_type(&self) -> Option<&str> {
        self.get("datacontenttype").and_then(Value::as_str)
    }

    fn set_content_type(&mut self, content_type: &str) {
        self.set("datacontenttype", Value::from(content_type));
    }
}

/// The stock handler: one struct driven by an [`AttributeSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedEvent {
    spec: &'static AttributeSpec,
    core: Attributes,
    extensions: Attributes,
    data: Option<Value>,
}

impl VersionedEvent {
    pub fn new(spec: &'static AttributeSpec) -> Self {
        let mut core = Attributes::new();
        core.insert("specversion".to_owned(), Value::from(spec.version));
        Self {
            spec,
            core,
            extensions: Attributes::new(),
            data: None,
        }
    }
}

impl EventHandler for VersionedEvent {
    fn spec(&self) -> &AttributeSpec {
        self.spec
    }

    fn set(&mut self, name: &str, value: Value) {
        if name == "data" {
            self.set_data(Some(value));
            return;
        }
        let target = if self.spec.is_known(name) {
            &mut self.core
        } else {
            &mut self.extensions
        };
        if value.is_null() {
            target.remove(name);
        } else {
            target.insert(name.to_owned(), value);
        }
    }

    fn get(&self, name: &str) -> Option<&Value> {
        if name == "data" {
            return self.data.as_ref();
        }
        self.core.get(name).or_else(|| self.extensions.get(name))
    }

    fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    fn set_data(&mut self, data: Option<Value>) {
        self.data = data.filter(|d| !d.is_null());
    }

    fn take_data(&mut self) -> Option<Value> {
        self.data.take()
    }

    fn extensions(&self) -> &Attributes {
        &self.extensions
    }

    fn properties(&self) -> Attributes {
        self.core.clone()
    }
}

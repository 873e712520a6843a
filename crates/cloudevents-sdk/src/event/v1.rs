//! Specification version `1.0`.

use super::{AttributeSpec, VersionedEvent};

pub static SPEC: AttributeSpec = AttributeSpec {
    version: "1.0",
    attributes: &[
        "specversion",
        "id",
        "source",
        "type",
        "datacontenttype",
        "dataschema",
        "subject",
        "time",
    ],
    required: &["specversion", "id", "source", "type"],
};

pub fn event() -> VersionedEvent {
    VersionedEvent::new(&SPEC)
}

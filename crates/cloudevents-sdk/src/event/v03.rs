//! Specification version `0.3`.

use super::{AttributeSpec, VersionedEvent};

pub static SPEC: AttributeSpec = AttributeSpec {
    version: "0.3",
    attributes: &[
        "specversion",
        "id",
        "source",
        "type",
        "datacontenttype",
        "datacontentencoding",
        "schemaurl",
        "subject",
        "time",
    ],
    required: &["specversion", "id", "source", "type"],
};

pub fn event() -> VersionedEvent {
    VersionedEvent::new(&SPEC)
}

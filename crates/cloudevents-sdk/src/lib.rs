//! Per-version CloudEvents handlers and the HTTP renderer.
//!
//! A handler is a short-lived, version-aware attribute container: the
//! conversion engine copies an event into one, lets the renderer turn it into
//! headers and a body (or the reverse), and drops it at the end of the call.

pub mod converters;
pub mod event;
mod marshaller;

pub use converters::{is_binary, normalize_headers, Headers, Mode};
pub use event::{v03, v1, AttributeSpec, EventHandler, VersionedEvent};
pub use marshaller::{DataMarshaller, DataUnmarshaller, HttpMarshaller};

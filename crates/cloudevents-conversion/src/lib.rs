//! Conversion engine between CloudEvents and their wire representations.
//!
//! Every entry point is a pure transform: it builds a transient working
//! handler for the event's specification version, renders or parses through
//! it, and hands plain attributes plus payload to [`CloudEvent::create`].
//!
//! [`CloudEvent::create`]: cloudevents_core::CloudEvent::create

mod cbor;
mod codec;
mod http;
mod marshal;
mod registry;

pub use cbor::{from_cbor, to_cbor, URI_TAG, WELL_KNOWN_URI_ATTRIBUTES};
pub use codec::{best_effort_encode_attribute_value, from_dict, to_dict, EventDict};
pub use http::{from_http, from_json, to_binary, to_http, to_json, to_structured};
pub use marshal::{best_effort_serialize_to_json, identity, json_or_raw};
pub use registry::{HandlerFactory, Registry};

pub use cloudevents_core::{Attributes, CloudEvent, CloudEventError, HttpEvent, Value};
pub use cloudevents_sdk::{DataMarshaller, DataUnmarshaller, Headers, Mode};

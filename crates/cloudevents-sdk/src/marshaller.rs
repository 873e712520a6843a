use cloudevents_core::{CloudEventError, Value};
use tracing::debug;

use crate::converters::{binary, normalize_headers, structured, Headers, Mode};
use crate::EventHandler;

/// Turns an event payload into a wire value before rendering.
pub type DataMarshaller = dyn Fn(&Value) -> Value;

/// Turns a raw wire payload (text or bytes) into an event payload.
pub type DataUnmarshaller = dyn Fn(&Value) -> Value;

/// Mechanical HTTP reader/writer over a working handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpMarshaller;

impl HttpMarshaller {
    pub fn new() -> Self {
        Self
    }

    /// Fills `handler` from a request, picking the mode from the headers.
    pub fn decode(
        &self,
        handler: &mut dyn EventHandler,
        headers: &Headers,
        body: &Value,
        unmarshaller: &DataUnmarshaller,
    ) -> Result<(), CloudEventError> {
        let headers = normalize_headers(headers);
        let mode = Mode::detect(&headers);
        debug!(%mode, version = handler.spec_version(), "decoding http event");
        match mode {
            Mode::Binary => binary::read(handler, &headers, body, unmarshaller),
            Mode::Structured => structured::read(handler, body, unmarshaller),
        }
    }

    pub fn encode(
        &self,
        handler: &dyn EventHandler,
        mode: Mode,
        marshaller: &DataMarshaller,
    ) -> (Headers, Vec<u8>) {
        debug!(%mode, version = handler.spec_version(), "encoding http event");
        match mode {
            Mode::Binary => binary::write(handler, marshaller),
            Mode::Structured => structured::write(handler, marshaller),
        }
    }
}

//! HTTP binary/structured and JSON conversions.

use cloudevents_core::{CloudEvent, CloudEventError, Value, RESERVED_KEYS};
use cloudevents_sdk::converters::structured::parse_body;
use cloudevents_sdk::converters::SPECVERSION_HEADER;
use cloudevents_sdk::{
    normalize_headers, DataMarshaller, DataUnmarshaller, Headers, HttpMarshaller, Mode,
};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::marshal::{best_effort_serialize_to_json, identity, json_or_raw};
use crate::registry::Registry;

impl Registry {
    /// Renders `event` as HTTP headers and body in the given mode.
    ///
    /// Without a marshaller, structured mode embeds the payload as-is and
    /// binary mode JSON-encodes it when it can.
    pub fn to_http<E: CloudEvent>(
        &self,
        event: &E,
        mode: Mode,
        data_marshaller: Option<&DataMarshaller>,
    ) -> Result<(Headers, Vec<u8>), CloudEventError> {
        let version = match event.try_get("specversion") {
            Ok(Value::Str(version)) => version.as_str(),
            Ok(other) => {
                return Err(CloudEventError::InvalidRequiredFields(format!(
                    "unsupported specversion: {}",
                    other.render_header()
                )))
            }
            Err(_) => {
                return Err(CloudEventError::MissingRequiredFields(
                    "event has no specversion".to_owned(),
                ))
            }
        };
        let mut handler = self.handler(version).ok_or_else(|| {
            CloudEventError::InvalidRequiredFields(format!("unsupported specversion: {version}"))
        })?;
        for (name, value) in event.attributes() {
            handler.set(name, value.clone());
        }
        handler.set_data(event.data().cloned());

        let marshaller: &DataMarshaller = match (data_marshaller, mode) {
            (Some(marshaller), _) => marshaller,
            (None, Mode::Structured) => &identity,
            (None, Mode::Binary) => &best_effort_serialize_to_json,
        };
        Ok(HttpMarshaller::new().encode(&*handler, mode, marshaller))
    }

    /// Parses an HTTP request into an event of type `E`, inferring the mode
    /// and the specification version from the request itself.
    ///
    /// A missing or `null` body is treated as an empty one.
    pub fn from_http<E: CloudEvent>(
        &self,
        headers: &Headers,
        data: Option<&Value>,
        data_unmarshaller: Option<&DataUnmarshaller>,
    ) -> Result<E, CloudEventError> {
        let body = match data {
            None | Some(Value::Null) => Value::Str(String::new()),
            Some(Value::Bytes(bytes)) if bytes.is_empty() => Value::Str(String::new()),
            Some(body @ (Value::Str(_) | Value::Bytes(_))) => body.clone(),
            Some(other) => {
                return Err(CloudEventError::InvalidStructuredJson(format!(
                    "expected json of type text or bytes, but found {}",
                    other.kind()
                )))
            }
        };
        let headers = normalize_headers(headers);
        let unmarshaller: &DataUnmarshaller = data_unmarshaller.unwrap_or(&json_or_raw);

        let mode = Mode::detect(&headers);
        let version = match mode {
            Mode::Binary => headers.get(SPECVERSION_HEADER).cloned(),
            Mode::Structured => specversion_from_body(&body)?,
        }
        .ok_or_else(|| {
            CloudEventError::MissingRequiredFields(
                "failed to find specversion in HTTP request".to_owned(),
            )
        })?;
        debug!(%mode, %version, "resolved incoming event");

        let mut handler = self.handler(&version).ok_or_else(|| {
            CloudEventError::InvalidRequiredFields(format!("found invalid specversion {version}"))
        })?;
        HttpMarshaller::new().decode(&mut *handler, &headers, &body, unmarshaller)?;

        let mut attributes = handler.properties();
        attributes.extend(handler.extensions().clone());
        for key in RESERVED_KEYS {
            attributes.remove(key);
        }
        let data = handler.take_data().filter(|d| !d.is_empty_payload());
        E::create(attributes, data)
    }
}

/// Reads `specversion` from a structured body.
///
/// `Ok(None)` when the key is absent or `null`. A non-string value can never
/// name a known version.
fn specversion_from_body(body: &Value) -> Result<Option<String>, CloudEventError> {
    let raw = parse_body(body).map_err(|_| {
        CloudEventError::MissingRequiredFields(
            "failed to read specversion from both headers and data, body is not valid JSON"
                .to_owned(),
        )
    })?;
    let JsonValue::Object(doc) = raw else {
        return Err(CloudEventError::MissingRequiredFields(
            "failed to read specversion from both headers and data, body is not a JSON object"
                .to_owned(),
        ));
    };
    Ok(match doc.get("specversion") {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(version)) => Some(version.clone()),
        Some(other) => {
            return Err(CloudEventError::InvalidRequiredFields(format!(
                "found invalid specversion {other}"
            )))
        }
    })
}

/// Renders `event` in `mode` using the global registry.
pub fn to_http<E: CloudEvent>(
    event: &E,
    mode: Mode,
    data_marshaller: Option<&DataMarshaller>,
) -> Result<(Headers, Vec<u8>), CloudEventError> {
    Registry::global().to_http(event, mode, data_marshaller)
}

/// Structured-mode rendering. A raw byte payload is written under
/// `data_base64`.
pub fn to_structured<E: CloudEvent>(
    event: &E,
    data_marshaller: Option<&DataMarshaller>,
) -> Result<(Headers, Vec<u8>), CloudEventError> {
    to_http(event, Mode::Structured, data_marshaller)
}

pub fn to_binary<E: CloudEvent>(
    event: &E,
    data_marshaller: Option<&DataMarshaller>,
) -> Result<(Headers, Vec<u8>), CloudEventError> {
    to_http(event, Mode::Binary, data_marshaller)
}

/// The structured-mode body alone.
pub fn to_json<E: CloudEvent>(
    event: &E,
    data_marshaller: Option<&DataMarshaller>,
) -> Result<Vec<u8>, CloudEventError> {
    to_structured(event, data_marshaller).map(|(_, body)| body)
}

/// Parses an HTTP request using the global registry.
pub fn from_http<E: CloudEvent>(
    headers: &Headers,
    data: Option<&Value>,
    data_unmarshaller: Option<&DataUnmarshaller>,
) -> Result<E, CloudEventError> {
    Registry::global().from_http(headers, data, data_unmarshaller)
}

/// Parses a structured JSON document (text or bytes).
pub fn from_json<E: CloudEvent>(
    data: impl Into<Value>,
    data_unmarshaller: Option<&DataUnmarshaller>,
) -> Result<E, CloudEventError> {
    from_http(&Headers::new(), Some(&data.into()), data_unmarshaller)
}

//! Structured mode: one JSON document carrying attributes and payload.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cloudevents_core::{CloudEventError, Value};
use serde_json::{Map, Value as JsonValue};

use super::{Headers, CONTENT_TYPE_HEADER, STRUCTURED_CONTENT_TYPE};
use crate::{DataMarshaller, DataUnmarshaller, EventHandler};

const DATA_KEY: &str = "data";
const DATA_BASE64_KEY: &str = "data_base64";

pub fn write(handler: &dyn EventHandler, marshaller: &DataMarshaller) -> (Headers, Vec<u8>) {
    let mut doc = Map::new();
    for (name, value) in handler.properties().iter().chain(handler.extensions().iter()) {
        doc.insert(name.clone(), value.to_json());
    }
    if let Some(data) = handler.data() {
        match marshaller(data) {
            Value::Bytes(bytes) => {
                doc.insert(DATA_BASE64_KEY.to_owned(), JsonValue::String(STANDARD.encode(bytes)));
            }
            other => {
                doc.insert(DATA_KEY.to_owned(), other.to_json());
            }
        }
    }
    let mut headers = Headers::new();
    headers.insert(CONTENT_TYPE_HEADER.to_owned(), STRUCTURED_CONTENT_TYPE.to_owned());
    (headers, JsonValue::Object(doc).to_string().into_bytes())
}

/// Parses a text or byte body as JSON.
pub fn parse_body(body: &Value) -> Result<JsonValue, CloudEventError> {
    let parsed = match body {
        Value::Str(text) => serde_json::from_str(text),
        Value::Bytes(bytes) => serde_json::from_slice(bytes),
        other => {
            return Err(CloudEventError::InvalidStructuredJson(format!(
                "expected text or bytes, found {}",
                other.kind()
            )))
        }
    };
    parsed.map_err(|e| CloudEventError::MissingRequiredFields(format!("body is not valid JSON: {e}")))
}

pub fn read(
    handler: &mut dyn EventHandler,
    body: &Value,
    unmarshaller: &DataUnmarshaller,
) -> Result<(), CloudEventError> {
    let JsonValue::Object(doc) = parse_body(body)? else {
        return Err(CloudEventError::MissingRequiredFields(
            "structured body is not a JSON object".to_owned(),
        ));
    };
    let missing: Vec<&str> = handler
        .spec()
        .required
        .iter()
        .copied()
        .filter(|field| !doc.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(CloudEventError::MissingRequiredFields(format!(
            "missing required attributes: {}",
            missing.join(", ")
        )));
    }
    for (name, value) in doc {
        match name.as_str() {
            DATA_KEY => {
                let text = Value::Str(value.to_string());
                handler.set_data(Some(unmarshaller(&text)));
            }
            DATA_BASE64_KEY => {
                let encoded = value.as_str().ok_or_else(|| {
                    CloudEventError::InvalidStructuredJson("data_base64 must be a string".to_owned())
                })?;
                let bytes = STANDARD.decode(encoded).map_err(|e| {
                    CloudEventError::InvalidStructuredJson(format!("invalid data_base64: {e}"))
                })?;
                handler.set_data(Some(unmarshaller(&Value::Bytes(bytes))));
            }
            _ => handler.set(&name, Value::from_json(value)),
        }
    }
    Ok(())
}

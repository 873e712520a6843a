//! Binary mode: attributes as `ce-*` headers, payload as the body.

use cloudevents_core::{CloudEventError, Value};
use tracing::trace;

use super::{Headers, CE_HEADER_PREFIX, CONTENT_TYPE_HEADER};
use crate::{DataMarshaller, DataUnmarshaller, EventHandler};

pub fn write(handler: &dyn EventHandler, marshaller: &DataMarshaller) -> (Headers, Vec<u8>) {
    let mut headers = Headers::new();
    if let Some(content_type) = handler.content_type() {
        headers.insert(CONTENT_TYPE_HEADER.to_owned(), content_type.to_owned());
    }
    let properties = handler.properties();
    let attributes = properties
        .iter()
        .filter(|(name, _)| name.as_str() != "datacontenttype")
        .chain(handler.extensions().iter());
    for (name, value) in attributes {
        if value.is_null() {
            continue;
        }
        headers.insert(format!("{CE_HEADER_PREFIX}{name}"), value.render_header());
    }
    let body = handler
        .data()
        .map(|data| body_bytes(marshaller(data)))
        .unwrap_or_default();
    (headers, body)
}

/// Fills `handler` from lowercased `headers` and the raw `body`.
pub fn read(
    handler: &mut dyn EventHandler,
    headers: &Headers,
    body: &Value,
    unmarshaller: &DataUnmarshaller,
) -> Result<(), CloudEventError> {
    let missing: Vec<&str> = handler
        .spec()
        .required
        .iter()
        .copied()
        .filter(|field| !headers.contains_key(&format!("{CE_HEADER_PREFIX}{field}")))
        .collect();
    if !missing.is_empty() {
        return Err(CloudEventError::MissingRequiredFields(format!(
            "missing required attribute headers: {}",
            missing.join(", ")
        )));
    }
    for (name, value) in headers {
        if name == CONTENT_TYPE_HEADER {
            handler.set_content_type(value);
        } else if let Some(attribute) = name.strip_prefix(CE_HEADER_PREFIX) {
            handler.set(attribute, Value::Str(value.clone()));
        } else {
            trace!(header = %name, "ignoring non-event header");
        }
    }
    handler.set_data(Some(unmarshaller(body)));
    Ok(())
}

/// Turns a marshalled payload into body bytes.
pub(crate) fn body_bytes(value: Value) -> Vec<u8> {
    match value {
        Value::Null => Vec::new(),
        Value::Str(s) => s.into_bytes(),
        Value::Bytes(b) => b,
        other => other.to_json().to_string().into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::v1;

    fn identity(value: &Value) -> Value {
        value.clone()
    }

    #[test]
    fn writes_one_header_per_attribute() {
        let mut handler = v1::event();
        handler.set("id", Value::from("1"));
        handler.set("source", Value::from("s"));
        handler.set("type", Value::from("t"));
        handler.set("datacontenttype", Value::from("text/plain"));
        handler.set("myext", Value::from(7));
        handler.set_data(Some(Value::from("hello")));

        let (headers, body) = write(&handler, &identity);
        assert_eq!(headers.get("ce-specversion").map(String::as_str), Some("1.0"));
        assert_eq!(headers.get("ce-id").map(String::as_str), Some("1"));
        assert_eq!(headers.get("ce-myext").map(String::as_str), Some("7"));
        assert_eq!(headers.get("content-type").map(String::as_str), Some("text/plain"));
        assert!(!headers.contains_key("ce-datacontenttype"));
        assert_eq!(body, b"hello".to_vec());
    }

    #[test]
    fn absent_payload_is_empty_body() {
        let (_, body) = write(&v1::event(), &identity);
        assert!(body.is_empty());
    }

    #[test]
    fn reads_headers_into_attributes() {
        let mut headers = Headers::new();
        for (k, v) in [
            ("ce-specversion", "1.0"),
            ("ce-id", "1"),
            ("ce-source", "s"),
            ("ce-type", "t"),
            ("ce-myext", "x"),
            ("content-type", "application/json"),
            ("user-agent", "curl"),
        ] {
            headers.insert(k.into(), v.into());
        }
        let mut handler = v1::event();
        read(&mut handler, &headers, &Value::from("body"), &identity).unwrap();
        assert_eq!(handler.get("id"), Some(&Value::from("1")));
        assert_eq!(handler.extensions().get("myext"), Some(&Value::from("x")));
        assert_eq!(handler.content_type(), Some("application/json"));
        assert!(!handler.extensions().contains_key("user-agent"));
        assert_eq!(handler.data(), Some(&Value::from("body")));
    }

    #[test]
    fn missing_required_headers() {
        let mut headers = Headers::new();
        headers.insert("ce-specversion".into(), "1.0".into());
        headers.insert("ce-id".into(), "1".into());
        let err = read(&mut v1::event(), &headers, &Value::from(""), &identity).unwrap_err();
        assert!(matches!(err, CloudEventError::MissingRequiredFields(msg) if msg.contains("source")));
    }

    #[test]
    fn body_bytes_by_kind() {
        assert_eq!(body_bytes(Value::from("é")), "é".as_bytes().to_vec());
        assert_eq!(body_bytes(Value::Bytes(vec![0, 1])), vec![0, 1]);
        assert_eq!(body_bytes(Value::from(12)), b"12".to_vec());
        assert!(body_bytes(Value::Null).is_empty());
    }
}

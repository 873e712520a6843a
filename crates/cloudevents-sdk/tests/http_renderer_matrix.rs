use cloudevents_core::Value;
use cloudevents_sdk::{v03, v1, EventHandler, Headers, HttpMarshaller, Mode, VersionedEvent};

fn identity(value: &Value) -> Value {
    value.clone()
}

fn populated(mut handler: VersionedEvent) -> VersionedEvent {
    handler.set("id", Value::from("abc"));
    handler.set("source", Value::from("/sensors/1"));
    handler.set("type", Value::from("com.example.reading"));
    handler.set("subject", Value::from("temp"));
    handler.set("datacontenttype", Value::from("text/plain"));
    handler.set("traceparent", Value::from("00-1-2-01"));
    handler.set_data(Some(Value::from("21.5C")));
    handler
}

#[test]
fn encode_then_decode_matrix() {
    let marshaller = HttpMarshaller::new();
    let cases: Vec<(fn() -> VersionedEvent, Mode)> = vec![
        (v1::event, Mode::Binary),
        (v1::event, Mode::Structured),
        (v03::event, Mode::Binary),
        (v03::event, Mode::Structured),
    ];
    for (factory, mode) in cases {
        let source = populated(factory());
        let (headers, body) = marshaller.encode(&source, mode, &identity);

        let mut decoded = factory();
        marshaller
            .decode(&mut decoded, &headers, &Value::Bytes(body), &|raw: &Value| match raw {
                Value::Bytes(b) => Value::Str(String::from_utf8_lossy(b).into_owned()),
                Value::Str(s) => serde_json::from_str(s).map(Value::from_json).unwrap_or_else(|_| raw.clone()),
                other => other.clone(),
            })
            .unwrap_or_else(|e| panic!("decode failed for {mode}: {e}"));

        assert_eq!(decoded.properties(), source.properties(), "properties for {mode}");
        assert_eq!(decoded.extensions(), source.extensions(), "extensions for {mode}");
        assert_eq!(decoded.data(), source.data(), "data for {mode}");
    }
}

#[test]
fn decode_accepts_mixed_case_headers() {
    let mut headers = Headers::new();
    for (k, v) in [
        ("CE-SpecVersion", "1.0"),
        ("Ce-Id", "1"),
        ("CE-SOURCE", "s"),
        ("ce-Type", "t"),
        ("Content-Type", "application/octet-stream"),
    ] {
        headers.insert(k.into(), v.into());
    }
    let mut handler = v1::event();
    HttpMarshaller::new()
        .decode(&mut handler, &headers, &Value::Bytes(vec![1, 2, 3]), &identity)
        .unwrap();
    assert_eq!(handler.get("source"), Some(&Value::from("s")));
    assert_eq!(handler.content_type(), Some("application/octet-stream"));
    assert_eq!(handler.data(), Some(&Value::Bytes(vec![1, 2, 3])));
}

//! CBOR conversions (cargo feature `cbor`).
//!
//! `time` strings are written as native CBOR date/time items (tag 0) and
//! the well-known URI attributes as tag-32 strings. Decoding undoes both and
//! feeds the plain map through [`from_dict`](crate::from_dict).

use cloudevents_core::{CloudEvent, CloudEventError};

/// Attributes whose string values are tagged as URIs.
pub const WELL_KNOWN_URI_ATTRIBUTES: [&str; 2] = ["source", "dataschema"];

/// CBOR semantic tag for URIs (RFC 8949 §3.4.5.3).
pub const URI_TAG: u64 = 32;

/// Encodes `event` as one CBOR map data item.
pub fn to_cbor<E: CloudEvent>(event: &E) -> Result<Vec<u8>, CloudEventError> {
    #[cfg(feature = "cbor")]
    {
        enabled::to_cbor(event)
    }
    #[cfg(not(feature = "cbor"))]
    {
        let _ = event;
        Err(CloudEventError::CborFeatureNotInstalled)
    }
}

/// Decodes one CBOR map data item into an event of type `E`.
pub fn from_cbor<E: CloudEvent>(data: &[u8]) -> Result<E, CloudEventError> {
    #[cfg(feature = "cbor")]
    {
        enabled::from_cbor(data)
    }
    #[cfg(not(feature = "cbor"))]
    {
        let _ = data;
        Err(CloudEventError::CborFeatureNotInstalled)
    }
}

#[cfg(feature = "cbor")]
mod enabled {
    use chrono::DateTime;
    use ciborium::value::Value as CborValue;
    use cloudevents_core::{CloudEvent, CloudEventError, Value};
    use tracing::trace;

    use super::{URI_TAG, WELL_KNOWN_URI_ATTRIBUTES};
    use crate::codec::{from_dict, to_dict, EventDict};

    const TIME_KEY: &str = "time";
    /// RFC 3339 date/time string.
    const DATETIME_TAG: u64 = 0;
    /// Seconds since the Unix epoch.
    const EPOCH_TAG: u64 = 1;

    pub(super) fn to_cbor<E: CloudEvent>(event: &E) -> Result<Vec<u8>, CloudEventError> {
        let mut dict = to_dict(event);
        decode_iso_formatted_time(&mut dict);

        let entries = dict
            .into_iter()
            .map(|(name, value)| {
                let item = match value {
                    Value::Str(text) if WELL_KNOWN_URI_ATTRIBUTES.contains(&name.as_str()) => {
                        CborValue::Tag(URI_TAG, Box::new(CborValue::Text(text)))
                    }
                    other => to_cbor_value(other),
                };
                (CborValue::Text(name), item)
            })
            .collect();

        let mut out = Vec::new();
        ciborium::ser::into_writer(&CborValue::Map(entries), &mut out)
            .map_err(|e| CloudEventError::InvalidCbor(e.to_string()))?;
        Ok(out)
    }

    pub(super) fn from_cbor<E: CloudEvent>(data: &[u8]) -> Result<E, CloudEventError> {
        let item: CborValue = ciborium::de::from_reader(data)
            .map_err(|e| CloudEventError::InvalidCbor(e.to_string()))?;
        let CborValue::Map(entries) = item else {
            return Err(CloudEventError::InvalidCbor(
                "top-level item is not a map".to_owned(),
            ));
        };
        let mut dict = EventDict::new();
        for (key, value) in entries {
            let CborValue::Text(name) = key else {
                return Err(CloudEventError::InvalidCbor("map key is not text".to_owned()));
            };
            dict.insert(name, from_cbor_value(strip_uri_tag(value))?);
        }
        from_dict(dict)
    }

    /// Swaps an RFC 3339 `time` string for a native time value. Strings
    /// that do not parse are left alone.
    fn decode_iso_formatted_time(dict: &mut EventDict) {
        let Some(Value::Str(text)) = dict.get(TIME_KEY) else {
            return;
        };
        match DateTime::parse_from_rfc3339(text) {
            Ok(time) => {
                dict.insert(TIME_KEY.to_owned(), Value::Time(time));
            }
            Err(e) => trace!(error = %e, "time is not RFC 3339, encoding as plain text"),
        }
    }

    fn strip_uri_tag(value: CborValue) -> CborValue {
        match value {
            CborValue::Tag(URI_TAG, inner) => *inner,
            other => other,
        }
    }

    fn to_cbor_value(value: Value) -> CborValue {
        match value {
            Value::Null => CborValue::Null,
            Value::Bool(b) => CborValue::Bool(b),
            Value::Integer(i) => CborValue::Integer(i.into()),
            Value::Float(f) => CborValue::Float(f),
            Value::Str(s) => CborValue::Text(s),
            Value::Bytes(b) => CborValue::Bytes(b),
            Value::Time(t) => CborValue::Tag(DATETIME_TAG, Box::new(CborValue::Text(t.to_rfc3339()))),
            Value::Variant { value, .. } => to_cbor_value(*value),
            Value::Array(items) => CborValue::Array(items.into_iter().map(to_cbor_value).collect()),
            Value::Object(map) => CborValue::Map(
                map.into_iter()
                    .map(|(k, v)| (CborValue::Text(k), to_cbor_value(v)))
                    .collect(),
            ),
        }
    }

    fn from_cbor_value(value: CborValue) -> Result<Value, CloudEventError> {
        Ok(match value {
            CborValue::Null => Value::Null,
            CborValue::Bool(b) => Value::Bool(b),
            CborValue::Integer(i) => {
                let wide = i128::from(i);
                i64::try_from(wide).map_or(Value::Float(wide as f64), Value::Integer)
            }
            CborValue::Float(f) => Value::Float(f),
            CborValue::Text(s) => Value::Str(s),
            CborValue::Bytes(b) => Value::Bytes(b),
            CborValue::Tag(DATETIME_TAG, inner) => match *inner {
                CborValue::Text(text) => match DateTime::parse_from_rfc3339(&text) {
                    Ok(time) => Value::Time(time),
                    Err(_) => Value::Str(text),
                },
                other => from_cbor_value(other)?,
            },
            CborValue::Tag(EPOCH_TAG, inner) => epoch_to_value(*inner)?,
            CborValue::Tag(tag, inner) => {
                trace!(tag, "dropping cbor tag");
                from_cbor_value(*inner)?
            }
            CborValue::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(from_cbor_value)
                    .collect::<Result<_, _>>()?,
            ),
            CborValue::Map(entries) => {
                let mut map = EventDict::new();
                for (key, value) in entries {
                    let CborValue::Text(name) = key else {
                        return Err(CloudEventError::InvalidCbor(
                            "nested map key is not text".to_owned(),
                        ));
                    };
                    map.insert(name, from_cbor_value(value)?);
                }
                Value::Object(map)
            }
            _ => {
                return Err(CloudEventError::InvalidCbor(
                    "unsupported cbor data item".to_owned(),
                ))
            }
        })
    }

    fn epoch_to_value(inner: CborValue) -> Result<Value, CloudEventError> {
        let time = match inner {
            CborValue::Integer(i) => i64::try_from(i128::from(i))
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            CborValue::Float(f) if f.is_finite() => {
                let secs = f.floor();
                let nanos = ((f - secs) * 1e9).round() as u32;
                DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
            }
            other => return from_cbor_value(other),
        };
        time.map(|t| Value::Time(t.fixed_offset()))
            .ok_or_else(|| CloudEventError::InvalidCbor("epoch time out of range".to_owned()))
    }

}

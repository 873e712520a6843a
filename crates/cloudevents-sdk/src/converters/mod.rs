//! HTTP wire modes and the shared header helpers.

pub mod binary;
pub mod structured;

use std::collections::BTreeMap;
use std::fmt;

/// HTTP headers as plain name/value text.
pub type Headers = BTreeMap<String, String>;

/// Prefix of every attribute header in binary mode.
pub const CE_HEADER_PREFIX: &str = "ce-";
pub const SPECVERSION_HEADER: &str = "ce-specversion";
pub const CONTENT_TYPE_HEADER: &str = "content-type";
/// Media type of a structured-mode document.
pub const STRUCTURED_CONTENT_TYPE: &str = "application/cloudevents+json";

/// How an event is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// One header per attribute, body holds only the payload.
    Binary,
    /// One JSON document holding attributes and payload.
    #[default]
    Structured,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Binary => f.write_str("binary"),
            Mode::Structured => f.write_str("structured"),
        }
    }
}

/// Lowercases header names. Later duplicates (by case-insensitive name)
/// win, matching insertion into a case-insensitive map.
pub fn normalize_headers(headers: &Headers) -> Headers {
    headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
        .collect()
}

/// Binary mode is signalled by a `ce-specversion` header.
///
/// Expects lowercased names, see [`normalize_headers`].
pub fn is_binary(headers: &Headers) -> bool {
    headers.contains_key(SPECVERSION_HEADER)
}

impl Mode {
    pub fn detect(headers: &Headers) -> Self {
        if is_binary(headers) {
            Mode::Binary
        } else {
            Mode::Structured
        }
    }
}

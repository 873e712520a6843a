use thiserror::Error;

/// Failure kinds surfaced by event construction and conversion.
///
/// None of these are retried internally; callers match on the variant to
/// decide recovery.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CloudEventError {
    /// `specversion` (or another required attribute) could not be found.
    #[error("missing required fields: {0}")]
    MissingRequiredFields(String),
    /// `specversion` is present but not a supported value.
    #[error("invalid required fields: {0}")]
    InvalidRequiredFields(String),
    /// The body handed to a decoder is neither text nor bytes, or a
    /// structured document carries an undecodable `data_base64`.
    #[error("invalid structured json: {0}")]
    InvalidStructuredJson(String),
    #[error("CloudEvents CBOR feature is not installed, enable the `cbor` cargo feature")]
    CborFeatureNotInstalled,
    #[error("invalid cbor: {0}")]
    InvalidCbor(String),
    #[error("attribute not found: {0}")]
    KeyNotFound(String),
    #[error("attribute `{0}` is read-only")]
    ReadOnlyAttribute(String),
    #[error("attribute name `{0}` is reserved")]
    ReservedAttribute(String),
}

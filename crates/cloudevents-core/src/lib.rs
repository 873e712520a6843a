//! Event capability contract and dynamic value model for CloudEvents.
//!
//! Every concrete event representation implements [`CloudEvent`]; the
//! conversion crates only ever talk to events through that trait, so any
//! two implementations can be converted into each other and compared.

mod error;
mod event;
mod http_event;
mod value;

pub use error::CloudEventError;
pub use event::{CloudEvent, RESERVED_KEYS};
pub use http_event::{HttpEvent, DEFAULT_SPEC_VERSION, REQUIRED_ATTRIBUTES};
pub use value::{Attributes, Value};

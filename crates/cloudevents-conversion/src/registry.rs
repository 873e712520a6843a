//! Specification version routing.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use cloudevents_sdk::{v03, v1, EventHandler};

/// Builds a fresh working handler for one conversion call.
pub type HandlerFactory = fn() -> Box<dyn EventHandler>;

/// Read-only mapping from `specversion` text to a handler factory.
///
/// [`Registry::global`] is shared by the free conversion functions; a
/// caller that needs a different version set builds its own registry and
/// uses the methods directly.
#[derive(Clone)]
pub struct Registry {
    handlers: BTreeMap<String, HandlerFactory>,
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    pub fn with_handler(mut self, version: impl Into<String>, factory: HandlerFactory) -> Self {
        self.handlers.insert(version.into(), factory);
        self
    }

    /// Process-wide instance holding the `0.3` and `1.0` handlers.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::default)
    }

    pub fn handler(&self, version: &str) -> Option<Box<dyn EventHandler>> {
        self.handlers.get(version).map(|factory| factory())
    }

    pub fn supports(&self, version: &str) -> bool {
        self.handlers.contains_key(version)
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> + '_ {
        self.handlers.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::empty()
            .with_handler(v03::SPEC.version, v03_handler)
            .with_handler(v1::SPEC.version, v1_handler)
    }
}

fn v03_handler() -> Box<dyn EventHandler> {
    Box::new(v03::event())
}

fn v1_handler() -> Box<dyn EventHandler> {
    Box::new(v1::event())
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("versions", &self.versions().collect::<Vec<_>>())
            .finish()
    }
}

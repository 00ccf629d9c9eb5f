//! Level and modifier plugins.
//!
//! A plugin is an ordered mapping from a vocabulary name (a level such as
//! `debug`, or a modifier such as `red`) to a handler. Handlers receive the
//! current [`BindConfig`] and may transform it, pass it through, or suppress
//! the request by returning `Ok(None)`.
//!
//! ```
//! use logger_call::runtime::{BindConfig, Plugin};
//! use serde_json::json;
//!
//! let levels = Plugin::new()
//!     .on("log", |config, _| Some(config))
//!     .on("debug", |_, _| None);
//!
//! let loud = Plugin::new().on("loud", |config: BindConfig, _| {
//!     Some(config.with_method("warn").map_args(|mut args| {
//!         args.push(json!("!"));
//!         args
//!     }))
//! });
//!
//! assert!(levels.handles("debug"));
//! assert!(!loud.handles("debug"));
//! ```

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Request state threaded through the plugin chain: which sink method to
/// call and with which arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct BindConfig {
    pub method: String,
    pub args: Vec<Value>,
}

impl BindConfig {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// Replace the output method, keeping the arguments.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Transform the arguments, keeping the output method.
    pub fn map_args<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Vec<Value>) -> Vec<Value>,
    {
        self.args = f(self.args);
        self
    }
}

/// The level and optional modifier a handler is being run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindContext<'a> {
    pub level: &'a str,
    pub modifier: Option<&'a str>,
}

/// Error raised by a plugin handler.
///
/// A failing handler is a configuration defect: the error propagates out of
/// evaluation and no output action is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginError {
    message: String,
}

impl PluginError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plugin handler failed: {}", self.message)
    }
}

impl std::error::Error for PluginError {}

/// Outcome of a handler: `Ok(Some(_))` continues, `Ok(None)` suppresses.
pub type HandlerResult = Result<Option<BindConfig>, PluginError>;

/// A shared handler function.
pub type Handler = Arc<dyn Fn(BindConfig, &BindContext<'_>) -> HandlerResult + Send + Sync>;

/// An ordered mapping from vocabulary name to handler.
#[derive(Clone, Default)]
pub struct Plugin {
    handlers: Vec<(String, Handler)>,
}

/// A plugin keyed by level names.
pub type LevelPlugin = Plugin;

/// A plugin keyed by modifier names.
pub type ModifierPlugin = Plugin;

impl Plugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an infallible handler for `name`.
    pub fn on<F>(self, name: &str, handler: F) -> Self
    where
        F: Fn(BindConfig, &BindContext<'_>) -> Option<BindConfig> + Send + Sync + 'static,
    {
        self.try_on(name, move |config, context| Ok(handler(config, context)))
    }

    /// Register a fallible handler for `name`.
    ///
    /// Registering a name twice replaces the earlier handler in place, as
    /// assigning the same key of a mapping would.
    pub fn try_on<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(BindConfig, &BindContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        match self.handlers.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = handler,
            None => self.handlers.push((name.to_string(), handler)),
        }
        self
    }

    pub fn handler(&self, name: &str) -> Option<&Handler> {
        self.handlers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, handler)| handler)
    }

    pub fn handles(&self, name: &str) -> bool {
        self.handler(name).is_some()
    }

    /// Names this plugin declares handlers for, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

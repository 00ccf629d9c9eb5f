//! Runtime half: a logger whose calls return deferred actions.
//!
//! Requests flow through ordered level plugins, then (when a modifier was
//! used) ordered modifier plugins, and end at a [`Sink`]. Nothing is written
//! until the returned [`Deferred`] is run, which is what the source transform
//! arranges at every rewritten call site.

// The sink trait is declared before the enum that dispatches over it.
mod _traits;

mod _enums;
pub(crate) mod deferred;
pub(crate) mod facade;
pub(crate) mod pipeline;
pub(crate) mod plugin;
pub(crate) mod sink;

pub use _enums::console_method::ConsoleMethod;
pub use _enums::output_sink::{OutputSink, OutputSinkKind};
pub use _traits::sink::Sink;

pub use deferred::Deferred;
pub use facade::{Level, LogError, LogFn, Logger, LoggerBuilder};
pub use pipeline::{LoggerRequest, Pipeline};
pub use plugin::{
    BindConfig, BindContext, Handler, HandlerResult, LevelPlugin, ModifierPlugin, Plugin,
    PluginError,
};
pub use sink::{display_value, format_console_args, LogSink, MemorySink, SinkCall, StdioSink};

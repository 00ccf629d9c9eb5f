//! Output sinks that deferred actions are bound to.

pub(crate) mod format;
pub(crate) mod log_sink;
pub(crate) mod memory_sink;
pub(crate) mod stdio_sink;

pub use format::{display_value, format_console_args};
pub use log_sink::LogSink;
pub use memory_sink::{MemorySink, SinkCall};
pub use stdio_sink::StdioSink;

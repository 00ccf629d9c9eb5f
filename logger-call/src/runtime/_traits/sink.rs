use enum_dispatch::enum_dispatch;
use serde_json::Value;

/// The console-like output surface at the end of the pipeline.
///
/// A [`crate::runtime::Deferred`] action calls [`Sink::emit`] with the method
/// named by the final bind config. Implement this trait to route logger output
/// somewhere other than the provided sinks.
#[enum_dispatch]
pub trait Sink: Send + Sync {
    /// Whether `method` is a method this sink can perform.
    fn supports(&self, method: &str) -> bool;

    /// Perform `method` with `args` as positional arguments.
    fn emit(&self, method: &str, args: &[Value]);
}

use crate::runtime::sink::format::format_console_args;
use crate::runtime::{ConsoleMethod, Sink};
use serde_json::Value;
use std::str::FromStr;

/// Sink that forwards logger output to the `log` facade under the `console`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl LogSink {
    pub const TARGET: &'static str = "console";
}

impl Sink for LogSink {
    fn supports(&self, method: &str) -> bool {
        ConsoleMethod::from_str(method).is_ok()
    }

    fn emit(&self, method: &str, args: &[Value]) {
        let level = ConsoleMethod::from_str(method)
            .unwrap_or(ConsoleMethod::DEFAULT)
            .log_level();
        log::log!(target: Self::TARGET, level, "{}", format_console_args(args));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_sink_supports_console_methods() {
        let sink = LogSink;
        assert!(sink.supports("debug"));
        assert!(sink.supports("trace"));
        assert!(!sink.supports("blue"));
    }

    #[test]
    fn test_log_sink_emit_without_logger_installed() {
        // No logger is installed in unit tests; emitting must still be safe.
        let sink = LogSink;
        sink.emit("info", &[json!("forwarded"), json!(1)]);
        sink.emit("not-a-method", &[json!("falls back to debug")]);
    }
}

use crate::runtime::sink::format::format_console_args;
use crate::runtime::{ConsoleMethod, Sink};
use serde_json::Value;
use std::io::Write;
use std::str::FromStr;

/// Sink that prints formatted arguments, `warn`/`error` to stderr and the
/// other console methods to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioSink;

impl Sink for StdioSink {
    fn supports(&self, method: &str) -> bool {
        ConsoleMethod::from_str(method).is_ok()
    }

    fn emit(&self, method: &str, args: &[Value]) {
        let line = format_console_args(args);
        let diagnostic = ConsoleMethod::from_str(method)
            .map(ConsoleMethod::is_diagnostic)
            .unwrap_or(false);

        // Output errors are dropped the same way a console drops them.
        let _ = if diagnostic {
            writeln!(std::io::stderr().lock(), "{line}")
        } else {
            writeln!(std::io::stdout().lock(), "{line}")
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stdio_sink_supports_console_methods() {
        let sink = StdioSink;
        assert!(sink.supports("log"));
        assert!(sink.supports("error"));
        assert!(!sink.supports("red"));
        assert!(!sink.supports(""));
    }

    #[test]
    fn test_stdio_sink_emit_does_not_panic() {
        let sink = StdioSink;
        sink.emit("log", &[json!("stdio sink test")]);
        sink.emit("warn", &[json!("stdio sink warning test")]);
        sink.emit("unknown", &[]);
    }
}

use strum_macros::{AsRefStr, Display, EnumString, VariantNames};

/// Console-like output methods a sink can be asked to perform.
///
/// A level whose name matches one of these (e.g. `log`, `warn`) uses it as the
/// initial output method; any other level falls back to [`ConsoleMethod::DEFAULT`].
#[derive(AsRefStr, Display, EnumString, VariantNames, Debug, Clone, Copy, Eq, Hash, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum ConsoleMethod {
    Log,
    Info,
    Debug,
    Warn,
    Error,
    Trace,
}

impl ConsoleMethod {
    /// Method used when a level does not name a supported sink method.
    pub const DEFAULT: ConsoleMethod = ConsoleMethod::Debug;

    /// `log` level this method is forwarded at by [`crate::runtime::LogSink`].
    pub fn log_level(self) -> log::Level {
        match self {
            ConsoleMethod::Error => log::Level::Error,
            ConsoleMethod::Warn => log::Level::Warn,
            ConsoleMethod::Log | ConsoleMethod::Info => log::Level::Info,
            ConsoleMethod::Debug => log::Level::Debug,
            ConsoleMethod::Trace => log::Level::Trace,
        }
    }

    /// Whether output for this method goes to stderr rather than stdout.
    pub fn is_diagnostic(self) -> bool {
        matches!(self, ConsoleMethod::Warn | ConsoleMethod::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::VariantNames;

    #[test]
    fn test_console_method_display() {
        assert_eq!(ConsoleMethod::Log.to_string(), "log");
        assert_eq!(ConsoleMethod::Warn.to_string(), "warn");
        assert_eq!(ConsoleMethod::Trace.as_ref(), "trace");
    }

    #[test]
    fn test_console_method_from_str() {
        assert_eq!(ConsoleMethod::from_str("debug").ok(), Some(ConsoleMethod::Debug));
        assert_eq!(ConsoleMethod::from_str("error").ok(), Some(ConsoleMethod::Error));
        assert!(ConsoleMethod::from_str("red").is_err());
        assert!(ConsoleMethod::from_str("Log").is_err());
    }

    #[test]
    fn test_console_method_variant_names() {
        assert_eq!(
            ConsoleMethod::VARIANTS,
            &["log", "info", "debug", "warn", "error", "trace"]
        );
    }

    #[test]
    fn test_default_method_is_debug() {
        assert_eq!(ConsoleMethod::DEFAULT, ConsoleMethod::Debug);
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(ConsoleMethod::Error.log_level(), log::Level::Error);
        assert_eq!(ConsoleMethod::Warn.log_level(), log::Level::Warn);
        assert_eq!(ConsoleMethod::Log.log_level(), log::Level::Info);
        assert_eq!(ConsoleMethod::Info.log_level(), log::Level::Info);
        assert_eq!(ConsoleMethod::Debug.log_level(), log::Level::Debug);
        assert_eq!(ConsoleMethod::Trace.log_level(), log::Level::Trace);
    }

    #[test]
    fn test_diagnostic_methods() {
        assert!(ConsoleMethod::Warn.is_diagnostic());
        assert!(ConsoleMethod::Error.is_diagnostic());
        assert!(!ConsoleMethod::Log.is_diagnostic());
    }
}

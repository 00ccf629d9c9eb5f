//! Transform configuration.

use clap::Args;

pub const DEFAULT_LOGGER_CONFIG_FILE: &str = "/src/logger.ts";

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    /// Path of the logger module relative to the project root
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOGGER_CONFIG_FILE)]
    pub logger_config_file: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig {
            logger_config_file: DEFAULT_LOGGER_CONFIG_FILE.to_string(),
        }
    }
}

impl TransformConfig {
    pub fn new(logger_config_file: impl Into<String>) -> Self {
        TransformConfig {
            logger_config_file: logger_config_file.into(),
        }
    }

    /// The configured path as compared against resolved module ids: forward
    /// slashes, one leading `/`, no `./` prefix.
    pub fn logger_path(&self) -> String {
        let path = self.logger_config_file.replace('\\', "/");
        let path = path.trim_start_matches("./").trim_start_matches('/');
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Cli {
        #[command(flatten)]
        config: TransformConfig,
    }

    #[test]
    fn test_default_path() {
        let cli = Cli::try_parse_from(["host"]);
        assert_eq!(cli.ok().map(|c| c.config), Some(TransformConfig::default()));
    }

    #[test]
    fn test_flag_overrides_default() {
        let cli = Cli::try_parse_from(["host", "--logger-config-file", "src/log/index.ts"]);
        assert_eq!(
            cli.ok().map(|c| c.config.logger_config_file),
            Some("src/log/index.ts".to_string())
        );
    }

    #[test]
    fn test_logger_path_normalisation() {
        assert_eq!(TransformConfig::default().logger_path(), "/src/logger.ts");
        assert_eq!(TransformConfig::new("src/logger.ts").logger_path(), "/src/logger.ts");
        assert_eq!(TransformConfig::new("./src/logger.ts").logger_path(), "/src/logger.ts");
        assert_eq!(TransformConfig::new("src\\logger.ts").logger_path(), "/src/logger.ts");
    }
}

//! Build-time half: rewrites `logger.level(…)` call sites to `logger.level(…)()`.
//!
//! A file goes through import scanning, resolution of the logger import,
//! statement parsing, call-site location and finally patching. Files without
//! a logger import leave after the second step untouched.

pub mod imports;
pub mod lexer;
pub mod line_index;
pub mod locator;
pub mod patcher;
pub mod resolver;
pub mod source_map;
pub mod syntax;
pub mod token;

use std::path::Path;

use crate::config::TransformConfig;
use crate::error::{SyntaxError, TransformError};

pub use imports::{scan_imports, ImportKind, ImportName, ImportRecord};
pub use line_index::LineIndex;
pub use locator::{locate_call_sites, CallSite};
pub use patcher::Patch;
pub use resolver::{resolve_logger_import, FsResolver, ImportBinding, ModuleResolver};
pub use source_map::{OriginalPosition, Segment, SourceMap};
pub use syntax::{ExprStmt, Program};

/// Text inserted after each logger call to run its deferred action.
pub const INVOKE_SUFFIX: &str = "()";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    /// `None` when the file was passed through unchanged.
    pub map: Option<SourceMap>,
}

impl TransformOutput {
    fn unchanged(code: &str) -> Self {
        TransformOutput {
            code: code.to_string(),
            map: None,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.map.is_some()
    }
}

/// The per-project transform. Holds no per-file state, so one instance can
/// serve any number of files.
#[derive(Debug, Clone)]
pub struct LoggerCallTransform {
    config: TransformConfig,
    root: Option<String>,
}

impl LoggerCallTransform {
    pub const NAME: &'static str = "logger-call";

    pub fn new(config: TransformConfig) -> Self {
        LoggerCallTransform { config, root: None }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Record the project root once the host has resolved its configuration.
    pub fn config_resolved(&mut self, root: impl Into<String>) {
        let root = root.into();
        log::debug!("{}: project root {root}", Self::NAME);
        self.root = Some(root);
    }

    /// One-time initialisation before the first file.
    pub fn build_start(&self) {
        imports::warm_up();
    }

    pub fn transform(
        &self,
        code: &str,
        id: &str,
        resolver: &dyn ModuleResolver,
    ) -> Result<TransformOutput, TransformError> {
        let root = self.root.as_deref().ok_or(TransformError::NotConfigured)?;
        if !imports::may_have_imports(code) {
            log::trace!("{id}: no module syntax");
            return Ok(TransformOutput::unchanged(code));
        }

        let syntax_error = |error: SyntaxError| {
            let (line, column) = LineIndex::new(code).line_col(error.offset);
            TransformError::Syntax {
                id: id.to_string(),
                line: line + 1,
                column: column + 1,
                source: error,
            }
        };

        let tokens = lexer::tokenize(code).map_err(syntax_error)?;
        let boundaries: Vec<usize> = tokens.iter().map(|token| token.span.start).collect();
        let trees = lexer::build_trees(tokens).map_err(syntax_error)?;

        let imports = scan_imports(code, &trees);
        let logger_path = self.config.logger_path();
        let Some(binding) = resolve_logger_import(&imports, id, root, &logger_path, resolver)
        else {
            log::debug!("{id}: no import of {logger_path}");
            return Ok(TransformOutput::unchanged(code));
        };

        let program = Program::from_trees(code, &trees).map_err(syntax_error)?;
        let sites = locate_call_sites(code, &program, &binding);
        let mut patch = Patch::new(code);
        for site in locator::member_calls(&sites) {
            log::trace!("{id}: invoking deferred call ending at {}", site.call_end);
            patch.append_left(site.call_end, INVOKE_SUFFIX);
        }
        if !patch.has_changed() {
            log::debug!("{id}: imports {logger_path} but has no call sites");
            return Ok(TransformOutput::unchanged(code));
        }
        log::debug!(
            "{id}: rewrote {} of {} candidate statements",
            patch.insertion_offsets().count(),
            sites.len()
        );

        let file = Path::new(id)
            .file_name()
            .map_or_else(|| id.to_string(), |name| name.to_string_lossy().into_owned());
        Ok(TransformOutput {
            code: patch.render(),
            map: Some(patch.source_map(&file, id, &boundaries)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyntaxErrorKind;
    use crate::transform::resolver::MockModuleResolver;

    fn transform(root: &str) -> LoggerCallTransform {
        let mut transform = LoggerCallTransform::new(TransformConfig::default());
        transform.config_resolved(root);
        transform.build_start();
        transform
    }

    fn resolver() -> MockModuleResolver {
        let mut resolver = MockModuleResolver::new();
        resolver.expect_resolve().returning(|specifier, _| match specifier {
            "/src/logger" | "./logger" => Some("/p/src/logger.ts".to_string()),
            _ => None,
        });
        resolver
    }

    #[test]
    fn test_requires_root() {
        let transform = LoggerCallTransform::new(TransformConfig::default());
        let result = transform.transform("", "/p/src/a.js", &resolver());
        assert_eq!(result, Err(TransformError::NotConfigured));
    }

    #[test]
    fn test_rewrites_logger_calls() {
        let code = r#"import { logger } from "/src/logger"; logger.log("hi");"#;
        let result = transform("/p").transform(code, "/p/src/app.js", &resolver());
        assert_eq!(
            result.as_ref().map(|out| out.code.as_str()),
            Ok(r#"import { logger } from "/src/logger"; logger.log("hi")();"#)
        );
        assert_eq!(
            result.as_ref().ok().and_then(|out| out.map.as_ref()).and_then(|m| m.file.clone()),
            Some("app.js".to_string())
        );
    }

    #[test]
    fn test_files_without_module_syntax_skip_resolution() {
        let mut resolver = MockModuleResolver::new();
        resolver.expect_resolve().times(0);
        let code = "logger.log('x')";
        let result = transform("/p").transform(code, "/p/src/app.js", &resolver);
        assert_eq!(result.map(|out| (out.code.clone(), out.is_changed())), Ok((code.to_string(), false)));
    }

    #[test]
    fn test_other_imports_pass_through() {
        let code = "import { logger } from './other';\nlogger.log('x');\n";
        let result = transform("/p").transform(code, "/p/src/app.js", &resolver());
        assert_eq!(result.map(|out| out.map.is_none() && out.code == code), Ok(true));
    }

    #[test]
    fn test_syntax_error_fails_the_file() {
        let code = "import { logger } from './logger';\nlogger.log('x\n";
        let result = transform("/p").transform(code, "/p/src/app.js", &resolver());
        assert_eq!(
            result,
            Err(TransformError::Syntax {
                id: "/p/src/app.js".to_string(),
                line: 2,
                column: 12,
                source: SyntaxError::new(SyntaxErrorKind::UnterminatedString, 46),
            })
        );
    }
}

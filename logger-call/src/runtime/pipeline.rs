//! The plugin pipeline: folds a request through the configured plugins and
//! produces a [`Deferred`] action.

use crate::runtime::deferred::Deferred;
use crate::runtime::plugin::{
    BindConfig, BindContext, LevelPlugin, ModifierPlugin, Plugin, PluginError,
};
use crate::runtime::{ConsoleMethod, Sink};
use serde_json::Value;
use std::sync::Arc;

/// One logger invocation: `logger.<level>(args)` or
/// `logger.<level>.<modifier>(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerRequest {
    pub level: String,
    pub modifier: Option<String>,
    pub args: Vec<Value>,
}

impl LoggerRequest {
    pub fn new(level: impl Into<String>, modifier: Option<&str>, args: Vec<Value>) -> Self {
        Self {
            level: level.into(),
            modifier: modifier.map(str::to_string),
            args,
        }
    }
}

/// Ordered level and modifier plugins bound to an output sink.
pub struct Pipeline {
    levels: Vec<LevelPlugin>,
    modifiers: Vec<ModifierPlugin>,
    sink: Arc<dyn Sink>,
}

impl Pipeline {
    pub fn new(
        levels: Vec<LevelPlugin>,
        modifiers: Vec<ModifierPlugin>,
        sink: Arc<dyn Sink>,
    ) -> Self {
        Self {
            levels,
            modifiers,
            sink,
        }
    }

    pub fn levels(&self) -> &[LevelPlugin] {
        &self.levels
    }

    pub fn modifiers(&self) -> &[ModifierPlugin] {
        &self.modifiers
    }

    /// Evaluate `request` into a deferred action.
    ///
    /// Level plugins run first, in order, keyed by the level; modifier plugins
    /// follow, keyed by the modifier, only if one was given. A plugin without
    /// a handler for the key passes the config through. The first handler to
    /// suppress stops the fold and the result is [`Deferred::Noop`]. A handler
    /// error is returned as is.
    pub fn evaluate(&self, request: &LoggerRequest) -> Result<Deferred, PluginError> {
        let context = BindContext {
            level: &request.level,
            modifier: request.modifier.as_deref(),
        };

        let method = if self.sink.supports(&request.level) {
            request.level.clone()
        } else {
            ConsoleMethod::DEFAULT.to_string()
        };
        let mut config = Some(BindConfig::new(method, request.args.clone()));

        config = fold(&self.levels, &request.level, config, &context)?;
        if let Some(modifier) = &request.modifier {
            config = fold(&self.modifiers, modifier, config, &context)?;
        }

        Ok(match config {
            Some(config) => Deferred::emit(Arc::clone(&self.sink), config),
            None => Deferred::Noop,
        })
    }

    /// Number of handlers that apply to `level` and `modifier`, i.e. the
    /// longest chain a request with that key can run through.
    pub fn chain_len(&self, level: &str, modifier: Option<&str>) -> usize {
        let levels = self.levels.iter().filter(|p| p.handles(level)).count();
        let modifiers = modifier
            .map(|m| self.modifiers.iter().filter(|p| p.handles(m)).count())
            .unwrap_or(0);
        levels + modifiers
    }
}

fn fold(
    plugins: &[Plugin],
    key: &str,
    mut config: Option<BindConfig>,
    context: &BindContext<'_>,
) -> Result<Option<BindConfig>, PluginError> {
    for plugin in plugins {
        let Some(current) = config.take() else {
            break;
        };
        config = match plugin.handler(key) {
            Some(handler) => handler(current, context)?,
            None => Some(current),
        };
    }
    Ok(config)
}

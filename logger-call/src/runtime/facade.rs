//! The dynamic logger surface: `logger.<level>(…)` and
//! `logger.<level>.<modifier>(…)`.
//!
//! The vocabulary is whatever the configured plugins declare: a name is a
//! level if at least one level plugin handles it, and a modifier if at least
//! one modifier plugin handles it. Every level carries the full modifier
//! table. The lookup table is built once, when the logger is built.
//!
//! ```
//! use logger_call::runtime::{Logger, MemorySink, Plugin};
//! use serde_json::json;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .level_plugin(Plugin::new().on("log", |c, _| Some(c)))
//!     .modifier_plugin(Plugin::new().on("red", |c, _| Some(c)))
//!     .sink(sink.clone())
//!     .build();
//!
//! let red = logger.level("log").and_then(|level| level.modifier("red"));
//! assert!(red.is_some());
//! if let Some(red) = red {
//!     red.call(vec![json!("hello")]).map(|deferred| deferred.run()).ok();
//! }
//! assert_eq!(sink.len(), 1);
//! assert!(logger.level("shout").is_none());
//! ```

use crate::runtime::deferred::Deferred;
use crate::runtime::pipeline::{LoggerRequest, Pipeline};
use crate::runtime::plugin::{LevelPlugin, ModifierPlugin, Plugin, PluginError};
use crate::runtime::{OutputSink, Sink};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Error returned by name-based logger calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    UnknownLevel(String),
    UnknownModifier { level: String, modifier: String },
    Plugin(PluginError),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::UnknownLevel(level) => write!(f, "unknown log level: {level}"),
            LogError::UnknownModifier { level, modifier } => {
                write!(f, "unknown modifier {modifier} for level {level}")
            }
            LogError::Plugin(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogError::Plugin(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PluginError> for LogError {
    fn from(e: PluginError) -> Self {
        LogError::Plugin(e)
    }
}

/// A callable leaf of the logger: one `(level, modifier?)` combination.
#[derive(Clone)]
pub struct LogFn {
    pipeline: Arc<Pipeline>,
    level: String,
    modifier: Option<String>,
}

impl LogFn {
    /// Evaluate the pipeline for `args` and return the deferred action.
    pub fn call<I>(&self, args: I) -> Result<Deferred, PluginError>
    where
        I: IntoIterator<Item = Value>,
    {
        let request = LoggerRequest::new(
            self.level.as_str(),
            self.modifier.as_deref(),
            args.into_iter().collect(),
        );
        self.pipeline.evaluate(&request)
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn modifier(&self) -> Option<&str> {
        self.modifier.as_deref()
    }
}

impl fmt::Debug for LogFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFn")
            .field("level", &self.level)
            .field("modifier", &self.modifier)
            .finish()
    }
}

/// `logger.<level>`: callable itself, and the owner of its modifier table.
#[derive(Clone, Debug)]
pub struct Level {
    call: LogFn,
    modifiers: BTreeMap<String, LogFn>,
}

impl Level {
    pub fn name(&self) -> &str {
        self.call.level()
    }

    /// `logger.<level>(args)`.
    pub fn call<I>(&self, args: I) -> Result<Deferred, PluginError>
    where
        I: IntoIterator<Item = Value>,
    {
        self.call.call(args)
    }

    /// `logger.<level>.<modifier>`; `None` for names outside the vocabulary.
    pub fn modifier(&self, name: &str) -> Option<&LogFn> {
        self.modifiers.get(name)
    }

    pub fn modifier_names(&self) -> impl Iterator<Item = &str> {
        self.modifiers.keys().map(String::as_str)
    }
}

/// The logger object built from plugin vocabularies.
#[derive(Clone)]
pub struct Logger {
    pipeline: Arc<Pipeline>,
    levels: BTreeMap<String, Level>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// `logger.<level>`; `None` for names outside the vocabulary.
    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.get(name)
    }

    /// Look up a dotted path, `"debug"` or `"debug.red"`.
    pub fn get(&self, path: &str) -> Option<&LogFn> {
        match path.split_once('.') {
            Some((level, modifier)) => self.level(level)?.modifier(modifier),
            None => self.level(path).map(|level| &level.call),
        }
    }

    pub fn level_names(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Evaluate a call named by strings, reporting names outside the
    /// vocabulary as errors.
    pub fn call<I>(
        &self,
        level: &str,
        modifier: Option<&str>,
        args: I,
    ) -> Result<Deferred, LogError>
    where
        I: IntoIterator<Item = Value>,
    {
        let entry = self
            .level(level)
            .ok_or_else(|| LogError::UnknownLevel(level.to_string()))?;
        let target = match modifier {
            Some(modifier) => entry
                .modifier(modifier)
                .ok_or_else(|| LogError::UnknownModifier {
                    level: level.to_string(),
                    modifier: modifier.to_string(),
                })?,
            None => &entry.call,
        };
        Ok(target.call(args)?)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("levels", &self.levels.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects plugins and the sink for a [`Logger`].
#[derive(Default)]
pub struct LoggerBuilder {
    levels: Vec<LevelPlugin>,
    modifiers: Vec<ModifierPlugin>,
    sink: Option<Arc<dyn Sink>>,
}

impl LoggerBuilder {
    pub fn level_plugin(mut self, plugin: LevelPlugin) -> Self {
        self.levels.push(plugin);
        self
    }

    pub fn modifier_plugin(mut self, plugin: ModifierPlugin) -> Self {
        self.modifiers.push(plugin);
        self
    }

    pub fn level_plugins<I: IntoIterator<Item = LevelPlugin>>(mut self, plugins: I) -> Self {
        self.levels.extend(plugins);
        self
    }

    pub fn modifier_plugins<I: IntoIterator<Item = ModifierPlugin>>(mut self, plugins: I) -> Self {
        self.modifiers.extend(plugins);
        self
    }

    /// Output sink; defaults to [`OutputSink::Stdio`].
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Logger {
        let level_names = vocabulary(&self.levels);
        let modifier_names = vocabulary(&self.modifiers);
        let sink = self.sink.unwrap_or_else(|| Arc::new(OutputSink::default()));
        let pipeline = Arc::new(Pipeline::new(self.levels, self.modifiers, sink));

        let levels = level_names
            .iter()
            .map(|level| {
                let leaf = |modifier: Option<&String>| LogFn {
                    pipeline: Arc::clone(&pipeline),
                    level: level.clone(),
                    modifier: modifier.cloned(),
                };
                let entry = Level {
                    call: leaf(None),
                    modifiers: modifier_names
                        .iter()
                        .map(|modifier| (modifier.clone(), leaf(Some(modifier))))
                        .collect(),
                };
                (level.clone(), entry)
            })
            .collect();

        Logger { pipeline, levels }
    }
}

fn vocabulary(plugins: &[Plugin]) -> Vec<String> {
    let mut names: Vec<String> = plugins
        .iter()
        .flat_map(|plugin| plugin.names().map(str::to_string))
        .collect();
    names.sort();
    names.dedup();
    names
}

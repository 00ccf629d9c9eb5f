#![forbid(unsafe_code)]

pub mod config;
pub mod error;
mod macros;
pub mod runtime;
pub mod transform;

pub use crate::config::TransformConfig;
pub use crate::transform::{LoggerCallTransform, TransformOutput};

// Used by `materialize!` so callers need not depend on serde_json themselves.
#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

///
/// Everything needed to configure a logger or run the transform
///
/// ```
/// use logger_call::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{SyntaxError, TransformError};
    pub use crate::materialize;
    pub use crate::runtime::{
        BindConfig, BindContext, Deferred, LogError, Logger, OutputSink, Plugin, PluginError, Sink,
    };
    pub use crate::transform::{FsResolver, ModuleResolver, SourceMap};
    pub use crate::{LoggerCallTransform, TransformConfig, TransformOutput};
}

use crate::runtime::plugin::BindConfig;
use crate::runtime::Sink;
use std::fmt;
use std::sync::Arc;

/// The deferred result of a logger call.
///
/// Evaluating a request binds either a sink method with its final arguments
/// or nothing at all; the side effect happens only when [`Deferred::run`] is
/// called. Running twice repeats the side effect, there is no "fired" state.
#[derive(Clone)]
pub enum Deferred {
    Emit {
        sink: Arc<dyn Sink>,
        config: BindConfig,
    },
    Noop,
}

impl Deferred {
    pub fn emit(sink: Arc<dyn Sink>, config: BindConfig) -> Self {
        Deferred::Emit { sink, config }
    }

    /// Perform the bound output action, if any.
    pub fn run(&self) {
        if let Deferred::Emit { sink, config } = self {
            sink.emit(&config.method, &config.args);
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Deferred::Noop)
    }

    /// The bind config that survived the plugin chain.
    pub fn bind_config(&self) -> Option<&BindConfig> {
        match self {
            Deferred::Emit { config, .. } => Some(config),
            Deferred::Noop => None,
        }
    }

    /// A zero-argument closure performing [`Deferred::run`].
    pub fn into_thunk(self) -> impl Fn() + Send + Sync {
        move || self.run()
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferred::Emit { config, .. } => f.debug_tuple("Emit").field(config).finish(),
            Deferred::Noop => f.write_str("Noop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MemorySink;
    use serde_json::json;

    #[test]
    fn test_run_emits_bound_config() {
        let sink = MemorySink::new();
        let deferred = Deferred::emit(
            Arc::new(sink.clone()),
            BindConfig::new("warn", vec![json!("careful")]),
        );

        assert!(sink.is_empty());
        deferred.run();
        let calls = sink.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls.first().map(|c| c.method.as_str()), Some("warn"));
    }

    #[test]
    fn test_run_repeats_side_effect() {
        let sink = MemorySink::new();
        let deferred = Deferred::emit(Arc::new(sink.clone()), BindConfig::new("log", vec![]));
        deferred.run();
        deferred.run();
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_noop_does_nothing() {
        let deferred = Deferred::Noop;
        assert!(deferred.is_noop());
        assert!(deferred.bind_config().is_none());
        deferred.run();
    }

    #[test]
    fn test_into_thunk() {
        let sink = MemorySink::new();
        let thunk = Deferred::emit(Arc::new(sink.clone()), BindConfig::new("log", vec![json!(1)]))
            .into_thunk();
        thunk();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_debug_format() {
        let deferred = Deferred::emit(
            Arc::new(MemorySink::new()),
            BindConfig::new("log", vec![json!("x")]),
        );
        assert_eq!(
            format!("{deferred:?}"),
            r#"Emit(BindConfig { method: "log", args: [String("x")] })"#
        );
        assert_eq!(format!("{:?}", Deferred::Noop), "Noop");
    }
}

use std::error::Error;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use logger_call::materialize;
use logger_call::runtime::{
    BindConfig, LogError, Logger, LoggerRequest, MemorySink, Pipeline, Plugin, PluginError,
};
use serde_json::json;

fn debug_gate(enabled: Arc<AtomicBool>) -> Plugin {
    Plugin::new().on("debug", move |config, _| {
        enabled.load(Ordering::SeqCst).then_some(config)
    })
}

#[test]
fn test_debug_flag_gates_output() -> Result<(), Box<dyn Error>> {
    let enabled = Arc::new(AtomicBool::new(false));
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .level_plugin(debug_gate(enabled.clone()))
        .sink(sink.clone())
        .build();

    let suppressed = logger.call("debug", None, vec![json!("a"), json!(1)])?;
    assert!(suppressed.is_noop());
    suppressed.run();
    assert!(sink.is_empty());

    enabled.store(true, Ordering::SeqCst);
    logger.call("debug", None, vec![json!("a"), json!(1)])?.run();
    let calls = sink.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls.first().map(|c| c.method.as_str()), Some("debug"));
    assert_eq!(calls.first().map(|c| c.args.clone()), Some(vec![json!("a"), json!(1)]));
    Ok(())
}

#[test]
fn test_suppression_stops_later_plugins() {
    let later = Arc::new(AtomicUsize::new(0));
    let seen = later.clone();
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .level_plugin(Plugin::new().on("log", |_, _| None))
        .level_plugin(Plugin::new().on("log", move |config, _| {
            seen.fetch_add(1, Ordering::SeqCst);
            Some(config)
        }))
        .modifier_plugin(Plugin::new().on("red", |config, _| Some(config)))
        .sink(sink.clone())
        .build();

    assert!(materialize!(logger.log("x")).is_ok());
    assert!(materialize!(logger.log.red("x")).is_ok());
    assert_eq!(later.load(Ordering::SeqCst), 0);
    assert!(sink.is_empty());
}

#[test]
fn test_modifier_styles_after_level() -> Result<(), Box<dyn Error>> {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .level_plugin(Plugin::new().on("log", |config, _| Some(config)))
        .modifier_plugin(Plugin::new().on("blue", |config: BindConfig, _| {
            Some(config.map_args(|args| {
                let mut styled = vec![json!("%c%s"), json!("color: blue")];
                styled.extend(args);
                styled
            }))
        }))
        .sink(sink.clone())
        .build();

    let deferred = logger
        .get("log.blue")
        .ok_or("log.blue is not in the vocabulary")?
        .call(vec![json!("styled")])?;
    let run = deferred.into_thunk();
    run();
    run();
    // A thunk carries no fired state: each invocation emits again.
    assert_eq!(sink.len(), 2);
    assert_eq!(
        sink.calls().first().map(|c| c.args.clone()),
        Some(vec![json!("%c%s"), json!("color: blue"), json!("styled")])
    );
    Ok(())
}

#[test]
fn test_unknown_method_falls_back_to_debug() {
    let sink = MemorySink::with_methods(["log", "debug"]);
    let logger = Logger::builder()
        .level_plugin(Plugin::new().on("audit", |config, _| Some(config)))
        .sink(sink.clone())
        .build();
    assert!(materialize!(logger.audit("entry")).is_ok());
    assert_eq!(sink.calls().first().map(|c| c.method.clone()), Some("debug".to_string()));
}

#[test]
fn test_plugin_errors_propagate() {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .level_plugin(
            Plugin::new().try_on("error", |_, _| Err(PluginError::new("reporter offline"))),
        )
        .sink(sink.clone())
        .build();
    let result = materialize!(logger.error("boom"));
    assert!(matches!(result, Err(LogError::Plugin(ref e)) if e.message() == "reporter offline"));
    assert!(sink.is_empty());
}

#[test]
fn test_chain_length_counts_every_applicable_handler() {
    let shared = Plugin::new()
        .on("log", |config, _| Some(config))
        .on("red", |config, _| Some(config));
    let sink = Arc::new(MemorySink::new());
    let pipeline = Pipeline::new(
        vec![shared.clone(), shared.clone(), Plugin::new()],
        vec![shared],
        sink,
    );
    assert_eq!(pipeline.chain_len("log", None), 2);
    assert_eq!(pipeline.chain_len("log", Some("red")), 3);
    assert_eq!(pipeline.chain_len("warn", Some("red")), 1);

    let request = LoggerRequest::new("log", Some("red"), vec![json!(1)]);
    assert!(pipeline.evaluate(&request).is_ok_and(|d| !d.is_noop()));
}

mod cli;

use clap::Parser;
use log::info;
use logger_call::prelude::*;
use logger_call::runtime::display_value;
use serde_json::{json, Value};

use crate::cli::Args;

/// `[label, ...rest]` becomes `["%c<label>", css, ...rest]`.
fn styled(
    css: &'static str,
) -> impl Fn(BindConfig, &BindContext<'_>) -> Option<BindConfig> + Send + Sync + 'static {
    move |config: BindConfig, _: &BindContext<'_>| {
        Some(config.map_args(|args| {
            let mut rest = args.into_iter();
            let label = match rest.next() {
                Some(Value::String(label)) => label,
                Some(other) => display_value(&other),
                None => String::new(),
            };
            [json!(format!("%c{label}")), json!(css)]
                .into_iter()
                .chain(rest)
                .collect()
        }))
    }
}

fn build_logger(dev: bool, sink: OutputSink) -> Logger {
    Logger::builder()
        .level_plugin(
            Plugin::new()
                .on("debug", move |config, _| dev.then_some(config))
                .on("log", |config, _| Some(config)),
        )
        .modifier_plugin(
            Plugin::new()
                .on("red", styled("background-color: red; color: white"))
                .on("blue", styled("background-color: blue; color: white")),
        )
        .sink(sink)
        .build()
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let debug = if args.is_dev() { "enabled" } else { "silenced" };
    info!("mode {}, debug logs {debug}", args.mode);

    let logger = build_logger(args.is_dev(), args.sink.into());
    let calls = [
        materialize!(logger.log("plain message", 1, true)),
        materialize!(logger.debug("only visible in dev mode")),
        materialize!(logger.debug.red("alert", { "code": 42 })),
        materialize!(logger.log.blue("info", "styled with %s", "css")),
    ];
    for result in calls {
        if let Err(e) = result {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logger_call::runtime::MemorySink;

    #[test]
    fn test_debug_is_silenced_outside_dev() {
        let sink = MemorySink::new();
        let logger = build_logger(false, sink.clone().into());
        assert!(materialize!(logger.debug("hidden")).is_ok());
        assert!(materialize!(logger.debug.red("hidden")).is_ok());
        assert!(sink.is_empty());
        assert!(materialize!(logger.log("shown")).is_ok());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_modifier_prepends_style() {
        let sink = MemorySink::new();
        let logger = build_logger(true, sink.clone().into());
        assert!(materialize!(logger.debug.red("alert", 1)).is_ok());
        let call = sink.calls().into_iter().next();
        assert_eq!(call.as_ref().map(|c| c.method.as_str()), Some("debug"));
        assert_eq!(
            call.map(|c| c.args),
            Some(vec![
                json!("%calert"),
                json!("background-color: red; color: white"),
                json!(1)
            ])
        );
    }
}

/// Call a logger method and run its deferred action on the spot.
///
/// This is the Rust-side counterpart of the call-site rewrite: the request is
/// evaluated through the plugin pipeline and the resulting action runs
/// immediately, so the call reads like a direct logging statement. Arguments
/// are converted with `serde_json::json!`. Evaluates to
/// `Result<(), LogError>`.
///
/// ```
/// use logger_call::materialize;
/// use logger_call::runtime::{Logger, MemorySink, Plugin};
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .level_plugin(Plugin::new().on("log", |c, _| Some(c)))
///     .modifier_plugin(Plugin::new().on("blue", |c, _| Some(c)))
///     .sink(sink.clone())
///     .build();
///
/// materialize!(logger.log("plain", 1)).ok();
/// materialize!(logger.log.blue("styled", { "id": 7 })).ok();
/// assert_eq!(sink.len(), 2);
/// assert!(materialize!(logger.warn("nope")).is_err());
/// ```
#[macro_export]
macro_rules! materialize {
    ($logger:ident . $level:ident . $modifier:ident ( $($arg:tt)* )) => {
        $logger
            .call(
                stringify!($level),
                ::core::option::Option::Some(stringify!($modifier)),
                $crate::__json_args!($($arg)*),
            )
            .map(|deferred| deferred.run())
    };
    ($logger:ident . $level:ident ( $($arg:tt)* )) => {
        $logger
            .call(
                stringify!($level),
                ::core::option::Option::None,
                $crate::__json_args!($($arg)*),
            )
            .map(|deferred| deferred.run())
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __json_args {
    () => {
        ::std::vec::Vec::<$crate::__private::serde_json::Value>::new()
    };
    ($($arg:tt)+) => {
        match $crate::__private::serde_json::json!([$($arg)+]) {
            $crate::__private::serde_json::Value::Array(args) => args,
            other => ::std::vec![other],
        }
    };
}

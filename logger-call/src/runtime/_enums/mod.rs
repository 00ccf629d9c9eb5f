pub(crate) mod console_method;
pub(crate) mod output_sink;

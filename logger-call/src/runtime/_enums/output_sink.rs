use crate::runtime::sink::{LogSink, MemorySink, StdioSink};
use crate::runtime::Sink;
use enum_dispatch::enum_dispatch;
use serde_json::Value;
use strum_macros::{EnumString, VariantNames};

/// The sinks this crate provides, dispatched without boxing.
#[derive(Debug, Clone)]
#[enum_dispatch(Sink)]
pub enum OutputSink {
    Stdio(StdioSink),
    Log(LogSink),
    Memory(MemorySink),
}

impl Default for OutputSink {
    fn default() -> Self {
        OutputSink::Stdio(StdioSink)
    }
}

/// Name of a provided sink, as accepted on command lines.
#[derive(EnumString, VariantNames, Debug, Clone, Copy, Eq, PartialEq)]
#[strum(serialize_all = "kebab_case")]
pub enum OutputSinkKind {
    Stdio,
    Log,
    Memory,
}

impl From<OutputSinkKind> for OutputSink {
    fn from(kind: OutputSinkKind) -> Self {
        match kind {
            OutputSinkKind::Stdio => StdioSink.into(),
            OutputSinkKind::Log => LogSink.into(),
            OutputSinkKind::Memory => MemorySink::new().into(),
        }
    }
}

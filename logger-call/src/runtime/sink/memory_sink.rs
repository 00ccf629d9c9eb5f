use crate::runtime::{ConsoleMethod, Sink};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use strum::VariantNames;

/// A single recorded sink invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkCall {
    pub method: String,
    pub args: Vec<Value>,
}

/// Sink that records every call in memory.
///
/// Clones share the same record, so a clone handed to a logger can be
/// inspected through the original.
#[derive(Debug, Clone)]
pub struct MemorySink {
    methods: Arc<BTreeSet<String>>,
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl MemorySink {
    /// A sink supporting every [`ConsoleMethod`].
    pub fn new() -> Self {
        Self::with_methods(ConsoleMethod::VARIANTS.iter().copied())
    }

    /// A sink supporting exactly `methods`.
    pub fn with_methods<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            methods: Arc::new(methods.into_iter().map(Into::into).collect()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of the calls recorded so far.
    pub fn calls(&self) -> Vec<SinkCall> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.calls().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MemorySink {
    fn supports(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    fn emit(&self, method: &str, args: &[Value]) {
        let call = SinkCall {
            method: method.to_string(),
            args: args.to_vec(),
        };
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
    }
}

//! Side channel for non-fatal warnings.
//!
//! Queries never fail, but some of them degrade (the working directory becomes `"."`, the
//! executable path becomes empty). When that happens a single human-readable message is handed
//! to a [`DiagnosticSink`].

use std::sync::{Arc, Mutex, PoisonError};

/// Receiver of warning messages.
///
/// Implementations must not panic: a sink is called on a path which is already degrading
/// gracefully.
pub trait DiagnosticSink {
    /// Report `message`.
    fn warn(&self, message: &str);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn warn(&self, message: &str) {
        (**self).warn(message)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn warn(&self, message: &str) {
        (**self).warn(message)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn warn(&self, message: &str) {
        (**self).warn(message)
    }
}

/// Forwards warnings to [`tracing::warn!`] under the `hostenv` target.
///
/// This is the default sink. Installing a subscriber is left to the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "hostenv", "{message}");
    }
}

/// Drops every warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn warn(&self, _message: &str) {}
}

/// Keeps warnings in memory, in the order they were reported.
///
/// ```rust
/// use hostenv::diagnostics::{DiagnosticSink, MemorySink};
///
/// let sink = MemorySink::new();
/// sink.warn("first");
/// sink.warn("second");
/// assert_eq!(sink.take(), ["first", "second"]);
/// assert!(sink.messages().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty [`MemorySink`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every message reported so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain every message reported so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DiagnosticSink for MemorySink {
    fn warn(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_through_references() {
        let sink = Arc::new(MemorySink::new());
        let shared: &dyn DiagnosticSink = &sink;
        shared.warn("one");
        Box::new(&*sink).warn("two");
        assert_eq!(sink.messages(), ["one", "two"]);
        assert_eq!(sink.take(), ["one", "two"]);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn memory_sink_from_many_threads() {
        let sink = Arc::new(MemorySink::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || sink.warn(&format!("warning {i}")))
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread should not panic");
        }
        let mut messages = sink.messages();
        messages.sort();
        assert_eq!(
            messages,
            ["warning 0", "warning 1", "warning 2", "warning 3"]
        );
    }

    #[test]
    fn tracing_and_null_sinks_never_panic() {
        TracingSink.warn("no subscriber installed");
        NullSink.warn("dropped");
    }
}

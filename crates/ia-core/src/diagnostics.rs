//! Diagnostics side-channel.
//!
//! Engine operations never log through a global logger directly. They report
//! informational and warning messages to a `DiagnosticSink` passed down the
//! call chain, so callers choose whether messages go to `tracing` or are
//! collected for inspection.

use core::fmt;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => f.write_str("INFO"),
            Level::Warning => f.write_str("WARNING"),
        }
    }
}

/// A single message emitted by an engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

/// Receiver for engine diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, level: Level, message: String);

    fn info(&mut self, message: String) {
        self.emit(Level::Info, message);
    }

    fn warn(&mut self, message: String) {
        self.emit(Level::Warning, message);
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, level: Level, message: String) {
        match level {
            Level::Info => tracing::info!(target: "ia_aggregate", "{message}"),
            Level::Warning => tracing::warn!(target: "ia_aggregate", "{message}"),
        }
    }
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    events: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn messages(&self) -> Vec<&str> {
        self.events.iter().map(|d| d.message.as_str()).collect()
    }

    /// Index of the first event with exactly this message.
    pub fn position(&self, message: &str) -> Option<usize> {
        self.events.iter().position(|d| d.message == message)
    }

    /// Level of the first event with exactly this message.
    pub fn level_of(&self, message: &str) -> Option<Level> {
        self.position(message).map(|i| self.events[i].level)
    }

    pub fn count(&self, level: Level) -> usize {
        self.events.iter().filter(|d| d.level == level).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&mut self, level: Level, message: String) {
        self.events.push(Diagnostic { level, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_keeps_order_and_levels() {
        let mut sink = CollectingSink::new();
        sink.info("first".to_string());
        sink.warn("second".to_string());

        assert_eq!(sink.messages(), vec!["first", "second"]);
        assert_eq!(sink.level_of("second"), Some(Level::Warning));
        assert_eq!(sink.position("missing"), None);
        assert_eq!(sink.count(Level::Info), 1);
    }

    #[test]
    fn sink_is_object_safe() {
        let mut sink = CollectingSink::new();
        let dyn_sink: &mut dyn DiagnosticSink = &mut sink;
        dyn_sink.info("through dyn".to_string());
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        let mut sink = TracingSink;
        sink.warn("nobody is listening".to_string());
    }
}

//! Leveled event log returned by pipeline components.
//!
//! Components never print. Each one records what it did (and what it could
//! not do) into a [`Diagnostics`] value that the caller decides how to surface.
//! The CLI forwards events to `tracing`; tests inspect them directly.

use std::fmt;

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Detailed progress information
    Debug,
    /// Normal progress information
    Info,
    /// Something was skipped or degraded but processing continued
    Warn,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Debug => write!(f, "debug"),
            Level::Info => write!(f, "info"),
            Level::Warn => write!(f, "warn"),
        }
    }
}

/// A single diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Severity
    pub level: Level,
    /// Component that produced the event (e.g. "includes", "resolve")
    pub component: &'static str,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.component, self.message)
    }
}

/// Ordered collection of diagnostic events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    events: Vec<Event>,
}

impl Diagnostics {
    /// Creates an empty event log.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Records an event at the given level.
    pub fn push(&mut self, level: Level, component: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            level,
            component,
            message: message.into(),
        });
    }

    /// Records a debug event.
    pub fn debug(&mut self, component: &'static str, message: impl Into<String>) {
        self.push(Level::Debug, component, message);
    }

    /// Records an info event.
    pub fn info(&mut self, component: &'static str, message: impl Into<String>) {
        self.push(Level::Info, component, message);
    }

    /// Records a warning event.
    pub fn warn(&mut self, component: &'static str, message: impl Into<String>) {
        self.push(Level::Warn, component, message);
    }

    /// Appends all events from another log, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.events.extend(other.events);
    }

    /// All recorded events in order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterates over warning events only.
    pub fn warnings(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.level == Level::Warn)
    }

    /// Returns true if any warning was recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// Returns true if no events were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Forwards every event to the `tracing` subscriber.
    pub fn emit(&self) {
        for event in &self.events {
            match event.level {
                Level::Debug => tracing::debug!(component = event.component, "{}", event.message),
                Level::Info => tracing::info!(component = event.component, "{}", event.message),
                Level::Warn => tracing::warn!(component = event.component, "{}", event.message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut diag = Diagnostics::new();
        diag.info("a", "first");
        diag.warn("b", "second");
        diag.debug("c", "third");

        let messages: Vec<&str> = diag.events().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_warnings_filter() {
        let mut diag = Diagnostics::new();
        assert!(!diag.has_warnings());

        diag.info("includes", "read file");
        diag.warn("includes", "missing file");

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().count(), 1);
    }

    #[test]
    fn test_extend_appends() {
        let mut first = Diagnostics::new();
        first.info("a", "one");
        let mut second = Diagnostics::new();
        second.warn("b", "two");

        first.extend(second);
        assert_eq!(first.events().len(), 2);
        assert_eq!(first.events()[1].component, "b");
    }

    #[test]
    fn test_event_display() {
        let mut diag = Diagnostics::new();
        diag.warn("resolve", "unknown position 'XX0'");
        assert_eq!(
            diag.events()[0].to_string(),
            "[warn] resolve: unknown position 'XX0'"
        );
    }
}

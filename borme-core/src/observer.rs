// Observability boundary
//
// Every pipeline component receives an Observer explicitly instead of
// reaching for a process-wide logger. The CLI wires in TracingObserver;
// tests use MemoryObserver to assert on what was reported.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Key/value pairs attached to an event (bulletin id, record code, field...)
pub type Context<'a> = &'a [(&'a str, &'a str)];

/// Sink for pipeline events.
///
/// Implementations must be shareable across the bulletin worker pool.
pub trait Observer: Send + Sync {
    fn record(&self, level: Level, message: &str, context: Context<'_>);

    fn debug(&self, message: &str, context: Context<'_>) {
        self.record(Level::Debug, message, context);
    }

    fn info(&self, message: &str, context: Context<'_>) {
        self.record(Level::Info, message, context);
    }

    fn warn(&self, message: &str, context: Context<'_>) {
        self.record(Level::Warn, message, context);
    }

    fn error(&self, message: &str, context: Context<'_>) {
        self.record(Level::Error, message, context);
    }
}

fn render_context(context: Context<'_>) -> String {
    context
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Forwards events to the `tracing` macros
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn record(&self, level: Level, message: &str, context: Context<'_>) {
        let context = render_context(context);
        match level {
            Level::Debug => tracing::debug!(context = %context, "{message}"),
            Level::Info => tracing::info!(context = %context, "{message}"),
            Level::Warn => tracing::warn!(context = %context, "{message}"),
            Level::Error => tracing::error!(context = %context, "{message}"),
        }
    }
}

/// Drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn record(&self, _level: Level, _message: &str, _context: Context<'_>) {}
}

/// An event captured by [`MemoryObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub level: Level,
    pub message: String,
    pub context: Vec<(String, String)>,
}

impl Event {
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct MemoryObserver {
    events: Mutex<Vec<Event>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.events().iter().filter(|e| e.level == level).count()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events().iter().any(|e| e.message.contains(needle))
    }
}

impl Observer for MemoryObserver {
    fn record(&self, level: Level, message: &str, context: Context<'_>) {
        // A poisoned lock only means another worker panicked mid-push
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(Event {
            level,
            message: message.to_string(),
            context: context
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_observer_keeps_order_and_context() {
        let observer = MemoryObserver::new();
        observer.info("first", &[("bulletin", "BORME-A-1")]);
        observer.warn("second", &[("code", "123456")]);

        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "first");
        assert_eq!(events[0].context_value("bulletin"), Some("BORME-A-1"));
        assert_eq!(events[1].level, Level::Warn);
        assert_eq!(observer.count_at(Level::Warn), 1);
        assert!(observer.contains("sec"));
    }

    #[test]
    fn context_renders_as_key_value_pairs() {
        assert_eq!(
            render_context(&[("a", "1"), ("b", "two")]),
            "a=1 b=two"
        );
        assert_eq!(render_context(&[]), "");
    }
}

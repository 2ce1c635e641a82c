//! Trace logging for cache activity.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::Level;

/// Maximum number of messages a [`MemoryLogger`] keeps.
const MAX_LOG_ENTRIES: usize = 500;

/// Receives one trace message per cache operation.
pub trait CacheLogger: Send + Sync {
    /// Record a trace-level message.
    fn trace(&self, message: &str);
}

/// Forwards cache messages to `tracing` at TRACE level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl CacheLogger for TracingLogger {
    fn trace(&self, message: &str) {
        tracing::trace!(target: "session_cache", "{}", message);
    }
}

/// A single recorded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level.
    pub level: Level,
    /// Log message.
    pub message: String,
}

/// Keeps messages in a bounded buffer so they can be inspected.
///
/// Clones share the buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl MemoryLogger {
    /// Create an empty logger.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    /// Get all current entries.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Get just the messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    /// The most recent message.
    pub fn last(&self) -> Option<String> {
        self.entries.lock().back().map(|e| e.message.clone())
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.lock();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }
}

impl CacheLogger for MemoryLogger {
    fn trace(&self, message: &str) {
        self.push(LogEntry {
            level: Level::TRACE,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_records() {
        let logger = MemoryLogger::new();
        assert!(logger.is_empty());

        logger.trace("first");
        logger.trace("second");

        assert_eq!(logger.len(), 2);
        assert_eq!(logger.messages(), vec!["first", "second"]);
        assert_eq!(logger.last().as_deref(), Some("second"));
        assert_eq!(logger.entries()[0].level, Level::TRACE);
    }

    #[test]
    fn test_memory_logger_is_bounded() {
        let logger = MemoryLogger::new();
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            logger.trace(&format!("msg {}", i));
        }

        assert_eq!(logger.len(), MAX_LOG_ENTRIES);
        assert_eq!(logger.messages()[0], "msg 10");
    }

    #[test]
    fn test_clones_share_buffer() {
        let logger = MemoryLogger::new();
        let handle = logger.clone();
        handle.trace("hello");
        assert_eq!(logger.last().as_deref(), Some("hello"));

        logger.clear();
        assert!(handle.is_empty());
    }
}

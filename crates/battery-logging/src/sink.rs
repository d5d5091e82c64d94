//! Destination for forwarded log records

use battery_core::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Receives log records from the tracing bridge.
///
/// Closures `Fn(LogLevel, &str, &str)` implement this trait, with arguments
/// `(level, target, message)`.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, target: &str, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(LogLevel, &str, &str) + Send + Sync,
{
    fn log(&self, level: LogLevel, target: &str, message: &str) {
        self(level, target, message)
    }
}

/// Holds the registered sink and the minimum forwarded level
pub struct LogSinkManager {
    sink: RwLock<Option<Arc<dyn LogSink>>>,
    level: AtomicU8,
}

impl LogSinkManager {
    /// Create a manager with no sink at [`LogLevel::Info`]
    pub fn new() -> Self {
        Self {
            sink: RwLock::new(None),
            level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Process-wide manager used by [`crate::SinkLoggingLayer::new`]
    pub fn global() -> &'static LogSinkManager {
        static INSTANCE: OnceCell<LogSinkManager> = OnceCell::new();
        INSTANCE.get_or_init(LogSinkManager::new)
    }

    /// Replace the sink; `None` drops records until a new one is set
    pub fn set_sink(&self, sink: Option<Arc<dyn LogSink>>) {
        *self.sink.write() = sink;
    }

    pub fn has_sink(&self) -> bool {
        self.sink.read().is_some()
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::SeqCst))
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Whether a record at `level` would be forwarded
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        let current = self.level();
        current != LogLevel::Off && level >= current
    }

    /// Forward one record to the sink if it passes the level
    pub fn log(&self, level: LogLevel, target: &str, message: &str) {
        if !self.is_enabled(level) {
            return;
        }

        // Release the lock before calling out; a sink may log itself.
        let sink = self.sink.read().clone();
        if let Some(sink) = sink {
            sink.log(level, target, message);
        }
    }
}

impl Default for LogSinkManager {
    fn default() -> Self {
        Self::new()
    }
}

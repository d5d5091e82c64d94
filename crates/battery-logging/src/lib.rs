//! battery-logging - Tracing bridge to a platform log sink
//!
//! This crate provides:
//! - [`LogSink`] for whatever logger the embedding application uses
//! - [`SinkLoggingLayer`] tracing layer that forwards events to the sink
//! - [`ReloadHandle`] and [`set_log_level`] for changing the level at runtime

mod layer;
mod reload;
mod sink;

pub use battery_core::LogLevel;
pub use layer::{SinkLoggingLayer, init_logging, init_logging_from_config};
pub use reload::{ReloadError, ReloadHandle};
pub use sink::{LogSink, LogSinkManager};

use std::sync::Arc;

/// Route battery logs to `sink`, replacing any previous sink
pub fn register_sink(sink: impl LogSink + 'static) {
    LogSinkManager::global().set_sink(Some(Arc::new(sink)));
}

/// Change the active level of both the sink and the installed filter.
///
/// The sink level always changes; the error only reports that no reloadable
/// filter was installed by [`init_logging`].
pub fn set_log_level(level: LogLevel) -> Result<(), ReloadError> {
    LogSinkManager::global().set_level(level);
    ReloadHandle::global().reload_level(level)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogLevel, LogSink, SinkLoggingLayer, init_logging, register_sink, set_log_level};
}

//! Log sinks
//!
//! A [`LogSink`] receives one [`LogRecord`] per reportable failure. The
//! default [`TracingSink`] forwards records to `tracing`; [`MemorySink`]
//! keeps them in memory.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::context::LogContext;
use crate::errors::SinkError;

/// Severity of a [`LogRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One leveled, channel-routed log line with structured context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub channel: String,
    /// Diagnostic code already embedded in `formatted_message`
    pub code: String,
    pub formatted_message: String,
    pub context: LogContext,
}

/// Logging backend
///
/// Implementations may fail; the reporter contains every failure.
pub trait LogSink: Send + Sync {
    /// Write a single record
    ///
    /// # Errors
    /// Returns [`SinkError`] when the backend is unreachable or refuses the
    /// record.
    fn write(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Forwards records to the `tracing` subscriber
///
/// Each record becomes one event at the matching level, with `channel`,
/// `code` and `context` (JSON text) fields and the formatted line as message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let context = serde_json::to_string(&record.context).map_err(|e| SinkError::Rejected {
            reason: e.to_string(),
        })?;
        let channel = record.channel.as_str();
        let code = record.code.as_str();
        let message = record.formatted_message.as_str();

        match record.level {
            LogLevel::Info => {
                tracing::info!(channel, code, context = %context, "{}", message)
            }
            LogLevel::Warning => {
                tracing::warn!(channel, code, context = %context, "{}", message)
            }
            LogLevel::Error => {
                tracing::error!(channel, code, context = %context, "{}", message)
            }
        }
        Ok(())
    }
}

/// Keeps every record in memory
///
/// Clones share the same buffer, so a test can hand one clone to the
/// reporter and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records written so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().map(|mut r| r.clear()).ok();
    }
}

impl LogSink for MemorySink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut records = self.records.lock().map_err(|_| SinkError::Unavailable {
            reason: "memory sink lock poisoned".to_string(),
        })?;
        records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(level: LogLevel) -> LogRecord {
        LogRecord {
            level,
            channel: "stack".to_string(),
            code: "APP_COMMON".to_string(),
            formatted_message: "APP_COMMON - boom".to_string(),
            context: LogContext::from_value(json!({"k": "v"})),
        }
    }

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::Warning.to_string(), "warning");
        assert_eq!(serde_json::to_value(LogLevel::Error).unwrap(), json!("error"));
    }

    #[test]
    fn test_memory_sink_shares_buffer_across_clones() {
        let sink = MemorySink::new();
        let handle = sink.clone();

        sink.write(&record(LogLevel::Error)).unwrap();
        sink.write(&record(LogLevel::Info)).unwrap();

        assert_eq!(handle.len(), 2);
        assert_eq!(handle.records()[0].level, LogLevel::Error);

        handle.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_tracing_sink_accepts_all_levels() {
        let sink = TracingSink;
        for level in [LogLevel::Info, LogLevel::Warning, LogLevel::Error] {
            assert!(sink.write(&record(level)).is_ok());
        }
    }
}

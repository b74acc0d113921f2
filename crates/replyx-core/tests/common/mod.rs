use replyx_core::{LogRecord, LogSink, MemorySink, Responder, Settings, SinkError};
use std::sync::Arc;

/// A sink whose every write fails
#[allow(dead_code)]
pub struct FailingSink;

impl LogSink for FailingSink {
    fn write(&self, _record: &LogRecord) -> Result<(), SinkError> {
        Err(SinkError::Unavailable {
            reason: "disk full".to_string(),
        })
    }
}

/// A sink that panics on write
#[allow(dead_code)]
pub struct PanickingSink;

impl LogSink for PanickingSink {
    fn write(&self, _record: &LogRecord) -> Result<(), SinkError> {
        panic!("log backend exploded");
    }
}

/// Default settings running outside production
#[allow(dead_code)]
pub fn local_settings() -> Settings {
    let mut settings = Settings::default();
    settings.app.env = "local".to_string();
    settings
}

/// Default settings (production, redaction on)
#[allow(dead_code)]
pub fn production_settings() -> Settings {
    Settings::default()
}

/// A responder over `settings` writing into a fresh memory sink
#[allow(dead_code)]
pub fn responder_with(settings: Settings) -> (Responder, MemorySink) {
    let sink = MemorySink::new();
    let responder = Responder::new(Arc::new(settings), Arc::new(sink.clone()));
    (responder, sink)
}

/// A responder over `settings` writing into `sink`
#[allow(dead_code)]
pub fn responder_into(settings: Settings, sink: impl LogSink + 'static) -> Responder {
    Responder::new(Arc::new(settings), Arc::new(sink))
}

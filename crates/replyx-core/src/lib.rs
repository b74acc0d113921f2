//! replyx Core - Uniform JSON envelopes and failure reporting for HTTP services
//!
//! This crate provides the response-standardization layer:
//! - Success, error and validation envelopes with a stable client-side shape
//! - Diagnostic codes derived from call-site file/line via a class-code map
//! - Exactly one log record per reportable failure, through an injectable sink
//! - Application error rendering with trace ids and production redaction
//! - Validation and fetch helpers built on the envelopes
//!
//! Components are wired explicitly from one immutable [`Settings`] value;
//! handlers hold a [`Responder`] rather than inheriting behaviour.

pub mod code_resolver;
pub mod config;
pub mod context;
pub mod envelope;
pub mod errors;
pub mod fetch;
pub mod formatter;
#[cfg(feature = "axum")]
pub mod http;
pub mod logging_facility;
pub mod renderer;
pub mod reporter;
pub mod responder;
pub mod sink;
pub mod validation;

// Re-export commonly used types
pub use code_resolver::{ClassCodeMap, CodeResolver};
pub use config::Settings;
pub use context::LogContext;
pub use envelope::{Envelope, EnvelopeBuilder, ErrorField, ErrorInfo};
pub use errors::{AppError, ConfigError, SinkError};
pub use renderer::{ExceptionRenderer, RenderedError};
pub use replyx_core_types::{CallSite, TraceId};
pub use reporter::FailureReporter;
pub use responder::Responder;
pub use sink::{LogLevel, LogRecord, LogSink, MemorySink, TracingSink};
pub use validation::{ValidationAdapter, ValidationOutcome, ValidationResult, Validator};

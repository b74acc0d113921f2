use replyx_core_types::CallSite;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Status code an [`AppError`] carries when none is given
pub const DEFAULT_APP_ERROR_CODE: i64 = 400;

/// Short name used as `error.type` unless the error is given a kind
pub const DEFAULT_APP_ERROR_KIND: &str = "AppError";

/// Errors raised while building [`crate::Settings`] at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source could not be read or parsed, or a value had the wrong type
    #[error("Failed to load configuration: {message}")]
    Load { message: String },

    /// A value parsed but is outside its allowed range
    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Load {
            message: err.to_string(),
        }
    }
}

/// Errors a [`crate::LogSink`] may return from a write
///
/// These never leave the reporter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The backend cannot be reached
    #[error("Log sink unavailable: {reason}")]
    Unavailable { reason: String },

    /// The backend refused this particular record
    #[error("Log sink rejected record: {reason}")]
    Rejected { reason: String },
}

/// An explicit application-level failure
///
/// Carries a message, a numeric status code (which may be outside the HTTP
/// range; the renderer falls back to the configured default), optional extra
/// data merged into the response `data`, and the source location where it
/// was constructed.
///
/// # Example
///
/// ```
/// use replyx_core::AppError;
/// use serde_json::json;
///
/// let err = AppError::new("Order is locked", 409)
///     .with_kind("OrderLocked")
///     .with_extra_field("order_id", &json!(17));
///
/// assert_eq!(err.code(), 409);
/// assert_eq!(err.kind(), "OrderLocked");
/// assert!(err.origin().file.ends_with(".rs"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AppError {
    message: String,
    code: i64,
    kind: String,
    extra: Map<String, Value>,
    origin: CallSite,
}

impl AppError {
    /// Create an error attributed to the caller's file and line
    #[track_caller]
    pub fn new(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code,
            kind: DEFAULT_APP_ERROR_KIND.to_string(),
            extra: Map::new(),
            origin: CallSite::caller(),
        }
    }

    /// Create an error with the default status code (400)
    #[track_caller]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self::new(message, DEFAULT_APP_ERROR_CODE)
    }

    /// Set the short type name reported as `error.type`
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Replace the extra data
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Add one extra data field; a value that cannot be represented as JSON
    /// is stored as `null`
    pub fn with_extra_field<T: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.extra.insert(key.into(), value);
        self
    }

    /// Override the origin (e.g. when converting an error raised elsewhere)
    pub fn at(mut self, origin: CallSite) -> Self {
        self.origin = origin;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn origin(&self) -> &CallSite {
        &self.origin
    }
}

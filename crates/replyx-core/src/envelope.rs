//! Response envelopes
//!
//! Every endpoint answers with the same JSON shape:
//!
//! ```json
//! { "result": true, "data": ..., "message": "...", "status_code": 200, "error": [] }
//! ```
//!
//! `result=true` always comes with an empty `error` and a 2xx status;
//! `result=false` carries either a list of tags or an [`ErrorInfo`].
//! `data` is never `null`; an absent payload is `[]`.

use replyx_core_types::schema::{CONTEXT_DATA, CONTEXT_ERROR, INTERNAL_TARGET};
use replyx_core_types::{CallSite, TraceId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::LogContext;
use crate::reporter::FailureReporter;
use crate::sink::LogLevel;
use crate::validation::ValidationResult;

pub const DEFAULT_SUCCESS_CODE: u16 = 200;

/// Message logged when a validation body is passed through
pub const VALIDATION_FAILED_LOG_MESSAGE: &str = "Validation Failed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub result: bool,
    pub data: Value,
    pub message: String,
    pub status_code: u16,
    pub error: ErrorField,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.result
    }

    /// The `ErrorInfo` of a rendered application error, if any
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match &self.error {
            ErrorField::Info(info) => Some(info),
            ErrorField::Tags(_) => None,
        }
    }
}

/// The `error` member: `[]`, `["tag"]` or an error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorField {
    Info(ErrorInfo),
    Tags(Vec<String>),
}

impl ErrorField {
    pub fn empty() -> Self {
        ErrorField::Tags(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ErrorField::Tags(tags) if tags.is_empty())
    }
}

impl Default for ErrorField {
    fn default() -> Self {
        Self::empty()
    }
}

/// Diagnostic details of a rendered application error
///
/// `file` and `line` are absent from client bodies when redaction is in
/// effect; `code` always survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub trace_id: TraceId,
    pub time: String,
    pub code: String,
}

impl ErrorInfo {
    /// Remove file and line
    pub fn redact(&mut self) {
        self.file = None;
        self.line = None;
    }
}

/// The `data` value used when there is no payload
pub fn empty_data() -> Value {
    Value::Array(Vec::new())
}

/// Serialize a payload for `data`; `null` and unserializable payloads
/// become `[]`
pub fn to_data<T: Serialize>(data: T) -> Value {
    match serde_json::to_value(data) {
        Ok(Value::Null) => empty_data(),
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                target: INTERNAL_TARGET,
                error = %err,
                "envelope data not representable as JSON, replaced with []"
            );
            empty_data()
        }
    }
}

/// Shallow overlay of `extra` onto `data`; extra keys win
///
/// A `data` that is not an object (typically the empty `[]`) is replaced by
/// the extra map.
pub fn merge_data(data: Value, extra: &Map<String, Value>) -> Value {
    if extra.is_empty() {
        return data;
    }
    let mut merged = match data {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in extra {
        merged.insert(key.clone(), value.clone());
    }
    Value::Object(merged)
}

/// Builds success and error envelopes
///
/// # Example
///
/// ```
/// use replyx_core::{EnvelopeBuilder, FailureReporter, MemorySink, Settings};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let sink = MemorySink::new();
/// let reporter = FailureReporter::new(Arc::new(Settings::default()), Arc::new(sink.clone()));
/// let envelopes = EnvelopeBuilder::new(reporter);
///
/// let ok = envelopes.success(json!({"id": 1}), "Created", 201);
/// assert!(ok.result && ok.error.is_empty());
///
/// let failed = envelopes.error(json!([]), "Record not found", 404, None);
/// assert!(!failed.result);
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    reporter: FailureReporter,
}

impl EnvelopeBuilder {
    pub fn new(reporter: FailureReporter) -> Self {
        Self { reporter }
    }

    pub fn reporter(&self) -> &FailureReporter {
        &self.reporter
    }

    /// `result=true`, `error=[]`
    ///
    /// A code outside 200-299 is replaced by 200.
    pub fn success<T: Serialize>(&self, data: T, message: impl Into<String>, code: u16) -> Envelope {
        let status_code = if (200..=299).contains(&code) {
            code
        } else {
            tracing::debug!(
                target: INTERNAL_TARGET,
                requested = code,
                "non-2xx code on success envelope, using 200"
            );
            DEFAULT_SUCCESS_CODE
        };
        Envelope {
            result: true,
            data: to_data(data),
            message: message.into(),
            status_code,
            error: ErrorField::empty(),
        }
    }

    /// `result=false`, `error=[tag]` or `[]` (an empty tag counts as none)
    ///
    /// Writes one `error` record attributed to the caller, with the payload
    /// and tag as context. A code outside 100-599 is replaced by the
    /// configured default.
    #[track_caller]
    pub fn error<T: Serialize>(
        &self,
        data: T,
        message: impl Into<String>,
        code: u16,
        tag: Option<&str>,
    ) -> Envelope {
        let site = CallSite::caller();
        let message = message.into();
        let data = to_data(data);
        let tag = tag.filter(|t| !t.is_empty());

        let context = LogContext::new()
            .with(CONTEXT_DATA, &data)
            .with(CONTEXT_ERROR, &tag);
        self.reporter
            .report(&message, context, &site, LogLevel::Error);

        Envelope {
            result: false,
            data,
            message,
            status_code: self.reporter.settings().status_or_default(i64::from(code)),
            error: ErrorField::Tags(tag.map(|t| vec![t.to_string()]).unwrap_or_default()),
        }
    }

    /// Pass a validation body through, logging it as a failure
    ///
    /// The body is returned unchanged; its own `status_code` is the
    /// transport status.
    #[track_caller]
    pub fn validation_error(&self, body: ValidationResult) -> ValidationResult {
        let site = CallSite::caller();
        self.reporter.report(
            VALIDATION_FAILED_LOG_MESSAGE,
            LogContext::from_serialize(&body),
            &site,
            LogLevel::Error,
        );
        body
    }
}

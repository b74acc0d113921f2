//! Application error rendering
//!
//! Turns an [`AppError`] into an error envelope:
//! resolve the status, build the [`ErrorInfo`] (fresh trace id, timestamp,
//! origin file/line, diagnostic code of the origin), merge extra data,
//! report once at `error`, then redact file/line from the client body when
//! running in production with redaction enabled. The log record always
//! keeps file and line.
//!
//! Rendering never fails: a sink outage only costs the log record.

use chrono::{SecondsFormat, Utc};
use replyx_core_types::schema::INTERNAL_TARGET;
use replyx_core_types::{CallSite, TraceId};

use crate::code_resolver::CodeResolver;
use crate::context::LogContext;
use crate::envelope::{empty_data, merge_data, Envelope, ErrorField, ErrorInfo};
use crate::errors::AppError;
use crate::reporter::FailureReporter;
use crate::sink::LogLevel;

/// A serialized error response ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedError {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct ExceptionRenderer {
    reporter: FailureReporter,
}

impl ExceptionRenderer {
    pub fn new(reporter: FailureReporter) -> Self {
        Self { reporter }
    }

    /// The error's code if it is an HTTP status, else the configured default
    pub fn resolve_status(&self, code: i64) -> u16 {
        self.reporter.settings().status_or_default(code)
    }

    /// Render `error` into an envelope
    ///
    /// The diagnostic code in the body is derived from the error's own
    /// origin; the log record is attributed to the caller of `render`.
    #[track_caller]
    pub fn render(&self, error: &AppError) -> Envelope {
        let site = CallSite::caller();
        let settings = self.reporter.settings();
        let origin = error.origin();

        let info = ErrorInfo {
            kind: error.kind().to_string(),
            file: Some(origin.file.clone()),
            line: Some(origin.line),
            trace_id: TraceId::new(),
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            code: CodeResolver::from_settings(settings).resolve_site(origin),
        };

        let mut envelope = Envelope {
            result: false,
            data: merge_data(empty_data(), error.extra()),
            message: error.message().to_string(),
            status_code: self.resolve_status(error.code()),
            error: ErrorField::Info(info),
        };

        self.reporter.report(
            error.message(),
            LogContext::from_serialize(&envelope),
            &site,
            LogLevel::Error,
        );

        if settings.redact_file_line() {
            if let ErrorField::Info(info) = &mut envelope.error {
                info.redact();
            }
        }
        envelope
    }

    /// Render and serialize `error`
    ///
    /// Falls back to a fixed body with the same status if serialization
    /// fails.
    #[track_caller]
    pub fn render_response(&self, error: &AppError) -> RenderedError {
        let envelope = self.render(error);
        let status = envelope.status_code;
        let body = serde_json::to_string(&envelope).unwrap_or_else(|err| {
            tracing::warn!(
                target: INTERNAL_TARGET,
                error = %err,
                "error envelope not serializable, sending fallback body"
            );
            fallback_body(status)
        });
        RenderedError { status, body }
    }
}

fn fallback_body(status: u16) -> String {
    format!(
        r#"{{"result":false,"data":[],"message":"Internal error","status_code":{},"error":[]}}"#,
        status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::sink::MemorySink;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn renderer(settings: Settings) -> (ExceptionRenderer, MemorySink) {
        let sink = MemorySink::new();
        let reporter = FailureReporter::new(Arc::new(settings), Arc::new(sink.clone()));
        (ExceptionRenderer::new(reporter), sink)
    }

    fn local() -> Settings {
        let mut settings = Settings::default();
        settings.app.env = "local".to_string();
        settings
    }

    #[test]
    fn test_render_includes_origin_outside_production() {
        let (renderer, sink) = renderer(local());
        let line = line!() + 1;
        let err = AppError::new("Order is locked", 409).with_kind("OrderLocked");

        let env = renderer.render(&err);
        let info = env.error_info().unwrap();

        assert!(!env.result);
        assert_eq!(env.status_code, 409);
        assert_eq!(env.message, "Order is locked");
        assert_eq!(info.kind, "OrderLocked");
        assert_eq!(info.line, Some(line));
        assert!(info.file.as_deref().unwrap().ends_with("renderer.rs"));
        assert_eq!(info.code, "APP_COMMON");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_invalid_code_uses_configured_default() {
        let mut settings = local();
        settings.response.default_http_code = 500;
        let (renderer, _) = renderer(settings);

        assert_eq!(renderer.render(&AppError::new("x", 999)).status_code, 500);
        assert_eq!(renderer.render(&AppError::new("x", 0)).status_code, 500);
        assert_eq!(renderer.render(&AppError::new("x", 503)).status_code, 503);
    }

    #[test]
    fn test_code_from_error_origin() {
        let mut settings = local();
        settings.response.classcode = crate::ClassCodeMap::new().with("src/orders.rs", "ORD");
        let (renderer, _) = renderer(settings);

        let err = AppError::new("x", 400).at(CallSite::new("src/orders.rs", 77));
        assert_eq!(renderer.render(&err).error_info().unwrap().code, "ORD-77");
    }

    #[test]
    fn test_extra_data_merged() {
        let (renderer, _) = renderer(local());
        let err = AppError::new("x", 400).with_extra_field("order_id", &17);
        assert_eq!(renderer.render(&err).data, json!({"order_id": 17}));

        let plain = renderer.render(&AppError::new("x", 400));
        assert_eq!(plain.data, json!([]));
    }

    #[test]
    fn test_production_redacts_body_but_not_log() {
        let (renderer, sink) = renderer(Settings::default());
        let env = renderer.render(&AppError::new("secret path", 500));

        let info = env.error_info().unwrap();
        assert!(info.file.is_none());
        assert!(info.line.is_none());

        let logged = &sink.records()[0].context;
        let logged_error = logged.get("error").unwrap();
        assert!(logged_error.get("file").is_some());
        assert!(logged_error.get("line").is_some());
        assert_eq!(logged_error.get("trace_id"), Some(&json!(info.trace_id.as_str())));
    }

    #[test]
    fn test_render_response_body_matches_envelope() {
        let (renderer, _) = renderer(Settings::default());
        let rendered = renderer.render_response(&AppError::new("Gone", 410));

        assert_eq!(rendered.status, 410);
        let body: Value = serde_json::from_str(&rendered.body).unwrap();
        assert_eq!(body["status_code"], json!(410));
        assert_eq!(body["message"], json!("Gone"));
        assert!(body["error"]["code"].is_string());
    }

    #[test]
    fn test_fallback_body_is_valid_json() {
        let body: Value = serde_json::from_str(&fallback_body(500)).unwrap();
        assert_eq!(body["status_code"], json!(500));
        assert_eq!(body["result"], json!(false));
    }
}

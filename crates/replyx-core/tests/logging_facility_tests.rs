#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{local_settings, FailingSink};
use replyx_core::logging_facility::test_capture::init_test_capture;
use replyx_core::{AppError, ClassCodeMap, FailureReporter, Responder};
use replyx_core_types::schema::INTERNAL_TARGET;
use std::sync::Arc;
use tracing::Level;

#[test]
fn test_tracing_sink_emits_one_error_event() {
    let capture = init_test_capture();
    let responder = Responder::with_tracing(Arc::new(local_settings()));
    let message = "tracing_sink_unique_record_1";

    responder.error(serde_json::json!({"id": 9}), message, 404, Some("missing"));

    let events = capture.events_containing(message);
    assert_eq!(events.len(), 1, "Should have exactly one event");

    let event = &events[0];
    assert_eq!(event.level, Level::ERROR);
    assert_eq!(event.channel.as_deref(), Some("stack"));
    assert_eq!(event.code.as_deref(), Some("APP_COMMON"));
    assert_eq!(
        event.message.as_deref(),
        Some("APP_COMMON - tracing_sink_unique_record_1")
    );

    let context = event.context_json().unwrap();
    assert_eq!(context["data"], serde_json::json!({"id": 9}));
    assert_eq!(context["error"], serde_json::json!("missing"));
}

#[test]
fn test_caller_file_drives_code() {
    let capture = init_test_capture();
    let mut settings = local_settings();
    settings.response.classcode = ClassCodeMap::new().with(file!(), "LOGT");
    settings.response.log_channel = Some("audit".to_string());
    let reporter = FailureReporter::with_tracing(Arc::new(settings));
    let message = "caller_file_unique_record_2";

    let line = line!() + 1;
    reporter.warning(message, ());

    let events = capture.events_containing(message);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::WARN);
    assert_eq!(events[0].channel.as_deref(), Some("audit"));
    assert_eq!(events[0].code, Some(format!("LOGT-{}", line)));
}

#[test]
fn test_rendered_error_log_keeps_file_and_line() {
    let capture = init_test_capture();
    let responder = Responder::with_tracing(Arc::new(replyx_core::Settings::default()));
    let message = "rendered_unique_record_3";

    let envelope = responder.render(&AppError::new(message, 500));
    assert!(envelope.error_info().unwrap().file.is_none());

    let events = capture.events_containing(message);
    assert_eq!(events.len(), 1);
    let context = events[0].context_json().unwrap();
    assert!(context["error"]["file"].is_string());
    assert!(context["error"]["line"].is_number());
    assert_eq!(
        context["error"]["trace_id"],
        serde_json::json!(envelope.error_info().unwrap().trace_id.as_str())
    );
}

#[test]
fn test_sink_failure_is_reported_internally() {
    let capture = init_test_capture();
    let mut settings = local_settings();
    settings.response.app_name = Some("SINKDOWN".to_string());
    let reporter = FailureReporter::new(Arc::new(settings), Arc::new(FailingSink));

    reporter.error("sink_down_unique_record_4", ());

    let internal = capture.count_events(|e| {
        e.target == INTERNAL_TARGET && e.code.as_deref() == Some("SINKDOWN_COMMON")
    });
    assert_eq!(internal, 1);
    assert!(capture.events_containing("sink_down_unique_record_4").is_empty());
}

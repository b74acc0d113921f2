//! Failure reporting
//!
//! The reporter turns a raw message plus context into exactly one
//! [`LogRecord`]: resolve the diagnostic code for the call site, prefix it to
//! the message, normalize the context, write to the configured channel.
//! Reporting is a side effect only. A sink that errors or panics is
//! contained here and never reaches the caller.

use replyx_core_types::schema::INTERNAL_TARGET;
use replyx_core_types::CallSite;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::code_resolver::CodeResolver;
use crate::config::Settings;
use crate::context::LogContext;
use crate::formatter::format_message;
use crate::sink::{LogLevel, LogRecord, LogSink, TracingSink};

#[derive(Clone)]
pub struct FailureReporter {
    settings: Arc<Settings>,
    sink: Arc<dyn LogSink>,
}

impl std::fmt::Debug for FailureReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailureReporter")
            .field("channel", &self.settings.log_channel())
            .field("enabled", &self.settings.log_errors())
            .finish_non_exhaustive()
    }
}

impl FailureReporter {
    pub fn new(settings: Arc<Settings>, sink: Arc<dyn LogSink>) -> Self {
        Self { settings, sink }
    }

    /// Reporter writing through [`TracingSink`]
    pub fn with_tracing(settings: Arc<Settings>) -> Self {
        Self::new(settings, Arc::new(TracingSink))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_arc(&self) -> Arc<Settings> {
        Arc::clone(&self.settings)
    }

    /// Build the record for `message` attributed to `site`
    ///
    /// Pure: no sink is touched.
    pub fn record(
        &self,
        message: &str,
        context: impl Into<LogContext>,
        site: &CallSite,
        level: LogLevel,
    ) -> LogRecord {
        let code = CodeResolver::from_settings(&self.settings).resolve_site(site);
        LogRecord {
            level,
            channel: self.settings.log_channel().to_string(),
            formatted_message: format_message(message, &code),
            code,
            context: context.into(),
        }
    }

    /// Write one record attributed to `site`
    ///
    /// Does nothing when `log_errors` is disabled. Never fails and never
    /// panics, whatever the sink does.
    pub fn report(
        &self,
        message: &str,
        context: impl Into<LogContext>,
        site: &CallSite,
        level: LogLevel,
    ) {
        if !self.settings.log_errors() {
            return;
        }
        let record = self.record(message, context, site, level);

        match catch_unwind(AssertUnwindSafe(|| self.sink.write(&record))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(
                    target: INTERNAL_TARGET,
                    error = %err,
                    channel = record.channel.as_str(),
                    code = record.code.as_str(),
                    "failure record not written"
                );
            }
            Err(_) => {
                tracing::warn!(
                    target: INTERNAL_TARGET,
                    channel = record.channel.as_str(),
                    code = record.code.as_str(),
                    "log sink panicked, failure record not written"
                );
            }
        }
    }

    /// Report at `info`, attributed to the caller
    #[track_caller]
    pub fn info(&self, message: &str, context: impl Into<LogContext>) {
        self.report(message, context, &CallSite::caller(), LogLevel::Info);
    }

    /// Report at `warning`, attributed to the caller
    #[track_caller]
    pub fn warning(&self, message: &str, context: impl Into<LogContext>) {
        self.report(message, context, &CallSite::caller(), LogLevel::Warning);
    }

    /// Report at `error`, attributed to the caller
    #[track_caller]
    pub fn error(&self, message: &str, context: impl Into<LogContext>) {
        self.report(message, context, &CallSite::caller(), LogLevel::Error);
    }
}

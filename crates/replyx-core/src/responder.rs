//! Responder facade
//!
//! Bundles the envelope builder, validation adapter and error renderer over
//! one settings value and one sink. Handlers hold an `Arc<Responder>` (e.g.
//! as router state) instead of inheriting response behaviour.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::Settings;
use crate::envelope::{Envelope, EnvelopeBuilder};
use crate::errors::AppError;
use crate::renderer::{ExceptionRenderer, RenderedError};
use crate::reporter::FailureReporter;
use crate::sink::LogSink;
use crate::validation::{
    CustomMessages, RuleEngine, RuleSet, ValidationAdapter, ValidationOutcome, ValidationResult,
    Validator,
};

#[derive(Debug, Clone)]
pub struct Responder<V = RuleEngine> {
    reporter: FailureReporter,
    envelopes: EnvelopeBuilder,
    validation: ValidationAdapter<V>,
    renderer: ExceptionRenderer,
}

impl Responder<RuleEngine> {
    pub fn new(settings: Arc<Settings>, sink: Arc<dyn LogSink>) -> Self {
        Self::with_validator(settings, sink, RuleEngine)
    }

    /// Responder logging through `tracing`
    pub fn with_tracing(settings: Arc<Settings>) -> Self {
        let reporter = FailureReporter::with_tracing(settings);
        Self::from_reporter(reporter, RuleEngine)
    }
}

impl<V: Validator> Responder<V> {
    pub fn with_validator(settings: Arc<Settings>, sink: Arc<dyn LogSink>, validator: V) -> Self {
        Self::from_reporter(FailureReporter::new(settings, sink), validator)
    }

    pub fn from_reporter(reporter: FailureReporter, validator: V) -> Self {
        Self {
            envelopes: EnvelopeBuilder::new(reporter.clone()),
            validation: ValidationAdapter::with_validator(reporter.clone(), validator),
            renderer: ExceptionRenderer::new(reporter.clone()),
            reporter,
        }
    }

    pub fn settings(&self) -> &Settings {
        self.reporter.settings()
    }

    pub fn reporter(&self) -> &FailureReporter {
        &self.reporter
    }

    pub fn envelopes(&self) -> &EnvelopeBuilder {
        &self.envelopes
    }

    pub fn validation(&self) -> &ValidationAdapter<V> {
        &self.validation
    }

    pub fn renderer(&self) -> &ExceptionRenderer {
        &self.renderer
    }

    pub fn success<T: Serialize>(&self, data: T, message: impl Into<String>, code: u16) -> Envelope {
        self.envelopes.success(data, message, code)
    }

    #[track_caller]
    pub fn error<T: Serialize>(
        &self,
        data: T,
        message: impl Into<String>,
        code: u16,
        tag: Option<&str>,
    ) -> Envelope {
        self.envelopes.error(data, message, code, tag)
    }

    #[track_caller]
    pub fn validation_error(&self, body: ValidationResult) -> ValidationResult {
        self.envelopes.validation_error(body)
    }

    #[track_caller]
    pub fn validate(
        &self,
        input: &Value,
        rules: &RuleSet,
        display_message: Option<&str>,
        http_code: Option<u16>,
    ) -> ValidationResult {
        self.validation.validate(input, rules, display_message, http_code)
    }

    #[track_caller]
    pub fn validate_with(
        &self,
        input: &Value,
        rules: &RuleSet,
        custom: &CustomMessages,
        display_message: Option<&str>,
        http_code: Option<u16>,
    ) -> ValidationResult {
        self.validation
            .validate_with(input, rules, custom, display_message, http_code)
    }

    #[track_caller]
    pub fn validator_result(
        &self,
        outcome: &dyn ValidationOutcome,
        display_message: Option<&str>,
        http_code: Option<u16>,
    ) -> ValidationResult {
        self.validation
            .validator_result(outcome, display_message, http_code)
    }

    #[track_caller]
    pub fn render(&self, error: &AppError) -> Envelope {
        self.renderer.render(error)
    }

    #[track_caller]
    pub fn render_response(&self, error: &AppError) -> RenderedError {
        self.renderer.render_response(error)
    }

    /// Route a handler outcome: envelopes pass through, application errors
    /// are rendered
    #[track_caller]
    pub fn handle(&self, outcome: Result<Envelope, AppError>) -> Envelope {
        match outcome {
            Ok(envelope) => envelope,
            Err(error) => self.renderer.render(&error),
        }
    }
}

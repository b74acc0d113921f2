//! Validation envelopes
//!
//! The rule engine is a black box yielding pass/fail plus an ordered list of
//! messages ([`ValidationOutcome`]). The adapter wraps that into the
//! validation body, reporting failures once. A small built-in engine
//! ([`RuleEngine`]) covers the common field rules.

pub mod rules;

use replyx_core_types::schema::{CONTEXT_ERRORS, VALIDATION_ERROR_TYPE};
use replyx_core_types::CallSite;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::LogContext;
use crate::envelope::{empty_data, VALIDATION_FAILED_LOG_MESSAGE};
use crate::reporter::FailureReporter;
use crate::sink::LogLevel;

pub use rules::{CustomMessages, Rule, RuleEngine, RuleSet, Violations};

pub const VALIDATION_PASSED_MESSAGE: &str = "Validation passed";
pub const VALIDATION_PASSED_CODE: u16 = 200;

/// Result of running a validation engine
pub trait ValidationOutcome {
    fn failed(&self) -> bool;

    /// Violation messages in the engine's native order
    fn messages(&self) -> Vec<String>;
}

/// A validation engine
pub trait Validator: Send + Sync {
    fn check(&self, input: &Value, rules: &RuleSet, custom: &CustomMessages) -> Violations;
}

/// Body produced by validation
///
/// `code` and `status_code` always carry the same value; both are kept for
/// clients reading either one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub result: bool,
    pub data: Value,
    pub message: String,
    pub code: u16,
    pub status_code: u16,
    pub error: ValidationErrorField,
}

impl ValidationResult {
    /// The fixed success body
    pub fn passed() -> Self {
        Self {
            result: true,
            data: empty_data(),
            message: VALIDATION_PASSED_MESSAGE.to_string(),
            code: VALIDATION_PASSED_CODE,
            status_code: VALIDATION_PASSED_CODE,
            error: ValidationErrorField::Empty(Vec::new()),
        }
    }

    pub fn failed(message: impl Into<String>, status: u16, details: Vec<String>) -> Self {
        Self {
            result: false,
            data: empty_data(),
            message: message.into(),
            code: status,
            status_code: status,
            error: ValidationErrorField::Details(ValidationDetails {
                kind: VALIDATION_ERROR_TYPE.to_string(),
                details,
            }),
        }
    }

    pub fn details(&self) -> &[String] {
        match &self.error {
            ValidationErrorField::Details(d) => &d.details,
            ValidationErrorField::Empty(_) => &[],
        }
    }
}

/// The `error` member of a validation body: `[]` or the details object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationErrorField {
    Details(ValidationDetails),
    Empty(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub details: Vec<String>,
}

/// Wraps engine outcomes into validation bodies
#[derive(Debug, Clone)]
pub struct ValidationAdapter<V = RuleEngine> {
    reporter: FailureReporter,
    validator: V,
}

impl ValidationAdapter<RuleEngine> {
    pub fn new(reporter: FailureReporter) -> Self {
        Self::with_validator(reporter, RuleEngine)
    }
}

impl<V: Validator> ValidationAdapter<V> {
    pub fn with_validator(reporter: FailureReporter, validator: V) -> Self {
        Self {
            reporter,
            validator,
        }
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Build the body for an outcome produced by any engine
    ///
    /// On failure, `display_message` (if non-empty) overrides the configured
    /// message and `http_code` (if an HTTP status) overrides the configured
    /// default; one `error` record is written, attributed to the caller.
    #[track_caller]
    pub fn validator_result(
        &self,
        outcome: &dyn ValidationOutcome,
        display_message: Option<&str>,
        http_code: Option<u16>,
    ) -> ValidationResult {
        if !outcome.failed() {
            return ValidationResult::passed();
        }

        let site = CallSite::caller();
        let settings = self.reporter.settings();
        let messages = outcome.messages();

        let message = display_message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| settings.validation_error_message())
            .to_string();
        let status = match http_code {
            Some(code) => settings.status_or_default(i64::from(code)),
            None => settings.default_http_code(),
        };

        self.reporter.report(
            VALIDATION_FAILED_LOG_MESSAGE,
            LogContext::new().with(CONTEXT_ERRORS, &messages),
            &site,
            LogLevel::Error,
        );

        ValidationResult::failed(message, status, messages)
    }

    /// Run the engine over `input` and build the body
    #[track_caller]
    pub fn validate(
        &self,
        input: &Value,
        rules: &RuleSet,
        display_message: Option<&str>,
        http_code: Option<u16>,
    ) -> ValidationResult {
        self.validate_with(input, rules, &CustomMessages::new(), display_message, http_code)
    }

    /// [`ValidationAdapter::validate`] with engine message overrides
    #[track_caller]
    pub fn validate_with(
        &self,
        input: &Value,
        rules: &RuleSet,
        custom: &CustomMessages,
        display_message: Option<&str>,
        http_code: Option<u16>,
    ) -> ValidationResult {
        let violations = self.validator.check(input, rules, custom);
        self.validator_result(&violations, display_message, http_code)
    }
}

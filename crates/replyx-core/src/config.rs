//! Process-wide settings
//!
//! One immutable [`Settings`] value is built at startup and handed to every
//! component as `Arc<Settings>`. Nothing reads configuration at request time.
//!
//! # Sources
//!
//! Later sources win:
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. environment variables prefixed `REPLYX`, nested with `__`
//!    (e.g. `REPLYX__RESPONSE__LOG_CHANNEL=api`, `REPLYX__APP__ENV=staging`)
//!
//! ```toml
//! [response]
//! default_http_code = 422
//! log_channel = "api"
//! app_name = "SHOP"
//! base_path = "/srv/shop"
//!
//! [response.classcode]
//! "src/handlers/users.rs" = "USR"
//!
//! [app]
//! env = "production"
//! ```

use config::{Config, Environment, File, FileFormat};
use replyx_core_types::schema::{FALLBACK_APP_NAME, FALLBACK_LOG_CHANNEL, INTERNAL_TARGET};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::code_resolver::ClassCodeMap;
use crate::errors::ConfigError;

pub const ENV_PREFIX: &str = "REPLYX";
pub const ENV_SEPARATOR: &str = "__";

pub const DEFAULT_VALIDATION_ERROR_MESSAGE: &str =
    "Unable to validate data. Please check your input(s).";
pub const DEFAULT_HTTP_CODE: u16 = 422;
pub const PRODUCTION_ENV: &str = "production";

/// Options for envelopes, error codes and failure logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    pub validation_error_message: String,
    pub default_http_code: u16,
    pub log_errors: bool,
    pub log_channel: Option<String>,
    pub app_name: Option<String>,
    pub hide_file_line_in_production: bool,
    /// Project root stripped from call-site paths before class-code lookup
    pub base_path: String,
    pub classcode: ClassCodeMap,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            validation_error_message: DEFAULT_VALIDATION_ERROR_MESSAGE.to_string(),
            default_http_code: DEFAULT_HTTP_CODE,
            log_errors: true,
            log_channel: None,
            app_name: None,
            hide_file_line_in_production: true,
            base_path: String::new(),
            classcode: ClassCodeMap::new(),
        }
    }
}

/// Platform-level application identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: Option<String>,
    pub env: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: None,
            env: PRODUCTION_ENV.to_string(),
        }
    }
}

/// Platform-level logging defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub default_channel: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_channel: FALLBACK_LOG_CHANNEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub response: ResponseConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load from defaults, an optional TOML file and the process environment
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed, a value
    /// has the wrong type, or a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`Settings::load`], reading variables from `vars` instead of the
    /// process environment when given
    ///
    /// # Errors
    /// Same as [`Settings::load`].
    pub fn load_with_env(
        path: Option<&Path>,
        vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::new(&path.to_string_lossy(), FileFormat::Toml));
        }
        let raw = builder
            .add_source(environment(vars))
            .build()?;
        let mut settings: Settings = raw.try_deserialize()?;
        if let Some(path) = path {
            let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
                message: format!("{}: {}", path.display(), e),
            })?;
            overlay_classcode(&mut settings, &text)?;
        }
        finish(settings)
    }

    /// Parse settings from TOML text (no environment overlay)
    ///
    /// # Errors
    /// Same as [`Settings::load`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        let mut settings: Settings = raw.try_deserialize()?;
        overlay_classcode(&mut settings, text)?;
        finish(settings)
    }

    /// Reject values that would make every later lookup wrong
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for an out-of-range default HTTP code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_status(i64::from(self.response.default_http_code)) {
            return Err(ConfigError::Invalid {
                key: "response.default_http_code".to_string(),
                reason: format!(
                    "{} is not an HTTP status (100-599)",
                    self.response.default_http_code
                ),
            });
        }
        Ok(())
    }

    /// App name: response.app_name, then app.name, then "APP"
    pub fn app_name(&self) -> &str {
        non_empty(self.response.app_name.as_deref())
            .or_else(|| non_empty(self.app.name.as_deref()))
            .unwrap_or(FALLBACK_APP_NAME)
    }

    /// Channel for failure records; invalid channels fall back to the default
    pub fn log_channel(&self) -> &str {
        self.response
            .log_channel
            .as_deref()
            .filter(|c| is_valid_channel(c))
            .or_else(|| Some(self.logging.default_channel.as_str()).filter(|c| is_valid_channel(c)))
            .unwrap_or(FALLBACK_LOG_CHANNEL)
    }

    pub fn log_errors(&self) -> bool {
        self.response.log_errors
    }

    pub fn default_http_code(&self) -> u16 {
        self.response.default_http_code
    }

    pub fn validation_error_message(&self) -> &str {
        &self.response.validation_error_message
    }

    pub fn class_codes(&self) -> &ClassCodeMap {
        &self.response.classcode
    }

    pub fn base_path(&self) -> &str {
        &self.response.base_path
    }

    pub fn environment(&self) -> &str {
        &self.app.env
    }

    pub fn is_production(&self) -> bool {
        self.app.env == PRODUCTION_ENV
    }

    /// Whether file/line must be removed from client-visible error bodies
    pub fn redact_file_line(&self) -> bool {
        self.response.hide_file_line_in_production && self.is_production()
    }

    /// `code` if it is an HTTP status (100-599), else the configured default
    pub fn status_or_default(&self, code: i64) -> u16 {
        if is_http_status(code) {
            code as u16
        } else {
            self.default_http_code()
        }
    }
}

/// 100..=599 inclusive
pub fn is_http_status(code: i64) -> bool {
    (100..=599).contains(&code)
}

/// Channel names are non-empty ASCII words (`a-z0-9._:-`)
pub fn is_valid_channel(channel: &str) -> bool {
    !channel.is_empty()
        && channel
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn environment(vars: Option<HashMap<String, String>>) -> Environment {
    let env = Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true);
    match vars {
        Some(vars) => env.source(Some(vars.into_iter().collect())),
        None => env,
    }
}

/// Replace the class-code map with the table read from `text` as written
///
/// `config` lowercases table keys, but class-code keys are case-sensitive
/// paths.
fn overlay_classcode(settings: &mut Settings, text: &str) -> Result<(), ConfigError> {
    let document: toml::Table = toml::from_str(text)?;
    let table = document
        .get("response")
        .and_then(|response| response.get("classcode"))
        .cloned();
    if let Some(table) = table {
        settings.response.classcode = table.try_into()?;
    }
    Ok(())
}

fn finish(settings: Settings) -> Result<Settings, ConfigError> {
    settings.validate()?;
    if let Some(channel) = settings.response.log_channel.as_deref() {
        if !is_valid_channel(channel) {
            tracing::warn!(
                target: INTERNAL_TARGET,
                configured = channel,
                fallback = settings.log_channel(),
                "invalid log channel, using fallback"
            );
        }
    }
    Ok(settings)
}

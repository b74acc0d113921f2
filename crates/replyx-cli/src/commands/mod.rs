pub mod code;
pub mod config;
pub mod render;

use replyx_core::{ConfigError, Settings};
use std::path::Path;

/// Settings from the optional file plus the process environment
pub(crate) fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    Settings::load(path)
}

//! Canonical schema constants for structured logging and envelopes
//!
//! These constants ensure consistency across log records and response bodies.

// Canonical field keys for log records
pub const FIELD_CHANNEL: &str = "channel";
pub const FIELD_CODE: &str = "code";
pub const FIELD_CONTEXT: &str = "context";

// Context keys written by the reporter callers
pub const CONTEXT_DATA: &str = "data";
pub const CONTEXT_ERROR: &str = "error";
pub const CONTEXT_ERRORS: &str = "errors";

/// Suffix appended to the app name when no class code matches
pub const COMMON_CODE_SUFFIX: &str = "_COMMON";

/// App name used when neither the response nor the app section names one
pub const FALLBACK_APP_NAME: &str = "APP";

/// Channel used when no valid channel is configured
pub const FALLBACK_LOG_CHANNEL: &str = "stack";

/// Tracing target for the library's own degradations (sink down, bad channel)
pub const INTERNAL_TARGET: &str = "replyx::internal";

/// Error type tag used by validation failure bodies
pub const VALIDATION_ERROR_TYPE: &str = "validation_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_CHANNEL.is_empty());
        assert!(!FIELD_CODE.is_empty());
        assert!(!FIELD_CONTEXT.is_empty());
        assert!(!FALLBACK_APP_NAME.is_empty());
        assert!(!FALLBACK_LOG_CHANNEL.is_empty());
    }

    #[test]
    fn test_common_suffix_shape() {
        assert!(COMMON_CODE_SUFFIX.starts_with('_'));
        assert_eq!(format!("{}{}", FALLBACK_APP_NAME, COMMON_CODE_SUFFIX), "APP_COMMON");
    }
}

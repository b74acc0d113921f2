/// Compose a log line as `"{code} - {message}"`
///
/// # Example
///
/// ```
/// use replyx_core::formatter::format_message;
///
/// assert_eq!(format_message("Record not found", "USR-42"), "USR-42 - Record not found");
/// ```
pub fn format_message(message: &str, code: &str) -> String {
    format!("{} - {}", code, message)
}

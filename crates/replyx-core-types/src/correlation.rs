//! Correlation types for failure tracking
//!
//! These types tie a client-visible error body to the log record written
//! for it, and carry the source location a failure is attributed to.

use serde::{Deserialize, Serialize};
use std::panic::Location;
use uuid::Uuid;

/// Identifier of one error rendering event
///
/// A fresh id is generated every time an error envelope is rendered, so two
/// renders of the same logical error never share a trace id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// Generate a new random TraceId using UUIDv4
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source location a log line or error is attributed to
///
/// Captured explicitly at the public entry point (via `#[track_caller]`)
/// instead of walking the runtime stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Location of the caller of the enclosing `#[track_caller]` function
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    /// A call site with no file and no line; resolves to the default code
    pub fn unknown() -> Self {
        Self::new(String::new(), 0)
    }

    pub fn is_unknown(&self) -> bool {
        self.file.is_empty()
    }
}

impl From<&Location<'_>> for CallSite {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl std::fmt::Display for CallSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

//! Structured logging facility
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Test capture mode for deterministic assertions on emitted records
//!
//! Failure records reach `tracing` through [`crate::TracingSink`]; the
//! subscriber installed here decides how they are rendered.
//!
//! # Usage
//!
//! ```rust
//! use replyx_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};

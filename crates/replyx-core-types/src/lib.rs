//! Core types shared across the replyx facilities
//!
//! This crate provides foundational types used by envelope construction,
//! failure reporting and logging:
//!
//! - **Correlation types**: TraceId, CallSite
//! - **Schema constants**: Canonical field keys, channels and fallbacks

pub mod correlation;
pub mod schema;

pub use correlation::{CallSite, TraceId};

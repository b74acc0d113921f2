//! Render command
//!
//! Usage: replyx render <MESSAGE> [--status <N>] [--kind <KIND>] [--env <ENV>]
//!
//! The failure record goes to stderr through the logging facility; the
//! client body goes to stdout.

use clap::Args;
use replyx_core::errors::DEFAULT_APP_ERROR_CODE;
use replyx_core::logging_facility::{init, Profile};
use replyx_core::{AppError, Responder};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Error message
    pub message: String,

    /// Requested status; values outside 100-599 use the configured default
    #[arg(short, long, default_value_t = DEFAULT_APP_ERROR_CODE, allow_negative_numbers = true)]
    pub status: i64,

    /// Error type reported in `error.type`
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Override the app environment (e.g. `local` to keep file/line)
    #[arg(short, long)]
    pub env: Option<String>,

    /// TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Execute render command
pub fn execute(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = super::load_settings(args.config.as_deref())?;
    if let Some(env) = args.env {
        settings.app.env = env;
    }
    init(Profile::for_environment(settings.environment()));

    let mut error = AppError::new(args.message, args.status);
    if let Some(kind) = args.kind {
        error = error.with_kind(kind);
    }

    let responder = Responder::with_tracing(Arc::new(settings));
    let rendered = responder.render_response(&error);
    println!("{}", rendered.body);
    Ok(())
}

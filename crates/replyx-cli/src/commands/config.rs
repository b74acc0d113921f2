//! Config command
//!
//! Usage: replyx config [--config <FILE>]

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// TOML settings file (default: environment and built-in defaults only)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Execute config command
pub fn execute(args: ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = super::load_settings(args.config.as_deref())?;

    let effective = serde_json::json!({
        "settings": settings,
        "resolved": {
            "app_name": settings.app_name(),
            "log_channel": settings.log_channel(),
            "redact_file_line": settings.redact_file_line(),
        }
    });
    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(())
}

//! Code command
//!
//! Usage: replyx code <FILE> <LINE> [--config <FILE>]

use clap::Args;
use replyx_core::CodeResolver;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CodeArgs {
    /// Source file path as it appears in call-site locations
    pub file: String,

    /// Line number (0 yields the bare prefix)
    pub line: u32,

    /// TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Execute code command
pub fn execute(args: CodeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = super::load_settings(args.config.as_deref())?;
    let code = CodeResolver::from_settings(&settings).resolve(&args.file, args.line);
    println!("{}", code);
    Ok(())
}

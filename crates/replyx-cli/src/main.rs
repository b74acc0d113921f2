//! replyx CLI
//!
//! Inspect the settings, diagnostic codes and error bodies a service would
//! produce with a given configuration.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "replyx")]
#[command(about = "replyx - Uniform JSON responses and failure reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the effective settings as JSON
    Config(commands::config::ConfigArgs),
    /// Print the diagnostic code for a file and line
    Code(commands::code::CodeArgs),
    /// Print the error envelope rendered for an application error
    Render(commands::render::RenderArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config(args) => commands::config::execute(args),
        Commands::Code(args) => commands::code::execute(args),
        Commands::Render(args) => commands::render::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

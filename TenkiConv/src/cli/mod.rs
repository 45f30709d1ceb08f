//! TenkiConv CLI - Command-line interface for scene script translation

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "tenkiconv")]
#[command(version, about = "TenkiConv: scene script translation tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the TenkiConv CLI
///
/// # Errors
/// Returns an error if the command fails, including when any file of a batch fails.
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}

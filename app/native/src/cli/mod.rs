//! CLI module for Orientation Lock.
//!
//! The CLI drives the orientation controller against a simulated host, so
//! sessions can be replayed and inspected without a device.

mod commands;

use clap::Parser;
pub use commands::Cli;

use crate::error::OrientationError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), OrientationError> {
    let cli = Cli::parse();
    cli.execute()
}

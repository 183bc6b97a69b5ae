//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! domain-specific submodules:
//!
//! - `config_cmd` - Configuration file commands
//! - `replay` - Scripted controller sessions

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::OrientationError;
use crate::{config, schema};

pub mod config_cmd;
pub mod replay;

pub use config_cmd::ConfigCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Orientation Lock CLI - replay orientation sessions and manage configuration.
#[derive(Parser, Debug)]
#[command(name = "orientation-lock")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Replay a scripted session against a simulated host.
    ///
    /// Runs every step of a JSONC script through the orientation controller
    /// and prints each notification it raises, followed by the final state.
    #[command(
        after_long_help = r#"Examples:
  orientation-lock replay session.jsonc
  orientation-lock replay session.jsonc --json
  orientation-lock --config portrait.json replay session.jsonc"#
    )]
    Replay {
        /// Path to the replay script.
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Output the report as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Configuration file management commands.
    ///
    /// Initialize and locate the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    /// Can be used with eval or redirected to a file.
    ///
    /// Usage:
    ///   eval "$(orientation-lock completions --shell zsh)"
    ///   orientation-lock completions --shell fish > ~/.config/fish/completions/orientation-lock.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), OrientationError> {
        let config_path = self.config_path();
        if let Some(path) = &config_path
            && !path.exists()
        {
            return Err(OrientationError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        match &self.command {
            Commands::Replay { script, json } => {
                let config = config::load_or_default(config_path.as_deref());
                replay::execute(script, &config, *json)
            }
            Commands::Config(cmd) => config_cmd::execute(cmd),
            Commands::Schema => {
                println!("{}", schema::print_schema());
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "orientation-lock", &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_replay() {
        let cli = Cli::try_parse_from(["orientation-lock", "replay", "session.jsonc"]).unwrap();
        match cli.command {
            Commands::Replay { script, json } => {
                assert_eq!(script, PathBuf::from("session.jsonc"));
                assert!(!json);
            }
            _ => panic!("Expected Replay command"),
        }
    }

    #[test]
    fn test_cli_parses_replay_json() {
        let cli = Cli::try_parse_from(["orientation-lock", "replay", "s.json", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Replay { json: true, .. }));
    }

    #[test]
    fn test_cli_replay_requires_script() {
        assert!(Cli::try_parse_from(["orientation-lock", "replay"]).is_err());
    }

    #[test]
    fn test_cli_parses_schema() {
        let cli = Cli::try_parse_from(["orientation-lock", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn test_cli_parses_completions_zsh() {
        let cli =
            Cli::try_parse_from(["orientation-lock", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_global_config_flag() {
        let cli = Cli::try_parse_from([
            "orientation-lock",
            "replay",
            "s.json",
            "--config",
            "/tmp/orientation.json",
        ])
        .unwrap();
        assert_eq!(cli.config_path(), Some(PathBuf::from("/tmp/orientation.json")));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let cli = Cli::try_parse_from([
            "orientation-lock",
            "--config",
            missing.to_str().unwrap(),
            "schema",
        ])
        .unwrap();

        let err = cli.execute().unwrap_err();
        assert!(matches!(err, OrientationError::ConfigError(_)));
    }

    #[test]
    fn test_cli_debug_assert() { Cli::command().debug_assert(); }
}

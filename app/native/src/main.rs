#![allow(clippy::multiple_crate_versions)]

//! Orientation Lock CLI.
//!
//! Replays scripted orientation sessions, prints the configuration schema and
//! generates shell completions. Log output is controlled by the
//! `ORIENTATION_LOCK_LOG` environment variable (`warn` when unset).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "ORIENTATION_LOCK_LOG";

fn main() {
    init_tracing();

    if let Err(err) = orientation_lock::cli::run() {
        eprintln!("orientation-lock: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

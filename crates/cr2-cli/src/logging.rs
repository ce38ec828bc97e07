//! Wires up the `tracing` subscriber the rest of the workspace logs
//! through: `-v` (repeatable) raises the verbosity floor, `-l/--log-file`
//! redirects output from stderr to a file.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_subscriber::EnvFilter;

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initializes the global subscriber. Safe to call once per process; a
/// second call is a logic error in the caller, not something this
/// function guards against (there is only one entry point, `main`).
pub fn init(verbosity: u8, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(move || file.try_clone().expect("failed to clone log file handle"))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        }
    }

    Ok(())
}

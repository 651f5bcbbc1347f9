use crate::files::{ensure_dir, log_dir};
use anyhow::{anyhow, Result};
use std::io::IsTerminal;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Level used when RUST_LOG is unset, from -v / -q counts
pub fn default_level(verbose: u8, quiet: u8) -> &'static str {
    if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    }
}

fn env_filter(default: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))
}

/// Log to stderr, for one-shot subcommands
pub fn init_stderr(verbose: u8, quiet: u8) -> Result<()> {
    let filter = env_filter(default_level(verbose, quiet))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}

/// Log to `<log dir>/planner.log`, for the TUI. The terminal belongs to the
/// UI, so nothing may go to stderr while it runs. Keep the guard alive until
/// exit or buffered lines are lost.
pub fn init_file(verbose: u8) -> Result<WorkerGuard> {
    let dir = log_dir()?;
    ensure_dir(&dir)?;

    // The TUI logs requests at info by default
    let level = if verbose == 0 { "info" } else { default_level(verbose, 0) };
    let filter = env_filter(level)?;

    let appender = tracing_appender::rolling::never(&dir, "planner.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
        .try_init();

    Ok(guard)
}

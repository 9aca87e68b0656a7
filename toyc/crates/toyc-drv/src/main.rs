//! toyc - command-line entry point.
//!
//! Parses arguments, installs the log subscriber and hands over to
//! [`toyc_drv::run`]. Any failure is printed as `error: <message>` and the
//! process exits with status 1.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use toyc_drv::{Cli, DriverError};

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_color)?;

    let warnings = toyc_drv::run(&cli)
        .with_context(|| format!("failed to compile {}", cli.input.display()))?;
    tracing::debug!(warnings, "done");
    Ok(())
}

/// Initialize the logging system.
///
/// Logs go to stderr so they never mix with a listing written to stdout.
fn init_logging(verbose: bool, no_color: bool) -> toyc_drv::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| DriverError::Logging(e.to_string()))?;

    Ok(())
}

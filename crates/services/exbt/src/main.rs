//! exb Test Runner (exbt)
//!
//! Exports a set of test programs for every selected target and IDE, builds
//! each exported project with its external build tool and reports which
//! builds succeeded, failed or were skipped.
//!
//! Exports run concurrently on a pool of worker threads. Builds run one at a
//! time since every build tool is expected to use all available cores. The
//! process exits with the number of failed builds.

mod cli;
mod commands;
mod error;
mod prelude;

use std::process::ExitCode;

use clap::{CommandFactory, Parser, error::ErrorKind};
use cli::Cli;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::handle_run;
use crate::prelude::*;

/// Main entry point for the exb Test Runner.
///
/// # Examples
///
/// ```bash
/// # Export and build MBED_BLINKY for K64F with the GCC Makefile exporter
/// exbt --catalog catalog.toml --release 2 -m K64F -i make_gcc_arm
///
/// # Build the default OS test for every target, removing exports afterwards
/// exbt --catalog catalog.toml --release 5 --profile debug.json -c
/// ```
fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exbt=info,exb_harness=info,exb_export=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match handle_run(cli) {
        Ok(code) => code,
        Err(Error::Selection(message)) => Cli::command()
            .error(ErrorKind::InvalidValue, message)
            .exit(),
        Err(err) => {
            error!("Test run aborted: {}", err);
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                error!("Caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

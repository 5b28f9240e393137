//! # hdac
//!
//! Command-line front end for the header resolution pipeline.
//!
//! Exit status tells the build what happened: `0` success, `2` a mandatory dependency
//! could not be located, `3` the manifest is invalid, `1` anything else.

mod args;
mod commands;

pub use args::{Cli, Command, ManifestArg, ProbeArgs};

use anyhow::{Context, Result};
use hdac::domain::config::LogConfig;
use hdac::resolver::Diagnostic;
use hdac::{PipelineError, load_settings};
use hdac_logger::{LevelFilter, Logger, verbosity};
use std::io::{self, Write};
use std::process::ExitCode;

const EXIT_FAILURE: u8 = 1;
const EXIT_UNRESOLVED: u8 = 2;
const EXIT_MANIFEST: u8 = 3;

/// Runs one command to completion.
///
/// # Errors
/// Any failure of the selected command; see [`exit_code`] for how they are told apart.
pub fn run(cli: Cli) -> Result<()> {
    let mut cfg = load_settings(cli.config.as_deref())?;
    let _log = init_logger(&cfg.log, cli.verbose)?;

    match cli.command {
        Command::Check { manifest } => commands::check(&manifest),
        Command::Resolve { manifest, probe, json } => {
            probe.apply(&mut cfg.probe);
            commands::resolve(&manifest, &cfg.probe, json)
        },
        Command::Compose { manifest, probe, output } => {
            probe.apply(&mut cfg.probe);
            let output = output.or(cfg.output.path);
            commands::compose(&manifest, &cfg.probe, output.as_deref())
        },
    }
}

fn init_logger(cfg: &LogConfig, verbose: u8) -> Result<Logger> {
    let base: LevelFilter =
        cfg.level.parse().with_context(|| format!("Invalid log level `{}`", cfg.level))?;
    let builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(verbosity(base, verbose));

    let logger = match &cfg.directory {
        Some(dir) if cfg.json => builder.path(dir).json().init()?,
        Some(dir) => builder.path(dir).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

/// Maps a failure onto the process exit status.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    let code = match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::Resolution { .. }) => EXIT_UNRESOLVED,
        Some(PipelineError::Manifest { .. }) => EXIT_MANIFEST,
        _ => EXIT_FAILURE,
    };
    ExitCode::from(code)
}

/// Writes the failure to stderr. Resolution failures get the full candidate report.
pub fn report(err: &anyhow::Error) {
    let unresolved = match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::Resolution { source, .. }) => Some(source),
        _ => None,
    };

    let mut stderr = io::stderr().lock();
    let _ = match unresolved {
        Some(failure) => writeln!(stderr, "{}", Diagnostic::report(failure)),
        None => writeln!(stderr, "error: {err:#}"),
    };
}

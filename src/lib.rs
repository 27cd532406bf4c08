//! duplicatefile - Duplicate File Finder
//!
//! Walks a directory tree, groups files by size, hashes only the files that
//! share a size with another file (streaming XXH64), and reports every set of
//! files with identical size and content.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::config::{Config, ConfigError};
use crate::duplicates::{DuplicateFinder, FinderError};
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::Progress;

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error for an invalid configuration, an invalid root directory,
/// or when the log file, dump file or report cannot be written. Use
/// [`ExitCode::from_error`] to map it to a process exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.clone().or_else(Config::config_path);
    let mut config = Config::load_from_path(config_path.as_deref())?;
    cli.apply_to(&mut config).map_err(ConfigError::Invalid)?;
    config.validate()?;

    logging::init_logging(cli.verbosity(), cli.quiet, config.log_file.as_deref())?;
    log::debug!("Configuration: {:?}", config);

    let root = std::path::absolute(&cli.path)
        .map_err(|_| FinderError::PathNotFound(cli.path.clone()))?;

    let mut finder_config = config.finder_config();
    if !cli.no_progress && !cli.quiet {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let report = DuplicateFinder::new(finder_config).find_duplicates(&root)?;

    log::info!("Number of files: {}", report.num_of_files());
    log::info!(
        "Elapsed time: {:.3} s",
        report.summary().scan_duration.as_secs_f64()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        JsonOutput::new(&report).write_to(&mut out, true)?;
    } else {
        TextOutput::new(&report)
            .write_to(&mut out)
            .context("Failed to write report")?;
    }
    out.flush().context("Failed to write report")?;

    if let Some(ref dir) = config.dump_dir {
        let path = JsonOutput::new(&report).dump(dir)?;
        if !cli.quiet {
            eprintln!("Summary written to {}", path.display());
        }
    }

    Ok(ExitCode::Success)
}

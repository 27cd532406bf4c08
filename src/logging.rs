//! Logging infrastructure for duplicatefile.
//!
//! This module provides structured logging using the `log` facade. Console-only
//! runs use the `env_logger` backend; runs with a log file use `log4rs` with a
//! console appender and a file appender.
//!
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose`/`--debug` (debug/trace)
//! 3. Default: info level
//!
//! Log file lines look like `2024-01-31 12:00:00,123 - INFO - message`.
//!
//! # Example
//!
//! ```rust,no_run
//! use duplicatefile::logging::init_logging;
//! use std::path::Path;
//!
//! // Initialize with default (info) level, also writing to report.log
//! init_logging(0, false, Some(Path::new("report.log"))).unwrap();
//!
//! log::info!("Application started");
//! ```

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

use env_logger::Builder;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Pattern of one log file line.
pub const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S,%3f)} - {l} - {m}{n}";

/// Console pattern used alongside a log file.
const CONSOLE_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%S)} {h({l:<5})} {m}{n}";

/// Errors raised while setting up logging.
#[derive(thiserror::Error, Debug)]
pub enum LoggingError {
    /// The log file could not be opened for writing.
    #[error("Cannot open log file {path}")]
    LogFile {
        /// Log file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The log4rs configuration was rejected.
    #[error("Invalid logging configuration: {0}")]
    Config(String),

    /// A global logger was already installed.
    #[error("Logger already initialized")]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// This function should be called once at the start of the application,
/// before any logging calls are made.
///
/// # Priority
///
/// 1. If `RUST_LOG` environment variable is set, it takes precedence
/// 2. If `quiet` is true: Error level only
/// 3. If `verbose >= 2`: Trace level
/// 4. If `verbose == 1`: Debug level
/// 5. Default: Info level
///
/// With a log file, `RUST_LOG` must be a plain level (`debug`, `warn`, ...);
/// per-module directives are only honoured on console-only runs.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
/// * `log_file` - Optional file that receives a copy of every record (appended)
///
/// # Errors
///
/// Returns [`LoggingError`] if the log file cannot be opened or a logger is
/// already installed.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Result<(), LoggingError> {
    match log_file {
        Some(path) => init_with_file(verbose, quiet, path),
        None => init_console(verbose, quiet),
    }
}

fn init_console(verbose: u8, quiet: bool) -> Result<(), LoggingError> {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }
    configure_format(&mut builder, verbose);
    builder.try_init()?;

    if use_env {
        log::debug!(
            "Logging initialized from RUST_LOG environment variable: {:?}",
            env::var("RUST_LOG").ok()
        );
    } else {
        log::debug!(
            "Logging initialized at level: {:?}",
            determine_level(verbose, quiet)
        );
    }
    Ok(())
}

fn init_with_file(verbose: u8, quiet: bool, path: &Path) -> Result<(), LoggingError> {
    let env_level = env_level();
    let level = env_level.unwrap_or_else(|| determine_level(verbose, quiet));

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();
    let file = build_file_appender(path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .appender(Appender::builder().build("logfile", Box::new(file)))
        .build(
            Root::builder()
                .appender("console")
                .appender("logfile")
                .build(level),
        )
        .map_err(|e| LoggingError::Config(e.to_string()))?;

    log4rs::init_config(config)?;

    if env_level.is_none() && env::var("RUST_LOG").is_ok() {
        log::warn!("RUST_LOG is not a plain level, using {:?}", level);
    }
    log::debug!(
        "Logging initialized at level {:?}, writing to {}",
        level,
        path.display()
    );
    Ok(())
}

/// Appending file appender with the log file pattern.
fn build_file_appender(path: &Path) -> Result<FileAppender, LoggingError> {
    FileAppender::builder()
        .append(true)
        .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
        .build(path)
        .map_err(|source| LoggingError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// `RUST_LOG` as a single level, if it is one.
fn env_level() -> Option<LevelFilter> {
    env::var("RUST_LOG").ok()?.trim().parse().ok()
}

/// Determine the log level from CLI flags.
///
/// # Arguments
///
/// * `verbose` - Verbosity count (0=info, 1=debug, 2+=trace)
/// * `quiet` - If true, use error level
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Configure the console format based on build type and verbosity.
///
/// - Debug builds: timestamp, level, module path at `-v` and above
/// - Release builds: compact format (level + message only)
fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let timestamp = buf.timestamp_seconds();
            let level = record.level();
            let level_style = buf.default_level_style(level);

            if verbose >= 1 {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} [{}] {}",
                    timestamp,
                    level,
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} {}",
                    timestamp,
                    level,
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let level_style = buf.default_level_style(level);
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        });
    }
}

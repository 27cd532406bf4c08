//! Command-line interface definitions for duplicatefile.
//!
//! This module defines all CLI arguments using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Print a report of duplicates below ~/Downloads
//! duplicatefile -p ~/Downloads
//!
//! # Also write the log to report.log and a JSON dump to the current directory
//! duplicatefile -p ~/Downloads --logfile --dump
//!
//! # JSON summary on stdout, debug logging
//! duplicatefile -p ~/Downloads --json --debug
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Default log file name used when `--logfile` is given without a value.
pub const DEFAULT_LOG_FILE: &str = "report.log";

/// Find duplicate files by size and content hash.
///
/// Files are grouped by size first; only files sharing a size are read and
/// hashed, and files sharing both size and digest are reported together.
#[derive(Debug, Parser)]
#[command(name = "duplicatefile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to check
    #[arg(short, long, value_name = "PATH")]
    pub path: PathBuf,

    /// Show debug messages (same as -v)
    #[arg(long)]
    pub debug: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    pub quiet: bool,

    /// Also write log messages to a file (default: report.log)
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_LOG_FILE
    )]
    pub logfile: Option<PathBuf>,

    /// Write the JSON summary to DIR/dump_<pid>.json (default: current directory)
    #[arg(long, value_name = "DIR", num_args = 0..=1, default_missing_value = ".")]
    pub dump: Option<PathBuf>,

    /// Print the JSON summary instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Read block size used when hashing (e.g., 64KiB, 1MiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub block_size: Option<u64>,

    /// Number of I/O threads for hashing (default: 4)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Descend into symbolically linked directories
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Configuration file (TOML)
    ///
    /// If not specified, a default platform-specific path is used.
    #[arg(long, value_name = "FILE", env = "DUPLICATEFILE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    /// Effective verbosity, counting `--debug` as one `-v`.
    #[must_use]
    pub fn verbosity(&self) -> u8 {
        if self.debug {
            self.verbose.max(1)
        } else {
            self.verbose
        }
    }

    /// Apply the flags that were given on top of a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `--block-size` does not fit in memory addressing.
    pub fn apply_to(&self, config: &mut Config) -> Result<(), String> {
        if let Some(threads) = self.io_threads {
            config.io_threads = threads;
        }
        if let Some(size) = self.block_size {
            config.block_size =
                usize::try_from(size).map_err(|_| format!("Block size too large: {size}"))?;
        }
        if self.follow_symlinks {
            config.follow_symlinks = true;
        }
        if let Some(ref dir) = self.dump {
            config.dump_dir = Some(dir.clone());
        }
        if let Some(ref file) = self.logfile {
            config.log_file = Some(file.clone());
        }
        Ok(())
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use duplicatefile::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("64KiB").unwrap(), 65536);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}

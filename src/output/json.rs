//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!     "path": "/scanned/root",
//!     "num_of_files": 3,
//!     "skipped": 0,
//!     "duplicate": {
//!         "5": {
//!             "26c7827d889f6da3": ["/scanned/root/a.txt", "/scanned/root/b.txt"]
//!         }
//!     },
//!     "files": ["/scanned/root/a.txt", "/scanned/root/b.txt", "/scanned/root/c.txt"]
//! }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use duplicatefile::duplicates::DuplicateFinder;
//! use duplicatefile::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let report = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&report);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::duplicates::{DuplicateSets, ScanReport};
use crate::scanner::{LossyPath, LossyPaths};

/// Indentation used by the pretty printer.
const INDENT: &[u8] = b"    ";

/// JSON summary of one scan.
///
/// Paths that are not valid UTF-8 are written with U+FFFD replacements.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Scanned root directory
    pub path: LossyPath<'a>,
    /// Number of inventoried files
    pub num_of_files: usize,
    /// Number of entries skipped because of errors
    pub skipped: usize,
    /// size → digest → paths
    pub duplicate: &'a DuplicateSets,
    /// Every inventoried path
    pub files: LossyPaths<'a>,
}

impl<'a> JsonOutput<'a> {
    /// Build the summary for a finished scan.
    #[must_use]
    pub fn new(report: &'a ScanReport) -> Self {
        Self {
            path: LossyPath(report.root()),
            num_of_files: report.num_of_files(),
            skipped: report.summary().skipped(),
            duplicate: report.duplicates(),
            files: LossyPaths(report.files()),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, JsonOutputError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to JSON indented with four spaces.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, JsonOutputError> {
        let mut buffer = Vec::new();
        self.serialize_pretty(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| JsonOutputError::Io(std::io::Error::other(e)))
    }

    fn serialize_pretty<W: Write>(&self, writer: W) -> Result<(), JsonOutputError> {
        let mut serializer =
            serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
        self.serialize(&mut serializer)?;
        Ok(())
    }

    /// The complete document, newline-terminated.
    fn render(&self, pretty: bool) -> Result<Vec<u8>, JsonOutputError> {
        let mut buffer = Vec::new();
        if pretty {
            self.serialize_pretty(&mut buffer)?;
        } else {
            serde_json::to_writer(&mut buffer, self)?;
        }
        buffer.push(b'\n');
        Ok(buffer)
    }

    /// Write JSON to a writer.
    ///
    /// The document is rendered in full first, so nothing is written if
    /// serialization fails.
    ///
    /// # Arguments
    ///
    /// * `writer` - The writer to output to (e.g., stdout)
    /// * `pretty` - Whether to pretty-print the output
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        writer.write_all(&self.render(pretty)?)?;
        Ok(())
    }

    /// Write the pretty-printed summary to `dir/dump_<pid>.json`.
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`JsonOutputError::Create`] if the file cannot be written. A
    /// partially written file is removed.
    pub fn dump(&self, dir: &Path) -> Result<PathBuf, JsonOutputError> {
        let path = dir.join(dump_file_name());
        let document = self.render(true)?;

        if let Err(source) = fs::write(&path, &document) {
            if path.is_file() {
                let _ = fs::remove_file(&path);
            }
            return Err(JsonOutputError::Create { path, source });
        }

        log::info!("Dumped summary to {}", path.display());
        Ok(path)
    }
}

/// File name used by [`JsonOutput::dump`] for the current process.
#[must_use]
pub fn dump_file_name() -> String {
    format!("dump_{}.json", std::process::id())
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization failed")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error while writing JSON")]
    Io(#[from] std::io::Error),

    /// The dump file could not be created
    #[error("Cannot create {path}")]
    Create {
        /// Dump file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

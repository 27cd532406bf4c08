//! Output formatters for duplicate scan results.
//!
//! This module provides the output formats for scan results:
//! - Text for the terminal
//! - JSON for automation, scripting and dump files
//!
//! # Example
//!
//! ```no_run
//! use duplicatefile::duplicates::DuplicateFinder;
//! use duplicatefile::output::{JsonOutput, TextOutput};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let report = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! print!("{}", TextOutput::new(&report).render());
//! println!("{}", JsonOutput::new(&report).to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;

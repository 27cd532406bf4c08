//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Directory walking using walkdir
//! - Streaming content hashing with XXH64
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: XXH64 file hashing (streaming, fixed-size blocks)
//!
//! # Example
//!
//! ```no_run
//! use duplicatefile::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::{Path, PathBuf};

use serde::Serialize;

// Re-export main types
pub use hasher::{Digest, Hasher, DEFAULT_BLOCK_SIZE};
pub use path_utils::{LossyPath, LossyPaths};
pub use walker::Walker;

/// A discovered file.
///
/// Records are values: the walker creates them with a path and a size, and
/// [`FileRecord::with_hash`] derives a new record carrying the content digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Path to the file, as reached by the walk
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Content digest, absent until the file has been hashed
    pub hash: Option<Digest>,
}

impl FileRecord {
    /// Create a new, unhashed record.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            hash: None,
        }
    }

    /// Derive a new record with its content digest set.
    ///
    /// `self` is left untouched.
    #[must_use]
    pub fn with_hash(&self, hash: Digest) -> Self {
        Self {
            path: self.path.clone(),
            size: self.size,
            hash: Some(hash),
        }
    }

    /// Whether the digest has been computed.
    #[must_use]
    pub fn is_hashed(&self) -> bool {
        self.hash.is_some()
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Descend into symbolic links that point to directories.
    /// Symlinked files are always listed and stat'ed through the link.
    pub follow_symlinks: bool,

    /// File names that are never inventoried (e.g. `.DS_Store`).
    pub skip_names: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            skip_names: vec![".DS_Store".to_string()],
        }
    }
}

impl WalkerConfig {
    /// Create a new walker configuration.
    ///
    /// # Arguments
    ///
    /// * `follow_symlinks` - Whether to descend into symlinked directories
    /// * `skip_names` - File names to ignore
    #[must_use]
    pub fn new(follow_symlinks: bool, skip_names: Vec<String>) -> Self {
        Self {
            follow_symlinks,
            skip_names,
        }
    }
}

/// Errors that can occur during directory scanning.
///
/// All of these are per-entry: they are logged and recorded, never fatal.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry disappeared between listing and stat.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file could not be hashed.
    #[error(transparent)]
    HashError(#[from] HashError),
}

impl ScanError {
    /// Classify an I/O error raised for `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the entry that was skipped.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) => p,
            Self::Io { path, .. } => path,
            Self::HashError(e) => e.path(),
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file was removed before it could be hashed.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}

//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and building the file inventory (path and byte size of every regular file).
//!
//! # Error handling
//!
//! Errors never stop the walk. A directory that cannot be opened is yielded as
//! a [`ScanError`] and its subtree is skipped; a file that vanishes or cannot
//! be stat'ed is yielded as a [`ScanError`] and skipped. Callers decide whether
//! to record or ignore them.
//!
//! # Example
//!
//! ```no_run
//! use duplicatefile::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::{FileRecord, ScanError, WalkerConfig};
use crate::progress::ProgressCallback;

/// Directory walker for file discovery.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional progress callback
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            progress_callback: None,
        }
    }

    /// Report each inventoried file to `callback`.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// Returns an iterator over [`FileRecord`] results. Errors are yielded
    /// as [`ScanError`] values rather than stopping iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let mut discovered = 0usize;

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| {
                let result = match entry_result {
                    Ok(entry) => self.process_entry(&entry)?,
                    Err(e) => Err(self.handle_walk_error(e)),
                };

                if let (Ok(file), Some(callback)) = (&result, &self.progress_callback) {
                    discovered += 1;
                    callback.on_progress(discovered, file.path.to_string_lossy().as_ref());
                }

                Some(result)
            })
    }

    /// Turn a directory entry into a record, or `None` for entries that are
    /// not inventoried (directories, special files, skipped names).
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileRecord, ScanError>> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return None;
        }

        let path = entry.path();
        if self.is_skipped_name(path) {
            log::trace!("Ignoring file: {}", path.display());
            return None;
        }

        // Symlinked files are stat'ed through the link; everything else
        // uses the metadata of the entry itself.
        let metadata = if file_type.is_symlink() {
            std::fs::metadata(path)
        } else {
            entry.metadata().map_err(|e| {
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("metadata unavailable"))
            })
        };

        let metadata = match metadata {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_io_error(path, e))),
        };

        if !metadata.is_file() {
            log::trace!("Skipping non-regular file: {}", path.display());
            return None;
        }

        Some(Ok(FileRecord::new(path.to_path_buf(), metadata.len())))
    }

    fn is_skipped_name(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy())
            .is_some_and(|name| self.config.skip_names.iter().any(|s| *s == name))
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        let err = ScanError::from_io(path, error);
        match &err {
            ScanError::NotFound(_) => {
                log::warn!("File disappeared during scan, skipping: {}", path.display());
            }
            _ => log::warn!("Skipping {}: {}", path.display(), err),
        }
        err
    }

    /// Handle walkdir errors (unreadable directories, symlink loops).
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = error.loop_ancestor() {
            log::warn!(
                "Symlink loop at {} (points to {}), skipping",
                path.display(),
                ancestor.display()
            );
            return ScanError::Io {
                path,
                source: std::io::Error::other("filesystem loop"),
            };
        }

        let io_error = error
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("walk error"));
        let err = ScanError::from_io(&path, io_error);
        log::warn!("Skipping subtree {}: {}", path.display(), err);
        err
    }
}

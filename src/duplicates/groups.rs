//! Size grouping and duplicate set structures.
//!
//! # Overview
//!
//! Size grouping is the first phase of duplicate detection. Every inventoried
//! file lands in exactly one [`SizeGroup`], keyed by its byte size. Only the
//! groups with two or more members go on to be hashed: a file whose size is
//! unique cannot have a duplicate.
//!
//! [`DuplicateSets`] holds the final result: size → digest → paths, with
//! every stored bucket holding at least two paths.
//!
//! # Example
//!
//! ```
//! use duplicatefile::scanner::FileRecord;
//! use duplicatefile::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/file1.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file2.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups.candidates().count(), 1);
//! assert_eq!(stats.potential_duplicates, 2);
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::scanner::{Digest, FileRecord, LossyPaths};

/// A group of files with the same size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeGroup {
    /// File size in bytes (shared by all files in this group)
    pub size: u64,
    /// Files with this exact size
    pub files: Vec<FileRecord>,
}

impl SizeGroup {
    /// Create a new, empty size group.
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            size,
            files: Vec::new(),
        }
    }

    /// Create a size group with initial files.
    #[must_use]
    pub fn with_files(size: u64, files: Vec<FileRecord>) -> Self {
        Self { size, files }
    }

    /// Add a file to this group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if file size doesn't match group size.
    pub fn add(&mut self, file: FileRecord) {
        debug_assert_eq!(
            file.size, self.size,
            "File size {} doesn't match group size {}",
            file.size, self.size
        );
        self.files.push(file);
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group has potential duplicates (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.files.len() as u64
    }
}

/// All size groups of one inventory, ordered by size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeGroups {
    groups: BTreeMap<u64, Vec<FileRecord>>,
}

impl SizeGroups {
    /// Number of distinct sizes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the inventory was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Files of the given size.
    #[must_use]
    pub fn get(&self, size: u64) -> Option<&[FileRecord]> {
        self.groups.get(&size).map(Vec::as_slice)
    }

    /// Total number of files across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Iterate over `(size, files)` in ascending size order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &[FileRecord])> {
        self.groups.iter().map(|(size, files)| (*size, files.as_slice()))
    }

    /// Iterate over the groups with two or more members.
    pub fn candidates(&self) -> impl Iterator<Item = (u64, &[FileRecord])> {
        self.iter().filter(|(_, files)| files.len() > 1)
    }

    /// Consume the groups, keeping only those with two or more members.
    #[must_use]
    pub fn into_candidates(self) -> Vec<SizeGroup> {
        self.groups
            .into_iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(size, files)| SizeGroup::with_files(size, files))
            .collect()
    }
}

/// Statistics about size grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of empty files encountered
    pub empty_files: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size (Phase 1 of duplicate detection).
///
/// Every file is placed in the group keyed by its own size. Empty files are
/// grouped like any other size: all zero-byte files are mutual duplicates.
///
/// # Performance
///
/// O(n) in the number of files; no file I/O is performed.
///
/// # Example
///
/// ```
/// use duplicatefile::scanner::FileRecord;
/// use duplicatefile::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileRecord::new(PathBuf::from("/a.txt"), 100),
///     FileRecord::new(PathBuf::from("/b.txt"), 100),
///     FileRecord::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.get(100).unwrap().len(), 2);
/// assert_eq!(groups.get(200).unwrap().len(), 1);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(files: impl IntoIterator<Item = FileRecord>) -> (SizeGroups, GroupingStats) {
    let mut groups: BTreeMap<u64, Vec<FileRecord>> = BTreeMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }
        groups.entry(file.size).or_default().push(file);
    }

    stats.unique_sizes = groups.len();

    for (size, files) in &groups {
        if files.len() == 1 {
            stats.eliminated_unique += 1;
            log::trace!(
                "Eliminated unique size {}: {}",
                size,
                files[0].path.display()
            );
        } else {
            stats.potential_duplicates += files.len();
            stats.duplicate_groups += 1;
            log::debug!(
                "Size group {} bytes: {} potential duplicates",
                size,
                files.len()
            );
        }
    }

    log::info!(
        "Phase 1 complete: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (SizeGroups { groups }, stats)
}

/// Confirmed duplicates: size → digest → paths.
///
/// Invariant: every stored bucket has at least two paths, and a size is only
/// present if it has at least one such bucket. Paths within a bucket are
/// kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateSets {
    sets: BTreeMap<u64, BTreeMap<Digest, Vec<PathBuf>>>,
}

impl DuplicateSets {
    /// Create an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a bucket of files sharing `size` and `digest`.
    ///
    /// Buckets with fewer than two paths are not duplicates and are dropped.
    /// Returns whether the bucket was stored.
    pub fn insert(&mut self, size: u64, digest: Digest, mut paths: Vec<PathBuf>) -> bool {
        if paths.len() < 2 {
            return false;
        }
        paths.sort();
        self.sets.entry(size).or_default().insert(digest, paths);
        true
    }

    /// Whether no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of sizes that have at least one duplicate set.
    #[must_use]
    pub fn size_count(&self) -> usize {
        self.sets.len()
    }

    /// Number of duplicate sets (hash buckets).
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.sets.values().map(BTreeMap::len).sum()
    }

    /// Number of redundant files: every copy beyond the first in each set.
    #[must_use]
    pub fn duplicate_file_count(&self) -> usize {
        self.iter().map(|(_, _, paths)| paths.len() - 1).sum()
    }

    /// Bytes that removing the redundant copies would free.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.iter()
            .map(|(size, _, paths)| size * (paths.len() as u64 - 1))
            .sum()
    }

    /// Buckets recorded for `size`.
    #[must_use]
    pub fn get(&self, size: u64) -> Option<&BTreeMap<Digest, Vec<PathBuf>>> {
        self.sets.get(&size)
    }

    /// Iterate over `(size, digest, paths)` ordered by size then digest.
    pub fn iter(&self) -> impl Iterator<Item = (u64, Digest, &[PathBuf])> {
        self.sets.iter().flat_map(|(size, buckets)| {
            buckets
                .iter()
                .map(move |(digest, paths)| (*size, *digest, paths.as_slice()))
        })
    }

    /// Whether `path` is part of any duplicate set.
    #[must_use]
    pub fn contains_path(&self, path: &Path) -> bool {
        self.iter().any(|(_, _, paths)| paths.iter().any(|p| p == path))
    }
}

/// Serializes as `{size: {digest: [paths]}}` with lossy UTF-8 paths.
impl Serialize for DuplicateSets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.sets.iter().map(|(size, buckets)| (size, Buckets(buckets))))
    }
}

struct Buckets<'a>(&'a BTreeMap<Digest, Vec<PathBuf>>);

impl Serialize for Buckets<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.0
                .iter()
                .map(|(digest, paths)| (digest, LossyPaths(paths))),
        )
    }
}

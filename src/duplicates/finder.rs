//! Duplicate finder implementation with multi-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk**: Build the inventory (see [`crate::scanner::Walker`])
//! 2. **Phase 1 - Size grouping**: Group files by size (see [`crate::duplicates::groups`])
//! 3. **Phase 2 - Selective hash**: Hash the content of files in size groups of 2+
//! 4. **Phase 3 - Hash partition**: Bucket hashed files by digest, keep buckets of 2+
//!
//! Phases run strictly in order. Phase 2 never touches a file whose size is
//! unique, which is where the pipeline saves its I/O.
//!
//! # Example
//!
//! ```no_run
//! use duplicatefile::scanner::{Walker, WalkerConfig, FileRecord, Hasher};
//! use duplicatefile::duplicates::{group_by_size, phase2_hash, phase3_partition, HashConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let files: Vec<FileRecord> = walker.walk().filter_map(Result::ok).collect();
//! let (size_groups, _) = group_by_size(files);
//!
//! let hasher = Hasher::new();
//! let (hashed, _) = phase2_hash(size_groups.into_candidates(), &hasher, &HashConfig::default());
//! let (duplicates, _) = phase3_partition(hashed);
//!
//! println!("{} duplicate sets", duplicates.group_count());
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::{group_by_size, DuplicateSets, SizeGroup};
use crate::progress::{ProgressCallback, PHASE_HASHING, PHASE_WALKING};
use crate::scanner::{Digest, FileRecord, HashError, Hasher, ScanError, Walker, WalkerConfig};

/// Default number of hashing threads.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Files larger than this are logged when hashing starts.
const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

// ============================================================================
// Phase 2 - Selective hash
// ============================================================================

/// Configuration for the hashing phase.
#[derive(Clone)]
pub struct HashConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for HashConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashConfig")
            .field("io_threads", &self.io_threads)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            progress_callback: None,
        }
    }
}

impl HashConfig {
    /// Set the number of hashing threads (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Statistics from the hashing phase.
#[derive(Debug, Default)]
pub struct HashStats {
    /// Files in the candidate size groups
    pub input_files: usize,
    /// Files successfully hashed
    pub hashed_files: usize,
    /// Files that failed to hash and were dropped
    pub failed_files: usize,
    /// Total bytes hashed across all files
    pub bytes_hashed: u64,
    /// Errors encountered while hashing
    pub errors: Vec<HashError>,
}

/// Result of hashing one size group on a worker.
struct HashedGroup {
    group: SizeGroup,
    errors: Vec<HashError>,
    bytes: u64,
}

/// Hash every file of the candidate size groups (Phase 2).
///
/// Each size group is handed whole to one worker of a pool limited to
/// `config.io_threads` threads; workers return their group with hashed
/// records and the coordinator merges the results. Every file is hashed at
/// most once. Groups with fewer than two members are dropped without
/// reading any file content.
///
/// Files that cannot be read are logged, counted in [`HashStats`] and left
/// out of the returned groups.
#[must_use]
pub fn phase2_hash(
    candidates: Vec<SizeGroup>,
    hasher: &Hasher,
    config: &HashConfig,
) -> (Vec<SizeGroup>, HashStats) {
    let candidates: Vec<SizeGroup> = candidates
        .into_iter()
        .filter(|group| {
            if group.has_duplicates() {
                true
            } else {
                log::debug!("Phase 2: skipping singleton size group {}", group.size);
                false
            }
        })
        .collect();

    let input_files: usize = candidates.iter().map(SizeGroup::len).sum();
    let mut stats = HashStats {
        input_files,
        ..Default::default()
    };

    if candidates.is_empty() {
        log::debug!("Phase 2: No files to hash");
        return (Vec::new(), stats);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start(PHASE_HASHING, input_files);
    }

    log::info!(
        "Phase 2: Hashing {} files in {} size groups",
        input_files,
        candidates.len()
    );

    let completed = AtomicUsize::new(0);
    let work = || -> Vec<HashedGroup> {
        candidates
            .into_par_iter()
            .map(|group| hash_size_group(group, hasher, config, &completed))
            .collect()
    };

    let results = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.io_threads.max(1))
        .build()
    {
        Ok(pool) => pool.install(work),
        Err(e) => {
            log::warn!(
                "Failed to create hashing pool ({}), using global pool with {} threads",
                e,
                rayon::current_num_threads()
            );
            work()
        }
    };

    let mut hashed_groups = Vec::with_capacity(results.len());
    for result in results {
        stats.hashed_files += result.group.len();
        stats.failed_files += result.errors.len();
        stats.bytes_hashed += result.bytes;
        stats.errors.extend(result.errors);
        hashed_groups.push(result.group);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end(PHASE_HASHING);
    }

    log::info!(
        "Phase 2 complete: {} files hashed, {} failed, {} bytes read",
        stats.hashed_files,
        stats.failed_files,
        stats.bytes_hashed
    );

    (hashed_groups, stats)
}

/// Hash all members of one size group. Runs on a single worker.
fn hash_size_group(
    group: SizeGroup,
    hasher: &Hasher,
    config: &HashConfig,
    completed: &AtomicUsize,
) -> HashedGroup {
    let mut hashed = SizeGroup::new(group.size);
    let mut errors = Vec::new();
    let mut bytes = 0u64;

    for file in &group.files {
        if file.size > LARGE_FILE_THRESHOLD {
            log::debug!(
                "Hashing large file ({} MB): {}",
                file.size / (1024 * 1024),
                file.path.display()
            );
        }

        match hasher.hash_file(&file.path) {
            Ok(digest) => {
                log::trace!("Hashed {}: {}", file.path.display(), digest);
                bytes += file.size;
                hashed.add(file.with_hash(digest));
                if let Some(ref callback) = config.progress_callback {
                    callback.on_item_completed(file.size);
                }
            }
            Err(e) => {
                log::warn!("Failed to hash {}, skipping: {}", file.path.display(), e);
                errors.push(e);
            }
        }

        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref callback) = config.progress_callback {
            callback.on_progress(done, file.path.to_string_lossy().as_ref());
        }
    }

    HashedGroup {
        group: hashed,
        errors,
        bytes,
    }
}

// ============================================================================
// Phase 3 - Hash partition
// ============================================================================

/// Statistics from the hash partition phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionStats {
    /// Files whose digest was unique within their size group
    pub unique_hashes: usize,
    /// Number of confirmed duplicate sets
    pub duplicate_groups: usize,
    /// Number of redundant copies (excluding one original per set)
    pub duplicate_files: usize,
    /// Total space wasted by redundant copies
    pub wasted_space: u64,
}

/// Bucket hashed files by digest within each size group (Phase 3).
///
/// Only buckets with two or more files are kept. Records without a digest
/// are ignored.
#[must_use]
pub fn phase3_partition(hashed_groups: Vec<SizeGroup>) -> (DuplicateSets, PartitionStats) {
    let mut duplicates = DuplicateSets::new();
    let mut stats = PartitionStats::default();

    for group in hashed_groups {
        let mut buckets: BTreeMap<Digest, Vec<PathBuf>> = BTreeMap::new();
        for file in group.files {
            match file.hash {
                Some(digest) => buckets.entry(digest).or_default().push(file.path),
                None => log::debug!("Phase 3: unhashed record ignored: {}", file.path.display()),
            }
        }

        for (digest, paths) in buckets {
            let count = paths.len();
            if duplicates.insert(group.size, digest, paths) {
                log::debug!(
                    "Duplicate set {}: {} files, {} bytes each",
                    digest,
                    count,
                    group.size
                );
            } else {
                stats.unique_hashes += count;
            }
        }
    }

    stats.duplicate_groups = duplicates.group_count();
    stats.duplicate_files = duplicates.duplicate_file_count();
    stats.wasted_space = duplicates.wasted_space();

    log::info!(
        "Phase 3 complete: {} groups, {} duplicates, {} bytes reclaimable",
        stats.duplicate_groups,
        stats.duplicate_files,
        stats.wasted_space
    );

    (duplicates, stats)
}

// ============================================================================
// DuplicateFinder - Pipeline Orchestrator
// ============================================================================

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel hashing.
    pub io_threads: usize,
    /// Read block size used by the hasher.
    pub block_size: usize,
    /// Directory walking options.
    pub walker_config: WalkerConfig,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("block_size", &self.block_size)
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            block_size: crate::scanner::DEFAULT_BLOCK_SIZE,
            walker_config: WalkerConfig::default(),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of hashing threads (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the hashing block size (minimum 1).
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of files inventoried
    pub total_files: usize,
    /// Total size of all inventoried files in bytes
    pub total_size: u64,
    /// Number of files eliminated by size grouping (unique sizes)
    pub eliminated_by_size: usize,
    /// Number of files that were hashed
    pub hashed_files: usize,
    /// Total bytes read while hashing
    pub bytes_hashed: u64,
    /// Number of hashed files whose digest was unique
    pub eliminated_by_hash: usize,
    /// Number of confirmed duplicate sets
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Entries skipped during the walk or while hashing
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Number of entries that were skipped because of an error.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.scan_errors.len()
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize::b(self.total_size).to_string()
    }
}

/// The outcome of one scan.
#[derive(Debug)]
pub struct ScanReport {
    root: PathBuf,
    files: Vec<PathBuf>,
    duplicates: DuplicateSets,
    summary: ScanSummary,
}

impl ScanReport {
    /// Root directory that was scanned.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of inventoried files (after the walk, before any filtering).
    #[must_use]
    pub fn num_of_files(&self) -> usize {
        self.files.len()
    }

    /// Paths of all inventoried files.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Confirmed duplicates: size → digest → paths.
    #[must_use]
    pub fn duplicates(&self) -> &DuplicateSets {
        &self.duplicates
    }

    /// Scan statistics.
    #[must_use]
    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    /// Consume the report, keeping only the duplicate sets.
    #[must_use]
    pub fn into_duplicates(self) -> DuplicateSets {
        self.duplicates
    }
}

/// Errors that abort a scan before it starts.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Path is not a folder: {0}")]
    NotADirectory(PathBuf),

    /// The provided directory cannot be read.
    #[error("Cannot read {path}")]
    Unreadable {
        /// The root path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Duplicate finder that orchestrates the multi-phase detection pipeline.
///
/// # Example
///
/// ```no_run
/// use duplicatefile::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::Path;
///
/// let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(4));
/// let report = finder.find_duplicates(Path::new("/some/path")).unwrap();
///
/// println!("Scanned {} files", report.num_of_files());
/// println!("Found {} duplicate sets", report.duplicates().group_count());
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Hasher::with_block_size(config.block_size);
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Check that `path` is a readable directory.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the path is missing, not a directory, or
    /// cannot be listed.
    pub fn validate_root(path: &Path) -> Result<(), FinderError> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FinderError::PathNotFound(path.to_path_buf()),
            _ => FinderError::Unreadable {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        if !metadata.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }

        std::fs::read_dir(path).map_err(|e| FinderError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Find all duplicate files below the given path.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the root path is invalid. Errors on
    /// individual entries never fail the scan; they are recorded in
    /// [`ScanSummary::scan_errors`].
    pub fn find_duplicates(&self, path: &Path) -> Result<ScanReport, FinderError> {
        let start_time = Instant::now();
        Self::validate_root(path)?;

        log::info!("Starting duplicate scan of {}", path.display());

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_WALKING, 0);
        }

        let mut walker = Walker::new(path, self.config.walker_config.clone());
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(callback.clone());
        }

        let mut files = Vec::new();
        let mut scan_errors = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => files.push(file),
                Err(e) => scan_errors.push(e),
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_WALKING);
        }

        log::info!(
            "Found {} files ({} entries skipped)",
            files.len(),
            scan_errors.len()
        );

        Ok(self.detect(path.to_path_buf(), files, scan_errors, start_time))
    }

    /// Find duplicates from a pre-collected list of files.
    ///
    /// Use this method when the inventory comes from another source. The
    /// report's root is empty.
    #[must_use]
    pub fn find_duplicates_from_files(&self, files: Vec<FileRecord>) -> ScanReport {
        self.detect(PathBuf::new(), files, Vec::new(), Instant::now())
    }

    /// Run phases 1 to 3 over an inventory.
    fn detect(
        &self,
        root: PathBuf,
        files: Vec<FileRecord>,
        mut scan_errors: Vec<ScanError>,
        start_time: Instant,
    ) -> ScanReport {
        let inventory: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();

        log::info!("Phase 1: Grouping by size...");
        let (size_groups, size_stats) = group_by_size(files);

        let mut summary = ScanSummary {
            total_files: size_stats.total_files,
            total_size: size_stats.total_size,
            eliminated_by_size: size_stats.eliminated_unique,
            ..Default::default()
        };

        let hash_config = HashConfig {
            io_threads: self.config.io_threads,
            progress_callback: self.config.progress_callback.clone(),
        };
        let (hashed_groups, hash_stats) =
            phase2_hash(size_groups.into_candidates(), &self.hasher, &hash_config);

        summary.hashed_files = hash_stats.hashed_files;
        summary.bytes_hashed = hash_stats.bytes_hashed;
        scan_errors.extend(hash_stats.errors.into_iter().map(ScanError::from));

        let (duplicates, partition_stats) = phase3_partition(hashed_groups);

        summary.eliminated_by_hash = partition_stats.unique_hashes;
        summary.duplicate_groups = partition_stats.duplicate_groups;
        summary.duplicate_files = partition_stats.duplicate_files;
        summary.reclaimable_space = partition_stats.wasted_space;
        summary.scan_errors = scan_errors;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        ScanReport {
            root,
            files: inventory,
            duplicates,
            summary,
        }
    }
}

//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Selective content hashing of multi-member size groups (Phase 2)
//! - Partitioning by digest into duplicate sets (Phase 3)

pub mod finder;
pub mod groups;

pub use finder::{
    phase2_hash, phase3_partition, DuplicateFinder, FinderConfig, FinderError, HashConfig,
    HashStats, PartitionStats, ScanReport, ScanSummary, DEFAULT_IO_THREADS,
};
pub use groups::{group_by_size, DuplicateSets, GroupingStats, SizeGroup, SizeGroups};

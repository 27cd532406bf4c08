//! Serialization helpers for paths.
//!
//! `serde` refuses paths that are not valid UTF-8. Reports must still be
//! written for such trees, so these wrappers serialize a path through
//! [`Path::to_string_lossy`], replacing invalid sequences with U+FFFD.

use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

/// A path serialized as a lossy UTF-8 string.
#[derive(Debug, Clone, Copy)]
pub struct LossyPath<'a>(pub &'a Path);

impl Serialize for LossyPath<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string_lossy())
    }
}

/// A slice of paths serialized as an array of lossy UTF-8 strings.
#[derive(Debug, Clone, Copy)]
pub struct LossyPaths<'a>(pub &'a [PathBuf]);

impl Serialize for LossyPaths<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|p| LossyPath(p)))
    }
}

//! XXH64 file hasher with streaming support.
//!
//! # Overview
//!
//! The [`Hasher`] reads a file in fixed-size blocks and feeds each block to a
//! streaming XXH64 state (seed 0). The block size only affects I/O; every
//! positive block size yields the same [`Digest`] for the same content.
//!
//! # Example
//!
//! ```no_run
//! use duplicatefile::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.hash_file(Path::new("Cargo.toml")).unwrap();
//! println!("{}", digest);
//! ```

use std::fmt;
use std::fs::File;
use std::hash::Hasher as _;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use twox_hash::XxHash64;

use super::HashError;

/// Default read block size (64 KiB).
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// A 64-bit content fingerprint.
///
/// Displays and serializes as 16 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(u64);

impl Digest {
    /// Wrap a raw digest value.
    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Hex representation (16 characters).
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Digest {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16).map(Self)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Streaming content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    block_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default block size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    /// Create a hasher reading `block_size` bytes at a time (minimum 1).
    #[must_use]
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    /// Read block size in bytes.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Hash the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))
    }

    /// Hash everything `reader` yields until EOF.
    ///
    /// # Errors
    ///
    /// Returns the first non-interrupt I/O error from `reader`.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Digest> {
        let mut state = XxHash64::with_seed(0);
        let mut buffer = vec![0u8; self.block_size];

        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            state.write(&buffer[..read]);
        }

        Ok(Digest(state.finish()))
    }

    /// Hash an in-memory buffer.
    #[must_use]
    pub fn hash_bytes(data: &[u8]) -> Digest {
        let mut state = XxHash64::with_seed(0);
        state.write(data);
        Digest(state.finish())
    }
}

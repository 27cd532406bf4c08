//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (platform config directory, or an explicit `--config` path)
//! 3. `DUPLICATEFILE_*` environment variables
//! 4. CLI flags (applied by the caller)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::duplicates::{FinderConfig, DEFAULT_IO_THREADS};
use crate::scanner::{WalkerConfig, DEFAULT_BLOCK_SIZE};

/// Prefix of the environment variables read by [`Config::load_from_path`].
pub const ENV_PREFIX: &str = "DUPLICATEFILE_";

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration sources could not be parsed or merged.
    #[error("Failed to load configuration")]
    Load(#[from] Box<figment::Error>),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of hashing threads.
    pub io_threads: usize,
    /// Read block size used when hashing, in bytes.
    pub block_size: usize,
    /// Descend into symlinked directories.
    pub follow_symlinks: bool,
    /// File names that are never inventoried.
    pub skip_names: Vec<String>,
    /// Directory for JSON dumps.
    pub dump_dir: Option<PathBuf>,
    /// Log file path.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            block_size: DEFAULT_BLOCK_SIZE,
            follow_symlinks: false,
            skip_names: vec![".DS_Store".to_string()],
            dump_dir: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load the configuration using `path` as the TOML layer.
    ///
    /// A missing file is not an error; figment treats it as empty. Values are
    /// not validated here, since command-line overrides may still replace
    /// them. Call [`Config::validate`] once they are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source is malformed.
    pub fn load_from_path(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            log::debug!("Loading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(&figment)
    }

    /// Extract a configuration from an assembled figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if extraction fails.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract().map_err(Box::new)?)
    }

    /// Reject out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.io_threads == 0 {
            return Err(ConfigError::Invalid(
                "io_threads must be at least 1".to_string(),
            ));
        }
        if self.block_size == 0 {
            return Err(ConfigError::Invalid(
                "block_size must be at least 1 byte".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the walker options for this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.follow_symlinks, self.skip_names.clone())
    }

    /// Build the finder options for this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_io_threads(self.io_threads)
            .with_block_size(self.block_size)
            .with_walker_config(self.walker_config())
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "duplicatefile")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

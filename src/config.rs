//! Configuration for CaskKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{CaskError, Result};

/// Default rotation threshold for the active data file (1 GiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1 << 30;

/// Default upper bound on key length (64 KiB)
pub const DEFAULT_MAX_KEY_SIZE: usize = 64 * 1024;

/// Default upper bound on value length (256 MiB)
pub const DEFAULT_MAX_VALUE_SIZE: usize = 256 * 1024 * 1024;

/// Main configuration for a CaskKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── 1000000000.bitcask.data   (oldest, read-only)
    ///     ├── 1000000001.bitcask.data
    ///     └── 1000000002.bitcask.data   (active, append-only)
    pub data_dir: PathBuf,

    /// Rotate the active file once an append would push it past this size (in bytes)
    pub max_file_size: u64,

    // -------------------------------------------------------------------------
    // Validation Limits
    // -------------------------------------------------------------------------
    /// Longest accepted key (in bytes)
    pub max_key_size: usize,

    /// Longest accepted value (in bytes)
    pub max_value_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./caskkv_data"),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_key_size: DEFAULT_MAX_KEY_SIZE,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check limits before the engine touches the disk
    ///
    /// Key and value sizes are stored as u32 in the record header, so neither
    /// limit may exceed `u32::MAX`.
    pub fn validate(&self) -> Result<()> {
        if self.max_file_size == 0 {
            return Err(CaskError::Config("max_file_size must be greater than 0".to_string()));
        }
        if self.max_key_size == 0 || self.max_key_size > u32::MAX as usize {
            return Err(CaskError::Config(format!(
                "max_key_size must be in 1..={}, got {}",
                u32::MAX,
                self.max_key_size
            )));
        }
        if self.max_value_size == 0 || self.max_value_size > u32::MAX as usize {
            return Err(CaskError::Config(format!(
                "max_value_size must be in 1..={}, got {}",
                u32::MAX,
                self.max_value_size
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the rotation threshold (in bytes)
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// Set the maximum key length (in bytes)
    pub fn max_key_size(mut self, size: usize) -> Self {
        self.config.max_key_size = size;
        self
    }

    /// Set the maximum value length (in bytes)
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.config.max_value_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

//! Configuration for the mixer file loader
//!
//! [`LoaderConfig`] controls where the mixer file is looked up, how it is
//! read, and how permissive the loader is about long paths and non-numeric
//! device IDs.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Mixer file consulted when no explicit path is supplied.
pub const MIXER_PATH_DEFAULT: &str = "/system/etc/mixer_paths_0.xml";

/// Size of the HAL path buffer, including the C string terminator.
pub const MIXER_PATH_MAX_LENGTH: usize = 100;

/// Bytes read from the mixer file per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Handling of caller-supplied paths that do not fit the path buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathPolicy {
    /// Fail with [`LoadError::PathTooLong`](crate::LoadError::PathTooLong)
    #[default]
    Reject,
    /// Silently cut the path to the buffer size, as the HAL's `strlcpy` did
    Truncate,
}

/// Handling of device ID attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericPolicy {
    /// C `atoi` semantics: leading digits are used, anything else reads as 0
    #[default]
    Lenient,
    /// Only a complete decimal `i32` is accepted; anything else aborts the load
    Strict,
}

/// Configuration for [`PcmConfigLoader`](crate::PcmConfigLoader)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Mixer file used when the caller gives no path
    /// Default: `/system/etc/mixer_paths_0.xml`
    pub path: PathBuf,

    /// Path buffer size in bytes, terminator included
    /// Default: 100
    pub max_path_len: usize,

    /// Bytes requested from the file per read
    /// Default: 1024
    pub chunk_size: usize,

    /// What to do with paths that do not fit `max_path_len`
    /// Default: [`PathPolicy::Reject`]
    pub path_policy: PathPolicy,

    /// How device ID values are parsed
    /// Default: [`NumericPolicy::Lenient`]
    pub numeric_policy: NumericPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(MIXER_PATH_DEFAULT),
            max_path_len: MIXER_PATH_MAX_LENGTH,
            chunk_size: DEFAULT_CHUNK_SIZE,
            path_policy: PathPolicy::default(),
            numeric_policy: NumericPolicy::default(),
        }
    }
}

impl LoaderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Longest usable path in bytes.
    pub fn path_limit(&self) -> usize {
        self.max_path_len.saturating_sub(1)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }

        if self.max_path_len < 2 {
            return Err(ConfigError::PathLimitTooSmall(self.max_path_len));
        }

        let len = self.path.as_os_str().len();
        if len > self.path_limit() {
            return Err(ConfigError::DefaultPathTooLong {
                len,
                limit: self.path_limit(),
            });
        }

        Ok(())
    }

    /// Create a configuration that behaves exactly like the platform HAL:
    /// long paths are truncated and device IDs parse like `atoi`
    pub fn legacy() -> Self {
        Self {
            path_policy: PathPolicy::Truncate,
            numeric_policy: NumericPolicy::Lenient,
            ..Default::default()
        }
    }

    /// Create a configuration that rejects long paths and non-numeric IDs
    pub fn strict() -> Self {
        Self {
            path_policy: PathPolicy::Reject,
            numeric_policy: NumericPolicy::Strict,
            ..Default::default()
        }
    }

    /// Builder method to set the default mixer file
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Builder method to set the path buffer size
    pub fn with_max_path_len(mut self, max_path_len: usize) -> Self {
        self.max_path_len = max_path_len;
        self
    }

    /// Builder method to set the read chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Builder method to set the long-path policy
    pub fn with_path_policy(mut self, policy: PathPolicy) -> Self {
        self.path_policy = policy;
        self
    }

    /// Builder method to set the device ID parsing policy
    pub fn with_numeric_policy(mut self, policy: NumericPolicy) -> Self {
        self.numeric_policy = policy;
        self
    }
}

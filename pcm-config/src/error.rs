//! Error types for mixer configuration loading.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

const ENOMEM: i32 = 12;
const ENODEV: i32 = 19;
const EINVAL: i32 = 22;
const ENAMETOOLONG: i32 = 36;

/// Outcome of a failed load.
///
/// Whatever the variant, the [`DeviceTable`](crate::DeviceTable) that was
/// passed in stays usable: it holds the defaults plus every update applied
/// before the failure.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The mixer file could not be opened. Defaults are retained.
    ///
    /// Devices that ship no override file hit this in normal operation.
    #[error("failed to open {}, using defaults: {source}", .path.display())]
    DeviceNotConfigured {
        /// The resolved path
        path: PathBuf,
        /// Why the open failed
        #[source]
        source: io::Error,
    },

    /// The chunk buffer for the parse session could not be allocated
    #[error("failed to allocate a {size}-byte XML read buffer")]
    OutOfResources {
        /// Requested buffer size in bytes
        size: usize,
    },

    /// The document could not be read or parsed to the end.
    ///
    /// Updates applied by elements before the fault are kept.
    #[error("invalid mixer configuration in {origin}: {fault}")]
    InvalidConfiguration {
        /// File path or caller-supplied label of the source
        origin: String,
        /// What went wrong
        #[source]
        fault: ConfigurationFault,
    },

    /// The supplied path does not fit the supported length
    #[error("mixer path is {len} bytes, at most {limit} are supported")]
    PathTooLong {
        /// Length of the supplied path in bytes
        len: usize,
        /// Longest accepted path in bytes
        limit: usize,
    },
}

impl LoadError {
    /// Negative errno equivalent, as reported by the audio HAL init path.
    pub fn errno(&self) -> i32 {
        match self {
            LoadError::DeviceNotConfigured { .. } => -ENODEV,
            LoadError::OutOfResources { .. } => -ENOMEM,
            LoadError::InvalidConfiguration { .. } => -EINVAL,
            LoadError::PathTooLong { .. } => -ENAMETOOLONG,
        }
    }

    /// True when the file was simply absent or unreadable and defaults stand.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, LoadError::DeviceNotConfigured { .. })
    }
}

/// Why a document was rejected mid-stream.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationFault {
    /// Reading the next chunk failed
    #[error("read failed: {0}")]
    Io(#[source] Arc<io::Error>),

    /// The XML is not well formed
    #[error("malformed XML at byte {position}: {message}")]
    Syntax {
        /// Byte offset reported by the reader
        position: usize,
        /// Reader diagnostic
        message: String,
    },

    /// A device ID is not a decimal integer (strict numeric policy only)
    #[error("invalid device id {value:?} for {link}")]
    InvalidDeviceId {
        /// Link attribute name
        link: String,
        /// Raw attribute value
        value: String,
    },
}

/// Errors from validating a [`LoaderConfig`](crate::LoaderConfig).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The chunk size must allow at least one byte per read
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    /// The path limit leaves no room for a path
    #[error("max path length {0} is too small")]
    PathLimitTooSmall(usize),

    /// The default path itself exceeds the path limit
    #[error("default path is {len} bytes, at most {limit} are supported")]
    DefaultPathTooLong {
        /// Length of the default path in bytes
        len: usize,
        /// Longest accepted path in bytes
        limit: usize,
    },
}

/// Convenience type alias for load results.
pub type Result<T> = std::result::Result<T, LoadError>;

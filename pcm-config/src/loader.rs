//! Mixer file loader.
//!
//! [`PcmConfigLoader`] resolves the mixer file path, streams the file through
//! a [`TagEvents`] reader in fixed-size chunks and applies every `pcmdai`
//! declaration to a [`DeviceTable`].
//!
//! The table is never rolled back. When a load fails halfway, every
//! declaration parsed before the fault stays applied.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use tracing::{debug, error};

use crate::config::{LoaderConfig, NumericPolicy, PathPolicy};
use crate::dispatch::apply_start_tag;
use crate::error::{ConfigError, ConfigurationFault, LoadError, Result};
use crate::events::{TagEvent, TagEvents};
use crate::source::ChunkedSource;
use crate::table::DeviceTable;

/// Loads PCM device IDs from mixer path XML.
#[derive(Debug, Clone, Default)]
pub struct PcmConfigLoader {
    config: LoaderConfig,
}

impl PcmConfigLoader {
    /// Create a loader after validating `config`.
    pub fn new(config: LoaderConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Resolve the file to open: `filename` if given, the configured default
    /// path otherwise.
    ///
    /// Paths longer than the path limit are rejected or cut to the limit on a
    /// character boundary, depending on [`PathPolicy`].
    pub fn resolve_path(&self, filename: Option<&str>) -> Result<PathBuf> {
        let Some(filename) = filename else {
            return Ok(self.config.path.clone());
        };

        let limit = self.config.path_limit();
        if filename.len() <= limit {
            return Ok(PathBuf::from(filename));
        }

        match self.config.path_policy {
            PathPolicy::Reject => Err(LoadError::PathTooLong {
                len: filename.len(),
                limit,
            }),
            PathPolicy::Truncate => {
                let mut end = limit;
                while !filename.is_char_boundary(end) {
                    end -= 1;
                }
                debug!(len = filename.len(), limit, "truncating mixer path");
                Ok(PathBuf::from(&filename[..end]))
            }
        }
    }

    /// Load the mixer file into `table`.
    ///
    /// A missing or unreadable file yields [`LoadError::DeviceNotConfigured`]
    /// and leaves `table` untouched.
    pub fn load(&self, table: &mut DeviceTable, filename: Option<&str>) -> Result<()> {
        let path = self.resolve_path(filename)?;
        debug!("mixer file name is {}", path.display());

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(source) => {
                debug!("failed to open {}, using defaults", path.display());
                return Err(LoadError::DeviceNotConfigured { path, source });
            }
        };

        self.load_source(table, file, &path.display().to_string())
    }

    /// Load mixer XML from an arbitrary byte source.
    ///
    /// `origin` names the source in errors and logs. `source` is dropped
    /// before this returns, on success and on every error.
    pub fn load_source<R: Read>(&self, table: &mut DeviceTable, source: R, origin: &str) -> Result<()> {
        let session = ParseSession::open(source, self.config.chunk_size).map_err(|e| {
            error!("failed to create XML parser for {origin}: {e}");
            e
        })?;

        session
            .run(table, self.config.numeric_policy)
            .map_err(|fault| {
                error!("XML parse failed for {origin}: {fault}");
                LoadError::InvalidConfiguration {
                    origin: origin.to_string(),
                    fault,
                }
            })
    }
}

/// State owned by a single load: the chunked reader over the file and the
/// XML event stream on top of it.
struct ParseSession<R> {
    events: TagEvents<ChunkedSource<R>>,
}

impl<R: Read> ParseSession<R> {
    fn open(source: R, chunk_size: usize) -> Result<Self> {
        let source = ChunkedSource::new(source, chunk_size)?;
        Ok(Self {
            events: TagEvents::new(source),
        })
    }

    /// Drive the event stream to the end, applying start tags to `table`.
    ///
    /// Consumes the session so the reader and file are released on return.
    fn run(mut self, table: &mut DeviceTable, policy: NumericPolicy) -> std::result::Result<(), ConfigurationFault> {
        for event in self.events.by_ref() {
            match event? {
                TagEvent::Start { name, attributes } => {
                    apply_start_tag(table, &name, &attributes, policy)?;
                }
                TagEvent::End { .. } => {}
            }
        }
        debug!(chunks = self.events.get_ref().chunks_read(), "mixer file parsed");
        Ok(())
    }
}

/// Load `filename`, or the default mixer file, into `table` using the default
/// loader configuration.
pub fn init_pcm_ids(table: &mut DeviceTable, filename: Option<&str>) -> Result<()> {
    PcmConfigLoader::default().load(table, filename)
}

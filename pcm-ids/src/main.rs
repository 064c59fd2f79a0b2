use anyhow::{Context, Result};
use clap::Parser;
use pcm_config::logging::{init_logging_with_level, LoggingMode};
use pcm_config::{DeviceTable, Direction, LoadError, LoaderConfig, NumericPolicy, PathPolicy, PcmConfigLoader, UseCase};
use tracing::{debug, warn};

pub mod output;

/// PCM device ID inspector
///
/// Loads a mixer paths file the way the audio HAL does and prints the PCM
/// device IDs each use case ends up with.
#[derive(Parser, Debug)]
#[command(name = "pcm-ids")]
#[command(about = "Show the PCM device IDs a mixer paths file resolves to")]
#[command(version)]
pub struct Args {
    /// Mixer paths file (defaults to /system/etc/mixer_paths_0.xml)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Reject device IDs that are not plain integers
    #[arg(long)]
    pub strict: bool,

    /// Truncate overlong paths instead of rejecting them
    #[arg(long)]
    pub truncate_path: bool,

    /// Bytes read from the file per chunk
    #[arg(long, default_value = "1024")]
    pub chunk_size: usize,

    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,

    /// Print only the device ID of this use case
    #[arg(short, long, requires = "direction")]
    pub usecase: Option<UseCase>,

    /// Direction for --usecase (playback or capture)
    #[arg(short, long, requires = "usecase")]
    pub direction: Option<Direction>,

    /// Log level (error, warn, info, debug, trace); overrides PCM_LOG_LEVEL and RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Validate command line arguments
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(anyhow::anyhow!("Chunk size must be positive"));
        }

        if let Some(level) = &self.log_level {
            match level.to_lowercase().as_str() {
                "error" | "warn" | "info" | "debug" | "trace" => {}
                _ => {
                    return Err(anyhow::anyhow!(
                        "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
                        level
                    ));
                }
            }
        }

        Ok(())
    }
}

/// What to print once the table is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// The whole table
    Table { json: bool },
    /// A single slot
    Slot { usecase: UseCase, direction: Direction },
}

/// Configuration derived from command line arguments and environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub file: Option<String>,
    pub loader: LoaderConfig,
    pub query: Query,
    /// Level given on the command line; the environment decides otherwise
    pub log_level: Option<String>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let loader = LoaderConfig::new()
            .with_chunk_size(args.chunk_size)
            .with_numeric_policy(if args.strict {
                NumericPolicy::Strict
            } else {
                NumericPolicy::Lenient
            })
            .with_path_policy(if args.truncate_path {
                PathPolicy::Truncate
            } else {
                PathPolicy::Reject
            });

        let query = match (args.usecase, args.direction) {
            (Some(usecase), Some(direction)) => Query::Slot { usecase, direction },
            _ => Query::Table { json: args.json },
        };

        Self {
            file: args.file,
            loader,
            query,
            log_level: args.log_level,
        }
    }
}

impl Config {
    /// Create configuration from command line arguments and environment variables
    pub fn from_env() -> Result<Self> {
        let args = apply_env_overrides(Args::parse())?;
        args.validate()?;
        Ok(Self::from(args))
    }
}

/// Override parsed arguments with `PCM_IDS_*` environment variables if present
fn apply_env_overrides(mut args: Args) -> Result<Args> {
    if let Ok(file) = std::env::var("PCM_IDS_FILE") {
        args.file = Some(file);
    }

    if let Ok(chunk_size) = std::env::var("PCM_IDS_CHUNK_SIZE") {
        args.chunk_size = chunk_size
            .parse()
            .context("Invalid PCM_IDS_CHUNK_SIZE environment variable")?;
    }

    if std::env::var("PCM_IDS_STRICT").is_ok() {
        args.strict = true;
    }

    Ok(args)
}

/// Load the table as configured.
///
/// A missing mixer file is reported and the defaults are used. Any other
/// load failure is returned after the partially loaded table has been
/// handed back through `table`.
pub fn load_table(config: &Config, table: &mut DeviceTable) -> Result<()> {
    let loader = PcmConfigLoader::new(config.loader.clone()).context("Invalid loader configuration")?;

    match loader.load(table, config.file.as_deref()) {
        Ok(()) => {
            debug!("Loaded PCM device IDs");
            Ok(())
        }
        Err(e @ LoadError::DeviceNotConfigured { .. }) => {
            warn!("{e}");
            Ok(())
        }
        Err(e) => {
            let errno = e.errno();
            Err(anyhow::Error::new(e).context(format!("Loading mixer file failed ({errno})")))
        }
    }
}

fn main() -> Result<()> {
    let config = Config::from_env()?;

    init_logging_with_level(LoggingMode::Development, config.log_level.as_deref())
        .context("Failed to initialize logging")?;

    let mut table = DeviceTable::new();
    let loaded = load_table(&config, &mut table);

    let stdout = std::io::stdout();
    output::render(&mut stdout.lock(), &table, config.query)?;

    loaded
}

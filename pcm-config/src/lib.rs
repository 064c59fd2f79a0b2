//! # pcm-config
//!
//! PCM device-ID table for Android audio HALs.
//!
//! Each audio use case (playback, capture, voice call, Bluetooth SCO, ...)
//! is bound to a PCM device in each direction. The table starts with the
//! defaults of the reference hardware and can be overridden by `pcmdai`
//! declarations in the mixer paths XML file:
//!
//! ```xml
//! <mixer>
//!   <pcmdai playback_link="0"/>
//!   <pcmdai baseband_link="1"/>
//!   <pcmdai bluetooth_link="2"/>
//!   <pcmdai bluetooth_capture_link="3"/>
//! </mixer>
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use pcm_config::{init_pcm_ids, get_pcm_device_id, Direction, DeviceTable, UseCase};
//!
//! let mut table = DeviceTable::new();
//! if let Err(e) = init_pcm_ids(&mut table, None) {
//!     // Defaults, plus anything parsed before the error, stay in place.
//!     eprintln!("{e}");
//! }
//! let device = get_pcm_device_id(&table, UseCase::VoiceCall, Direction::Capture);
//! ```
//!
//! ## Threading
//!
//! Loading is synchronous and blocking. [`DeviceTable`] has no interior
//! synchronization; wrap a shared instance in a `Mutex` or `RwLock` and do
//! not run loads into the same table concurrently.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod loader;
pub mod logging;
pub mod table;
pub mod usecase;

mod source;

pub use config::{LoaderConfig, NumericPolicy, PathPolicy, MIXER_PATH_DEFAULT, MIXER_PATH_MAX_LENGTH};
pub use error::{ConfigError, ConfigurationFault, LoadError, Result};
pub use events::{TagEvent, TagEvents};
pub use loader::{init_pcm_ids, PcmConfigLoader};
pub use table::{DeviceEntry, DeviceTable, NO_DEVICE};
pub use usecase::{Direction, UnknownName, UseCase};

/// Device ID configured for `usecase` in `direction`, or [`NO_DEVICE`].
pub fn get_pcm_device_id(table: &DeviceTable, usecase: UseCase, direction: Direction) -> i32 {
    table.get_device_id(usecase, direction)
}

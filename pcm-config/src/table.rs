//! The PCM device-ID table.
//!
//! A [`DeviceTable`] maps every `(UseCase, Direction)` pair to a PCM device
//! ID. It starts out with the known-good defaults of the reference hardware
//! and is overwritten slot by slot while a mixer file is parsed.
//!
//! The table is plain owned data. Sharing one instance between threads needs
//! external synchronization, for example a `Mutex<DeviceTable>`.

use serde::{Serialize, Serializer};

use crate::usecase::{Direction, UseCase};

/// Sentinel for "no PCM device backs this use case".
pub const NO_DEVICE: i32 = -1;

/// Default primary playback device
pub const SOUND_PLAYBACK_DEVICE: i32 = 0;
/// Default primary capture device
pub const SOUND_CAPTURE_DEVICE: i32 = 0;
/// Default Bluetooth SCO device
pub const SOUND_PLAYBACK_SCO_DEVICE: i32 = 2;
/// Default voice call playback device
pub const SOUND_PLAYBACK_VOICE_DEVICE: i32 = 1;
/// Default voice call capture device
pub const SOUND_CAPTURE_VOICE_DEVICE: i32 = 1;
/// Default deep-buffer playback device
pub const SOUND_DEEP_BUFFER_DEVICE: i32 = 3;

const DEFAULT_IDS: [[i32; 2]; UseCase::COUNT] = [
    // Playback
    [SOUND_PLAYBACK_DEVICE, SOUND_PLAYBACK_DEVICE],
    // PlaybackMultiChannel
    [NO_DEVICE, NO_DEVICE],
    // PlaybackOffload
    [NO_DEVICE, NO_DEVICE],
    // PlaybackDeepBuffer
    [SOUND_DEEP_BUFFER_DEVICE, SOUND_DEEP_BUFFER_DEVICE],
    // Capture
    [SOUND_CAPTURE_DEVICE, SOUND_CAPTURE_DEVICE],
    // BtSco
    [SOUND_PLAYBACK_SCO_DEVICE, SOUND_PLAYBACK_SCO_DEVICE],
    // FmRadio
    [NO_DEVICE, NO_DEVICE],
    // VoiceCall
    [SOUND_PLAYBACK_VOICE_DEVICE, SOUND_CAPTURE_VOICE_DEVICE],
];

/// Mapping from use case and direction to PCM device ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTable {
    ids: [[i32; 2]; UseCase::COUNT],
}

/// One row of a [`DeviceTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceEntry {
    pub usecase: UseCase,
    pub playback: i32,
    pub capture: i32,
}

impl DeviceTable {
    /// Create a table holding the compiled-in defaults.
    pub fn new() -> Self {
        Self { ids: DEFAULT_IDS }
    }

    /// Device ID configured for `usecase` in `direction`, or [`NO_DEVICE`].
    pub fn get_device_id(&self, usecase: UseCase, direction: Direction) -> i32 {
        self.ids[usecase.index()][direction.index()]
    }

    pub(crate) fn set_device_id(&mut self, usecase: UseCase, direction: Direction, id: i32) {
        self.ids[usecase.index()][direction.index()] = id;
    }

    pub(crate) fn set_both(&mut self, usecase: UseCase, id: i32) {
        self.ids[usecase.index()] = [id, id];
    }

    /// The row for `usecase`.
    pub fn entry(&self, usecase: UseCase) -> DeviceEntry {
        let [playback, capture] = self.ids[usecase.index()];
        DeviceEntry {
            usecase,
            playback,
            capture,
        }
    }

    /// Rows in table order.
    pub fn iter(&self) -> impl Iterator<Item = DeviceEntry> + '_ {
        UseCase::ALL.into_iter().map(move |usecase| self.entry(usecase))
    }

    /// True if no slot differs from the compiled-in defaults.
    pub fn is_default(&self) -> bool {
        self.ids == DEFAULT_IDS
    }

    /// Restore the compiled-in defaults.
    pub fn reset(&mut self) {
        self.ids = DEFAULT_IDS;
    }
}

impl Default for DeviceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for DeviceTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

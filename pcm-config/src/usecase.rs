//! Audio use cases, data-flow directions and their PCM DAI link names.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// An audio operating mode that needs its own PCM device binding.
///
/// The set is closed. Declaration order is the table order used when
/// matching link names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCase {
    /// Primary low-latency playback
    Playback,
    /// Multichannel playback, not backed by a PCM DAI link
    PlaybackMultiChannel,
    /// Compressed offload playback
    PlaybackOffload,
    /// Deep-buffer playback
    PlaybackDeepBuffer,
    /// Primary capture
    Capture,
    /// Bluetooth SCO
    BtSco,
    /// FM radio
    FmRadio,
    /// Voice call over the baseband link
    VoiceCall,
}

impl UseCase {
    /// Number of use cases.
    pub const COUNT: usize = 8;

    /// Every use case in table order.
    pub const ALL: [UseCase; UseCase::COUNT] = [
        UseCase::Playback,
        UseCase::PlaybackMultiChannel,
        UseCase::PlaybackOffload,
        UseCase::PlaybackDeepBuffer,
        UseCase::Capture,
        UseCase::BtSco,
        UseCase::FmRadio,
        UseCase::VoiceCall,
    ];

    /// Slot index into the device table.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical name, as used on the command line and in JSON output.
    pub const fn as_str(self) -> &'static str {
        match self {
            UseCase::Playback => "playback",
            UseCase::PlaybackMultiChannel => "playback_multi_channel",
            UseCase::PlaybackOffload => "playback_offload",
            UseCase::PlaybackDeepBuffer => "playback_deep_buffer",
            UseCase::Capture => "capture",
            UseCase::BtSco => "bt_sco",
            UseCase::FmRadio => "fm_radio",
            UseCase::VoiceCall => "voice_call",
        }
    }

    /// The `pcmdai` attribute name that sets both directions of this use case.
    pub const fn link_name(self) -> Option<&'static str> {
        match self {
            UseCase::Playback => Some("playback_link"),
            UseCase::PlaybackMultiChannel => None,
            UseCase::PlaybackOffload => Some("playback_offload_link"),
            UseCase::PlaybackDeepBuffer => Some("playback_deep_link"),
            UseCase::Capture => Some("capture_link"),
            UseCase::BtSco => Some("bluetooth_link"),
            UseCase::FmRadio => Some("fmradio_link"),
            UseCase::VoiceCall => Some("baseband_link"),
        }
    }

    /// First use case in table order whose link name equals `link`.
    pub fn from_link_name(link: &str) -> Option<UseCase> {
        UseCase::ALL
            .into_iter()
            .find(|usecase| usecase.link_name() == Some(link))
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A use case or direction name that is not recognized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {name}")]
pub struct UnknownName {
    /// What was being parsed
    pub kind: &'static str,
    /// The rejected input
    pub name: String,
}

impl FromStr for UseCase {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UseCase::ALL
            .into_iter()
            .find(|usecase| usecase.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownName {
                kind: "use case",
                name: s.to_string(),
            })
    }
}

/// Data-flow direction of a PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Output
    Playback,
    /// Input
    Capture,
}

impl Direction {
    /// Column index into the device table.
    pub const fn index(self) -> usize {
        match self {
            Direction::Playback => 0,
            Direction::Capture => 1,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Playback => "playback",
            Direction::Capture => "capture",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "playback" | "out" => Ok(Direction::Playback),
            "capture" | "in" => Ok(Direction::Capture),
            _ => Err(UnknownName {
                kind: "direction",
                name: s.to_string(),
            }),
        }
    }
}

/// Link names that refine only the capture slot of one use case.
///
/// These usually carry the same ID as the matching playback link.
pub const CAPTURE_OVERRIDES: [(&str, UseCase); 2] = [
    ("baseband_capture_link", UseCase::VoiceCall),
    ("bluetooth_capture_link", UseCase::BtSco),
];

/// Use case whose capture slot `link` overrides, if any.
pub fn capture_override(link: &str) -> Option<UseCase> {
    CAPTURE_OVERRIDES
        .iter()
        .find(|(name, _)| *name == link)
        .map(|(_, usecase)| *usecase)
}

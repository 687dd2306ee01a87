//! Device snapshots
//!
//! A [`Device`] is what the audio server reported about one sink or source at
//! the moment it was queried. It is never updated in place: after a mutation
//! the device is looked up again.

use crate::volume::{NormalizedVolume, normalized_to_percent};
use std::fmt;

/// Whether a device plays audio (sink) or records it (source)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Sink,
    Source,
}

impl DeviceKind {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceKind::Sink => "sink",
            DeviceKind::Source => "source",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Point-in-time state of a sink or source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub kind: DeviceKind,
    /// Server-assigned index, stable for the lifetime of the device
    pub index: u32,
    /// Server identifier, e.g. `alsa_output.pci-0000_00_1f.3.analog-stereo`
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Mean volume across channels
    pub volume_avg: NormalizedVolume,
    /// `volume_avg` as a rounded percentage, above 100 when boosted
    pub volume_percent: u32,
    pub mute: bool,
}

impl Device {
    pub fn new(
        kind: DeviceKind,
        index: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        volume_avg: NormalizedVolume,
        mute: bool,
    ) -> Self {
        Self {
            kind,
            index,
            name: name.into(),
            description: description.into(),
            volume_avg,
            volume_percent: normalized_to_percent(volume_avg),
            mute,
        }
    }

    /// Build a snapshot from per-channel volumes, averaging them the way the
    /// server does (integer mean, empty map counts as silence).
    pub fn from_channels(
        kind: DeviceKind,
        index: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        channels: &[NormalizedVolume],
        mute: bool,
    ) -> Self {
        Self::new(kind, index, name, description, average_volume(channels), mute)
    }

    /// Line used by `--list-sinks` / `--list-sources`
    pub fn list_line(&self) -> String {
        format!("{} \"{}\" \"{}\"", self.index, self.name, self.description)
    }
}

/// Integer mean of channel volumes
pub fn average_volume(channels: &[NormalizedVolume]) -> NormalizedVolume {
    if channels.is_empty() {
        return 0;
    }
    let sum: u64 = channels.iter().map(|&v| u64::from(v)).sum();
    (sum / channels.len() as u64) as NormalizedVolume
}

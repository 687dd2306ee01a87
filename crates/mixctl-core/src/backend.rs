//! Audio server capability interface
//!
//! Every call is a synchronous round-trip. Implementations must not cache
//! device state between calls: the planner relies on a lookup after a
//! mutation returning what the server now holds.

use crate::Result;
use crate::device::{Device, DeviceKind};
use crate::volume::NormalizedVolume;

pub trait AudioBackend {
    /// Current default output device
    fn default_sink(&self) -> Result<Device>;

    /// Current default input device
    fn default_source(&self) -> Result<Device>;

    /// Sink with the given server name, `DeviceNotFound` if absent
    fn sink_by_name(&self, name: &str) -> Result<Device>;

    /// Source with the given server name, `DeviceNotFound` if absent
    fn source_by_name(&self, name: &str) -> Result<Device>;

    /// All sinks in server enumeration order
    fn list_sinks(&self) -> Result<Vec<Device>>;

    /// All sources in server enumeration order
    fn list_sources(&self) -> Result<Vec<Device>>;

    /// Set every channel of `device` to `volume`
    fn set_volume(&self, device: &Device, volume: NormalizedVolume) -> Result<()>;

    fn set_mute(&self, device: &Device, mute: bool) -> Result<()>;

    /// Enumerate devices of either kind
    fn list(&self, kind: DeviceKind) -> Result<Vec<Device>> {
        match kind {
            DeviceKind::Sink => self.list_sinks(),
            DeviceKind::Source => self.list_sources(),
        }
    }
}

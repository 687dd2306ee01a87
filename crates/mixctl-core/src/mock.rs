//! In-memory audio backend
//!
//! Lets the planner run without an audio server, both in tests and when the
//! binary is started with the `mock` backend driver. Every call is recorded so
//! tests can check exactly what reached the "server".
//!
//! # Usage
//!
//! ```
//! use mixctl_core::mock::{MockBackend, MockCall};
//! use mixctl_core::AudioBackend;
//!
//! let backend = MockBackend::demo();
//! let sink = backend.default_sink().unwrap();
//! backend.set_mute(&sink, true).unwrap();
//!
//! assert!(backend.default_sink().unwrap().mute);
//! assert_eq!(backend.calls()[0], MockCall::DefaultSink);
//! ```

use crate::Result;
use crate::backend::AudioBackend;
use crate::device::{Device, DeviceKind};
use crate::error::MixerError;
use crate::volume::{NormalizedVolume, VOLUME_NORM};
use std::sync::{Arc, RwLock};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    DefaultSink,
    DefaultSource,
    SinkByName(String),
    SourceByName(String),
    ListSinks,
    ListSources,
    SetVolume {
        kind: DeviceKind,
        index: u32,
        volume: NormalizedVolume,
    },
    SetMute {
        kind: DeviceKind,
        index: u32,
        mute: bool,
    },
}

impl MockCall {
    pub fn is_mutation(&self) -> bool {
        matches!(self, MockCall::SetVolume { .. } | MockCall::SetMute { .. })
    }
}

/// Server-side state shared by clones of a [`MockBackend`]
#[derive(Debug, Default)]
pub struct MockState {
    pub sinks: Vec<Device>,
    pub sources: Vec<Device>,
    /// Name of the default sink
    pub default_sink: Option<String>,
    /// Name of the default source
    pub default_source: Option<String>,
    pub calls: Vec<MockCall>,
}

impl MockState {
    fn devices(&self, kind: DeviceKind) -> &[Device] {
        match kind {
            DeviceKind::Sink => &self.sinks,
            DeviceKind::Source => &self.sources,
        }
    }

    fn devices_mut(&mut self, kind: DeviceKind) -> &mut Vec<Device> {
        match kind {
            DeviceKind::Sink => &mut self.sinks,
            DeviceKind::Source => &mut self.sources,
        }
    }

    fn find(&self, kind: DeviceKind, name: &str) -> Result<Device> {
        self.devices(kind)
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| MixerError::DeviceNotFound {
                kind,
                name: name.to_string(),
            })
    }

    fn find_default(&self, kind: DeviceKind) -> Result<Device> {
        let default = match kind {
            DeviceKind::Sink => &self.default_sink,
            DeviceKind::Source => &self.default_source,
        };
        match default {
            Some(name) => self.find(kind, name),
            None => Err(MixerError::DeviceNotFound {
                kind,
                name: format!("@DEFAULT_{}@", kind.name().to_uppercase()),
            }),
        }
    }

    /// Replace a device in place, keeping enumeration order
    fn update(&mut self, target: &Device, f: impl FnOnce(&Device) -> Device) -> Result<()> {
        let slot = self
            .devices_mut(target.kind)
            .iter_mut()
            .find(|d| d.index == target.index)
            .ok_or_else(|| MixerError::DeviceNotFound {
                kind: target.kind,
                name: target.name.clone(),
            })?;
        *slot = f(slot);
        Ok(())
    }
}

/// Mock audio server
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<RwLock<MockState>>,
}

impl MockBackend {
    /// Empty server: no devices, no defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// A laptop-like setup: built-in speakers plus a headset, and a microphone
    pub fn demo() -> Self {
        Self::new()
            .with_sink(Device::new(
                DeviceKind::Sink,
                0,
                "alsa_output.pci-0000_00_1f.3.analog-stereo",
                "Built-in Audio Analog Stereo",
                VOLUME_NORM / 2,
                false,
            ))
            .with_sink(Device::new(
                DeviceKind::Sink,
                1,
                "bluez_sink.headset",
                "Headset",
                VOLUME_NORM * 3 / 4,
                false,
            ))
            .with_source(Device::new(
                DeviceKind::Source,
                2,
                "alsa_input.pci-0000_00_1f.3.analog-stereo",
                "Built-in Audio Analog Stereo",
                VOLUME_NORM,
                true,
            ))
    }

    /// Add a sink; the first one added becomes the default
    pub fn with_sink(self, device: Device) -> Self {
        self.insert(DeviceKind::Sink, device);
        self
    }

    /// Add a source; the first one added becomes the default
    pub fn with_source(self, device: Device) -> Self {
        self.insert(DeviceKind::Source, device);
        self
    }

    fn insert(&self, kind: DeviceKind, device: Device) {
        if let Ok(mut state) = self.state.write() {
            let default = match kind {
                DeviceKind::Sink => &mut state.default_sink,
                DeviceKind::Source => &mut state.default_source,
            };
            if default.is_none() {
                *default = Some(device.name.clone());
            }
            state.devices_mut(kind).push(Device { kind, ..device });
        }
    }

    /// Change which device is the default
    pub fn set_default(&self, kind: DeviceKind, name: &str) {
        if let Ok(mut state) = self.state.write() {
            match kind {
                DeviceKind::Sink => state.default_sink = Some(name.to_string()),
                DeviceKind::Source => state.default_source = Some(name.to_string()),
            }
        }
    }

    /// Get shared state for manipulation in tests
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        Arc::clone(&self.state)
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<MockCall> {
        self.state
            .read()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    pub fn mutations(&self) -> Vec<MockCall> {
        self.calls().into_iter().filter(MockCall::is_mutation).collect()
    }

    /// Run `f` against the state after recording `call`
    fn with_state<T>(
        &self,
        call: MockCall,
        f: impl FnOnce(&mut MockState) -> Result<T>,
    ) -> Result<T> {
        let mut state = self
            .state
            .write()
            .map_err(|e| MixerError::CommandFailed(format!("mock state poisoned: {e}")))?;
        tracing::debug!("[MOCK] {:?}", call);
        state.calls.push(call);
        f(&mut state)
    }
}

impl AudioBackend for MockBackend {
    fn default_sink(&self) -> Result<Device> {
        self.with_state(MockCall::DefaultSink, |s| s.find_default(DeviceKind::Sink))
    }

    fn default_source(&self) -> Result<Device> {
        self.with_state(MockCall::DefaultSource, |s| s.find_default(DeviceKind::Source))
    }

    fn sink_by_name(&self, name: &str) -> Result<Device> {
        self.with_state(MockCall::SinkByName(name.to_string()), |s| {
            s.find(DeviceKind::Sink, name)
        })
    }

    fn source_by_name(&self, name: &str) -> Result<Device> {
        self.with_state(MockCall::SourceByName(name.to_string()), |s| {
            s.find(DeviceKind::Source, name)
        })
    }

    fn list_sinks(&self) -> Result<Vec<Device>> {
        self.with_state(MockCall::ListSinks, |s| Ok(s.sinks.clone()))
    }

    fn list_sources(&self) -> Result<Vec<Device>> {
        self.with_state(MockCall::ListSources, |s| Ok(s.sources.clone()))
    }

    fn set_volume(&self, device: &Device, volume: NormalizedVolume) -> Result<()> {
        let call = MockCall::SetVolume {
            kind: device.kind,
            index: device.index,
            volume,
        };
        self.with_state(call, |s| {
            s.update(device, |d| {
                Device::new(d.kind, d.index, &d.name, &d.description, volume, d.mute)
            })
        })
    }

    fn set_mute(&self, device: &Device, mute: bool) -> Result<()> {
        let call = MockCall::SetMute {
            kind: device.kind,
            index: device.index,
            mute,
        };
        self.with_state(call, |s| s.update(device, |d| Device { mute, ..d.clone() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_defaults() {
        let backend = MockBackend::demo();
        let sink = backend.default_sink().unwrap();
        assert_eq!(sink.index, 0);
        assert_eq!(sink.volume_percent, 50);

        let source = backend.default_source().unwrap();
        assert_eq!(source.kind, DeviceKind::Source);
        assert!(source.mute);
    }

    #[test]
    fn test_lookup_by_name() {
        let backend = MockBackend::demo();
        let headset = backend.sink_by_name("bluez_sink.headset").unwrap();
        assert_eq!(headset.index, 1);

        match backend.source_by_name("bluez_sink.headset") {
            Err(MixerError::DeviceNotFound { kind, name }) => {
                assert_eq!(kind, DeviceKind::Source);
                assert_eq!(name, "bluez_sink.headset");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_no_default_when_empty() {
        let backend = MockBackend::new();
        assert!(matches!(
            backend.default_sink(),
            Err(MixerError::DeviceNotFound { .. })
        ));
        assert!(backend.list_sinks().unwrap().is_empty());
    }

    #[test]
    fn test_mutations_are_visible_on_next_query() {
        let backend = MockBackend::demo();
        let sink = backend.default_sink().unwrap();

        backend.set_volume(&sink, VOLUME_NORM).unwrap();
        backend.set_mute(&sink, true).unwrap();

        // The snapshot taken before is untouched
        assert_eq!(sink.volume_percent, 50);
        assert!(!sink.mute);

        let fresh = backend.default_sink().unwrap();
        assert_eq!(fresh.volume_percent, 100);
        assert!(fresh.mute);
        assert_eq!(backend.mutations().len(), 2);
    }

    #[test]
    fn test_set_default() {
        let backend = MockBackend::demo();
        backend.set_default(DeviceKind::Sink, "bluez_sink.headset");
        assert_eq!(backend.default_sink().unwrap().index, 1);
    }

    #[test]
    fn test_clones_share_state() {
        let backend = MockBackend::demo();
        let other = backend.clone();
        let sink = other.default_sink().unwrap();
        other.set_mute(&sink, true).unwrap();
        assert!(backend.default_sink().unwrap().mute);
        assert_eq!(backend.calls().len(), 3);
    }
}

//! Target device resolution

use crate::Result;
use crate::backend::AudioBackend;
use crate::device::Device;
use crate::options::OptionSet;

/// Which device an invocation operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceTarget {
    NamedSink(String),
    DefaultSource,
    NamedSource(String),
    DefaultSink,
}

impl DeviceTarget {
    /// Pick the target from the options, first match wins:
    /// `--sink`, `--default-source`, `--source`, then the default sink.
    pub fn from_options(options: &OptionSet) -> Self {
        if let Some(name) = &options.sink {
            DeviceTarget::NamedSink(name.clone())
        } else if options.default_source {
            DeviceTarget::DefaultSource
        } else if let Some(name) = &options.source {
            DeviceTarget::NamedSource(name.clone())
        } else {
            DeviceTarget::DefaultSink
        }
    }

    /// Ask the backend for the current state of the target.
    ///
    /// Always a fresh round-trip; call again after a mutation.
    pub fn resolve<B: AudioBackend + ?Sized>(&self, backend: &B) -> Result<Device> {
        let device = match self {
            DeviceTarget::NamedSink(name) => backend.sink_by_name(name)?,
            DeviceTarget::DefaultSource => backend.default_source()?,
            DeviceTarget::NamedSource(name) => backend.source_by_name(name)?,
            DeviceTarget::DefaultSink => backend.default_sink()?,
        };
        tracing::debug!(
            "Resolved {:?} to {} #{} ({}%, muted: {})",
            self,
            device.kind,
            device.index,
            device.volume_percent,
            device.mute
        );
        Ok(device)
    }
}

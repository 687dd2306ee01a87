//! PulseAudio / PipeWire backend driven through `pactl`
//!
//! Each trait call spawns one `pactl` process, so every lookup is a real
//! round-trip to the server. Enumeration uses the JSON output of
//! `pactl --format=json list sinks|sources` (pactl 16 or newer).

use crate::Result;
use crate::backend::AudioBackend;
use crate::device::{Device, DeviceKind};
use crate::error::MixerError;
use crate::volume::{NormalizedVolume, VOLUME_MAX};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;

/// How to reach the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PactlConfig {
    /// Program name or path, resolved through `PATH`
    pub program: String,
    /// Reported to the server as the client name
    pub client_name: String,
    /// Server address, the default server when `None`
    pub server: Option<String>,
}

impl Default for PactlConfig {
    fn default() -> Self {
        Self {
            program: "pactl".to_string(),
            client_name: "mixctl".to_string(),
            server: None,
        }
    }
}

/// Device entry as printed by `pactl --format=json list`
#[derive(Debug, Deserialize)]
struct PactlDevice {
    index: u32,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    mute: bool,
    /// Channel position -> volume
    #[serde(default)]
    volume: BTreeMap<String, PactlChannelVolume>,
}

#[derive(Debug, Deserialize)]
struct PactlChannelVolume {
    value: NormalizedVolume,
}

/// Parse the JSON array printed by `pactl --format=json list sinks|sources`
pub fn parse_devices(kind: DeviceKind, json: &str) -> Result<Vec<Device>> {
    let raw: Vec<PactlDevice> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|d| {
            let channels: Vec<NormalizedVolume> = d.volume.values().map(|c| c.value).collect();
            Device::from_channels(kind, d.index, d.name, d.description, &channels, d.mute)
        })
        .collect())
}

/// Backend talking to the audio server through the `pactl` tool
#[derive(Debug, Clone)]
pub struct PactlBackend {
    program: PathBuf,
    client_name: String,
    server: Option<String>,
}

impl PactlBackend {
    /// Connect to the default server, identifying as `client_name`
    pub fn connect(client_name: &str) -> Result<Self> {
        Self::connect_with(PactlConfig {
            client_name: client_name.to_string(),
            ..PactlConfig::default()
        })
    }

    /// Locate `pactl` and check the server answers
    pub fn connect_with(config: PactlConfig) -> Result<Self> {
        let program = which::which(&config.program).map_err(|e| {
            MixerError::ConnectionFailed(format!("cannot find {}: {}", config.program, e))
        })?;
        tracing::debug!("Using {}", program.display());

        let backend = Self {
            program,
            client_name: config.client_name,
            server: config.server,
        };

        backend
            .pactl(&["info"])
            .map_err(|e| MixerError::ConnectionFailed(e.to_string()))?;
        tracing::debug!("Connected as {}", backend.client_name);

        Ok(backend)
    }

    /// Options passed before every subcommand
    fn global_args(&self) -> Vec<String> {
        let mut args = vec![format!("--client-name={}", self.client_name)];
        if let Some(server) = &self.server {
            args.push(format!("--server={}", server));
        }
        args
    }

    /// Run pactl with `args`, returning stdout
    fn pactl(&self, args: &[&str]) -> Result<String> {
        tracing::trace!("pactl {}", args.join(" "));
        let output = Command::new(&self.program)
            .args(self.global_args())
            .args(args)
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(MixerError::CommandFailed(format!(
                "pactl {}: {}",
                args.join(" "),
                stderr.trim()
            )))
        }
    }

    fn fetch(&self, kind: DeviceKind) -> Result<Vec<Device>> {
        let list = match kind {
            DeviceKind::Sink => "sinks",
            DeviceKind::Source => "sources",
        };
        let json = self.pactl(&["--format=json", "list", list])?;
        parse_devices(kind, &json)
    }

    fn find(&self, kind: DeviceKind, name: &str) -> Result<Device> {
        self.fetch(kind)?
            .into_iter()
            .find(|d| d.name == name)
            .ok_or_else(|| MixerError::DeviceNotFound {
                kind,
                name: name.to_string(),
            })
    }

    fn find_default(&self, kind: DeviceKind) -> Result<Device> {
        let command = match kind {
            DeviceKind::Sink => "get-default-sink",
            DeviceKind::Source => "get-default-source",
        };
        let name = self.pactl(&[command])?;
        let name = name.trim();
        if name.is_empty() {
            return Err(MixerError::InvalidResponse(format!(
                "{} returned no device name",
                command
            )));
        }
        self.find(kind, name)
    }
}

impl AudioBackend for PactlBackend {
    fn default_sink(&self) -> Result<Device> {
        self.find_default(DeviceKind::Sink)
    }

    fn default_source(&self) -> Result<Device> {
        self.find_default(DeviceKind::Source)
    }

    fn sink_by_name(&self, name: &str) -> Result<Device> {
        self.find(DeviceKind::Sink, name)
    }

    fn source_by_name(&self, name: &str) -> Result<Device> {
        self.find(DeviceKind::Source, name)
    }

    fn list_sinks(&self) -> Result<Vec<Device>> {
        self.fetch(DeviceKind::Sink)
    }

    fn list_sources(&self) -> Result<Vec<Device>> {
        self.fetch(DeviceKind::Source)
    }

    fn set_volume(&self, device: &Device, volume: NormalizedVolume) -> Result<()> {
        let command = match device.kind {
            DeviceKind::Sink => "set-sink-volume",
            DeviceKind::Source => "set-source-volume",
        };
        let volume = volume.min(VOLUME_MAX);
        // A bare integer is taken as a raw volume and applied to every channel
        self.pactl(&[command, &device.index.to_string(), &volume.to_string()])?;
        tracing::debug!("Volume of {} #{} set to {}", device.kind, device.index, volume);
        Ok(())
    }

    fn set_mute(&self, device: &Device, mute: bool) -> Result<()> {
        let command = match device.kind {
            DeviceKind::Sink => "set-sink-mute",
            DeviceKind::Source => "set-source-mute",
        };
        let flag = if mute { "1" } else { "0" };
        self.pactl(&[command, &device.index.to_string(), flag])?;
        tracing::debug!("Mute of {} #{} set to {}", device.kind, device.index, mute);
        Ok(())
    }
}

//! Configuration management for mixctl
//!
//! An optional TOML file supplies the gamma used when `--gamma` is not given,
//! and tells mixctl how to reach the audio server. Boost is never a default;
//! it always takes `--allow-boost`.
//!
//! ```toml
//! [mixer]
//! gamma = 2.2
//!
//! [backend]
//! driver = "pactl"
//! client_name = "mixctl"
//! pactl_path = "pactl"
//! server = "unix:/run/user/1000/pulse/native"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "MIXCTL_CONFIG";

/// System-wide configuration directory
pub const SYSTEM_CONFIG_DIR: &str = "/etc/mixctl";

const CONFIG_FILE: &str = "config.toml";

/// Defaults for volume options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixerConfig {
    /// Gamma used by --increase / --decrease when --gamma is absent
    #[serde(default = "default_gamma")]
    pub gamma: f64,
}

fn default_gamma() -> f64 {
    1.0
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self { gamma: default_gamma() }
    }
}

/// Which backend implementation to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendDriver {
    /// Talk to PulseAudio / PipeWire through pactl
    #[default]
    Pactl,
    /// In-memory demo devices, nothing leaves the process
    Mock,
}

/// How to reach the audio server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub driver: BackendDriver,

    #[serde(default = "default_client_name")]
    pub client_name: String,

    #[serde(default = "default_pactl_path")]
    pub pactl_path: String,

    /// Server address; the default server when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

fn default_client_name() -> String {
    "mixctl".to_string()
}

fn default_pactl_path() -> String {
    "pactl".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            driver: BackendDriver::default(),
            client_name: default_client_name(),
            pactl_path: default_pactl_path(),
            server: None,
        }
    }
}

/// Main mixctl configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MixctlConfig {
    #[serde(default)]
    pub mixer: MixerConfig,

    #[serde(default)]
    pub backend: BackendConfig,
}

impl MixctlConfig {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from the first location that exists:
    /// `$MIXCTL_CONFIG`, the user config directory, then `/etc/mixctl`.
    ///
    /// A path given through `$MIXCTL_CONFIG` must exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        for path in Self::search_paths() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Candidate files, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("mixctl").join(CONFIG_FILE));
        }
        paths.push(Path::new(SYSTEM_CONFIG_DIR).join(CONFIG_FILE));
        paths
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mixer.gamma.is_finite() && self.mixer.gamma > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "mixer.gamma must be greater than 0, got {}",
                self.mixer.gamma
            )));
        }
        if self.backend.client_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "backend.client_name must not be empty".to_string(),
            ));
        }
        if self.backend.pactl_path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "backend.pactl_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = MixctlConfig::default();
        assert_eq!(config.mixer.gamma, 1.0);
        assert_eq!(config.backend.driver, BackendDriver::Pactl);
        assert_eq!(config.backend.client_name, "mixctl");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
[mixer]
gamma = 2.2

[backend]
driver = "mock"
server = "tcp:localhost"
"#;
        write!(temp_file, "{}", config_content).unwrap();

        let config = MixctlConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.mixer.gamma, 2.2);
        assert_eq!(config.backend.driver, BackendDriver::Mock);
        assert_eq!(config.backend.server.as_deref(), Some("tcp:localhost"));
        // Unset keys keep their defaults
        assert_eq!(config.backend.pactl_path, "pactl");
    }

    #[test]
    fn test_empty_file_is_default() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = MixctlConfig::load(temp_file.path()).unwrap();
        assert_eq!(config, MixctlConfig::default());
    }

    #[test]
    fn test_invalid_gamma_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[mixer]\ngamma = 0.0\n").unwrap();

        assert!(matches!(
            MixctlConfig::load(temp_file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_boost_cannot_be_configured() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[mixer]\nallow_boost = true\n").unwrap();

        assert!(matches!(
            MixctlConfig::load(temp_file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_unknown_driver_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[backend]\ndriver = \"alsa\"\n").unwrap();

        assert!(matches!(
            MixctlConfig::load(temp_file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = MixctlConfig::load(Path::new("/nonexistent/mixctl/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_search_paths_end_with_system_dir() {
        let paths = MixctlConfig::search_paths();
        assert_eq!(
            paths.last().unwrap(),
            &Path::new(SYSTEM_CONFIG_DIR).join("config.toml")
        );
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = MixctlConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: MixctlConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}

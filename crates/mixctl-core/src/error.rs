use crate::device::DeviceKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MixerError {
    #[error("Conflicting options '{first}' and '{second}'.")]
    ConflictingOptions {
        first: &'static str,
        second: &'static str,
    },

    #[error("No such {kind}: {name}")]
    DeviceNotFound { kind: DeviceKind, name: String },

    #[error("Failed to connect to the audio server: {0}")]
    ConnectionFailed(String),

    #[error("Audio server command failed: {0}")]
    CommandFailed(String),

    #[error("Unexpected response from the audio server: {0}")]
    InvalidResponse(String),

    #[error("Invalid gamma {0}, expected a finite value greater than 0")]
    InvalidGamma(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

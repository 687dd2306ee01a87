//! Mixer control core
//!
//! Everything `mixctl` needs to turn a set of command-line options into
//! volume and mute changes on an audio server, independent of how the
//! options were parsed or how the server is reached.
//!
//! # Layout
//!
//! - [`volume`] - conversions between percent and normalized volume, gamma stepping
//! - [`device`] - point-in-time device snapshots
//! - [`backend`] - the [`AudioBackend`] capability trait
//! - [`pactl`] - backend talking to PulseAudio / PipeWire through `pactl`
//! - [`mock`] - in-memory backend for tests and dry runs
//! - [`selector`] - which device an invocation targets
//! - [`planner`] - option validation, the execution plan and exit codes
//!
//! # Example
//!
//! ```no_run
//! use mixctl_core::{OptionSet, Outcome, PactlBackend, Plan};
//!
//! fn main() -> mixctl_core::Result<()> {
//!     let options = OptionSet {
//!         increase: Some(5),
//!         gamma: Some(2.2),
//!         ..Default::default()
//!     };
//!
//!     if let Outcome::Execute(plan) = Plan::from_options(&options)? {
//!         let backend = PactlBackend::connect("mixctl")?;
//!         let status = plan.execute(&backend, &mut std::io::stdout())?;
//!         std::process::exit(status.code());
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod device;
pub mod error;
pub mod mock;
pub mod options;
pub mod pactl;
pub mod planner;
pub mod selector;
pub mod volume;

pub use backend::AudioBackend;
pub use device::{Device, DeviceKind};
pub use error::MixerError;
pub use mock::{MockBackend, MockCall, MockState};
pub use options::{OptionName, OptionSet};
pub use pactl::{PactlBackend, PactlConfig};
pub use planner::{
    CONFLICT_GROUPS, ExitStatus, MuteChange, Outcome, Plan, PlanDefaults, Query, VolumeChange,
};
pub use selector::DeviceTarget;
pub use volume::{Direction, NormalizedVolume, VOLUME_MAX, VOLUME_MUTED, VOLUME_NORM};

/// Core Result type
pub type Result<T> = std::result::Result<T, MixerError>;

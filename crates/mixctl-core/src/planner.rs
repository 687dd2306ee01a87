//! Command planning and execution
//!
//! Turning an [`OptionSet`] into work happens in two phases. [`Plan::from_options`]
//! validates the options and decides what to do without touching the audio
//! server; [`Plan::execute`] then runs the steps in a fixed order:
//!
//! 1. volume mutation (`--set-volume`, `--increase`, `--decrease`)
//! 2. mute mutation (`--toggle-mute`, `--mute`, `--unmute`)
//! 3. query output (`--get-volume`, `--get-mute`, `--list-sinks`, `--list-sources`)
//!
//! A failing step aborts the ones after it.

use crate::Result;
use crate::backend::AudioBackend;
use crate::device::{Device, DeviceKind};
use crate::error::MixerError;
use crate::options::{OptionName, OptionSet};
use crate::selector::DeviceTarget;
use crate::volume::{Direction, NormalizedVolume, apply_boost_limit};
use std::io::Write;
use tracing::{debug, info};

/// Groups of mutually exclusive options. Every pair inside a group conflicts.
pub const CONFLICT_GROUPS: &[&[OptionName]] = &[
    &[OptionName::SetVolume, OptionName::Decrease, OptionName::Increase],
    &[OptionName::ToggleMute, OptionName::Unmute, OptionName::Mute],
    &[OptionName::Sink, OptionName::Source],
    &[OptionName::Sink, OptionName::DefaultSource],
    &[OptionName::GetVolume, OptionName::GetMute],
    &[OptionName::GetVolume, OptionName::ListSinks],
    &[OptionName::GetVolume, OptionName::ListSources],
];

/// Reject option sets where two members of a conflict group were both given.
pub fn validate(options: &OptionSet) -> Result<()> {
    for group in CONFLICT_GROUPS {
        for (i, first) in group.iter().enumerate() {
            for second in &group[i + 1..] {
                if options.is_present(*first) && options.is_present(*second) {
                    return Err(MixerError::ConflictingOptions {
                        first: first.as_str(),
                        second: second.as_str(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus(i32);

impl ExitStatus {
    /// Success, or usage shown
    pub const SUCCESS: ExitStatus = ExitStatus(0);
    /// A query answered zero / false. Indistinguishable from failure for
    /// callers that only test `$? == 0`; kept for script compatibility.
    pub const QUERY_FALSE: ExitStatus = ExitStatus(1);
    /// Unrecognized option or malformed value
    pub const USAGE_ERROR: ExitStatus = ExitStatus(2);
    /// Conflicting options, missing device, backend or configuration failure
    pub const FAILURE: ExitStatus = ExitStatus(3);

    pub fn code(&self) -> i32 {
        self.0
    }

    fn from_query(answer: bool) -> Self {
        if answer {
            ExitStatus::SUCCESS
        } else {
            ExitStatus::QUERY_FALSE
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.0 as u8)
    }
}

/// Values used when the matching option was not given.
///
/// Boost has no default: only `--allow-boost` lifts the cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanDefaults {
    pub gamma: f64,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self { gamma: 1.0 }
    }
}

/// Step 1: a volume change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeChange {
    pub direction: Direction,
    /// Percent, already clamped to be non-negative
    pub value: u32,
    pub gamma: f64,
    pub allow_boost: bool,
}

impl VolumeChange {
    /// Volume to submit given the device's current average
    pub fn target_volume(&self, current: NormalizedVolume) -> NormalizedVolume {
        let volume = self.direction.apply(current, self.value, self.gamma);
        apply_boost_limit(volume, self.allow_boost)
    }
}

/// Step 2: a mute change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteChange {
    Toggle,
    Mute,
    Unmute,
}

impl MuteChange {
    pub fn apply(self, current: bool) -> bool {
        match self {
            MuteChange::Toggle => !current,
            MuteChange::Mute => true,
            MuteChange::Unmute => false,
        }
    }
}

/// Step 3: what to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    GetVolume,
    GetMute,
    /// Either flag may be false; both false prints nothing
    List { sinks: bool, sources: bool },
}

impl Query {
    /// Whether the query prints the target's state
    fn needs_device(&self) -> bool {
        matches!(self, Query::GetVolume | Query::GetMute)
    }
}

/// Result of planning
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Print usage and exit 0 without contacting the server
    ShowUsage,
    Execute(Plan),
}

/// Validated, ordered work for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub target: DeviceTarget,
    pub volume: Option<VolumeChange>,
    pub mute: Option<MuteChange>,
    pub query: Query,
}

impl Plan {
    /// Plan with the built-in gamma of 1.0
    pub fn from_options(options: &OptionSet) -> Result<Outcome> {
        Self::from_options_with(options, &PlanDefaults::default())
    }

    /// Validate `options` and build the plan, falling back to `defaults`
    /// for `--gamma`.
    pub fn from_options_with(options: &OptionSet, defaults: &PlanDefaults) -> Result<Outcome> {
        if options.wants_usage() {
            return Ok(Outcome::ShowUsage);
        }

        validate(options)?;

        let gamma = options.gamma.unwrap_or(defaults.gamma);
        let allow_boost = options.allow_boost;

        let requested = if let Some(value) = options.set_volume {
            Some((Direction::SetAbsolute, value))
        } else if let Some(value) = options.increase {
            Some((Direction::Increase, value))
        } else {
            options.decrease.map(|value| (Direction::Decrease, value))
        };

        let volume = match requested {
            Some((direction, value)) => {
                if direction != Direction::SetAbsolute && !(gamma.is_finite() && gamma > 0.0) {
                    return Err(MixerError::InvalidGamma(gamma));
                }
                Some(VolumeChange {
                    direction,
                    value: value.max(0).unsigned_abs(),
                    gamma,
                    allow_boost,
                })
            }
            None => None,
        };

        let mute = if options.toggle_mute {
            Some(MuteChange::Toggle)
        } else if options.mute {
            Some(MuteChange::Mute)
        } else if options.unmute {
            Some(MuteChange::Unmute)
        } else {
            None
        };

        let query = if options.get_volume {
            Query::GetVolume
        } else if options.get_mute {
            Query::GetMute
        } else {
            Query::List {
                sinks: options.list_sinks,
                sources: options.list_sources,
            }
        };

        let plan = Plan {
            target: DeviceTarget::from_options(options),
            volume,
            mute,
            query,
        };
        debug!("Planned {:?}", plan);
        Ok(Outcome::Execute(plan))
    }

    /// Run the plan against `backend`, writing query output to `out`.
    ///
    /// The target is resolved before any step, so a missing device aborts
    /// the whole invocation.
    pub fn execute<B, W>(&self, backend: &B, out: &mut W) -> Result<ExitStatus>
    where
        B: AudioBackend + ?Sized,
        W: Write + ?Sized,
    {
        let mut device = self.target.resolve(backend)?;

        if let Some(change) = self.volume {
            let new_volume = change.target_volume(device.volume_avg);
            info!(
                "Setting {} {} volume {} -> {}",
                device.kind, device.name, device.volume_avg, new_volume
            );
            backend.set_volume(&device, new_volume)?;
            device = self.target.resolve(backend)?;
        }

        if let Some(change) = self.mute {
            let mute = change.apply(device.mute);
            info!("Setting {} {} mute {}", device.kind, device.name, mute);
            backend.set_mute(&device, mute)?;
            if self.query.needs_device() {
                device = self.target.resolve(backend)?;
            }
        }

        match self.query {
            Query::GetVolume => {
                writeln!(out, "{}", device.volume_percent)?;
                Ok(ExitStatus::from_query(device.volume_percent > 0))
            }
            Query::GetMute => {
                writeln!(out, "{}", device.mute)?;
                Ok(ExitStatus::from_query(device.mute))
            }
            Query::List { sinks, sources } => {
                if sinks {
                    write_list(out, "Sinks:", &backend.list(DeviceKind::Sink)?)?;
                }
                if sources {
                    write_list(out, "Sources:", &backend.list(DeviceKind::Source)?)?;
                }
                Ok(ExitStatus::SUCCESS)
            }
        }
    }
}

fn write_list<W: Write + ?Sized>(out: &mut W, header: &str, devices: &[Device]) -> Result<()> {
    writeln!(out, "{}", header)?;
    for device in devices {
        writeln!(out, "{}", device.list_line())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::VOLUME_NORM;

    fn plan(options: OptionSet) -> Plan {
        match Plan::from_options(&options).unwrap() {
            Outcome::Execute(plan) => plan,
            Outcome::ShowUsage => panic!("expected a plan for {:?}", options),
        }
    }

    #[test]
    fn test_every_listed_pair_conflicts() {
        let pairs = [
            ("set-volume", "increase"),
            ("set-volume", "decrease"),
            ("decrease", "increase"),
            ("toggle-mute", "mute"),
            ("toggle-mute", "unmute"),
            ("unmute", "mute"),
            ("sink", "source"),
            ("sink", "default-source"),
            ("get-volume", "get-mute"),
            ("get-volume", "list-sinks"),
            ("get-volume", "list-sources"),
        ];
        for (a, b) in pairs {
            let covered = CONFLICT_GROUPS.iter().any(|group| {
                group.iter().any(|o| o.as_str() == a) && group.iter().any(|o| o.as_str() == b)
            });
            assert!(covered, "{a} / {b} should conflict");
        }
    }

    #[test]
    fn test_validate_reports_both_names() {
        let options = OptionSet {
            set_volume: Some(50),
            increase: Some(10),
            ..Default::default()
        };
        match validate(&options) {
            Err(MixerError::ConflictingOptions { first, second }) => {
                assert_eq!(first, "set-volume");
                assert_eq!(second, "increase");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_compatible_options_pass() {
        // source and default-source are not declared as conflicting
        let options = OptionSet {
            source: Some("mic".into()),
            default_source: true,
            get_mute: true,
            list_sinks: true,
            list_sources: true,
            mute: true,
            increase: Some(5),
            ..Default::default()
        };
        assert!(validate(&options).is_ok());
    }

    #[test]
    fn test_usage_when_empty_or_help() {
        assert_eq!(
            Plan::from_options(&OptionSet::default()).unwrap(),
            Outcome::ShowUsage
        );

        let gamma_only = OptionSet {
            gamma: Some(2.0),
            ..Default::default()
        };
        assert_eq!(Plan::from_options(&gamma_only).unwrap(), Outcome::ShowUsage);

        // help wins even over conflicting options
        let help = OptionSet {
            help: true,
            mute: true,
            unmute: true,
            ..Default::default()
        };
        assert_eq!(Plan::from_options(&help).unwrap(), Outcome::ShowUsage);
    }

    #[test]
    fn test_negative_values_clamped() {
        let plan = plan(OptionSet {
            decrease: Some(-20),
            ..Default::default()
        });
        let change = plan.volume.unwrap();
        assert_eq!(change.direction, Direction::Decrease);
        assert_eq!(change.value, 0);
    }

    #[test]
    fn test_defaults_fill_missing_modifiers() {
        let defaults = PlanDefaults { gamma: 2.2 };
        let options = OptionSet {
            increase: Some(5),
            ..Default::default()
        };
        let Outcome::Execute(plan) = Plan::from_options_with(&options, &defaults).unwrap() else {
            panic!("expected a plan");
        };
        let change = plan.volume.unwrap();
        assert_eq!(change.gamma, 2.2);
        assert!(!change.allow_boost);

        let explicit = OptionSet {
            increase: Some(5),
            gamma: Some(1.5),
            ..Default::default()
        };
        let Outcome::Execute(plan) = Plan::from_options_with(&explicit, &defaults).unwrap() else {
            panic!("expected a plan");
        };
        assert_eq!(plan.volume.unwrap().gamma, 1.5);
    }

    #[test]
    fn test_invalid_gamma_rejected_for_relative_steps() {
        for gamma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let options = OptionSet {
                increase: Some(5),
                gamma: Some(gamma),
                ..Default::default()
            };
            assert!(matches!(
                Plan::from_options(&options),
                Err(MixerError::InvalidGamma(_))
            ));
        }

        // set-volume never uses gamma
        let options = OptionSet {
            set_volume: Some(5),
            gamma: Some(0.0),
            ..Default::default()
        };
        assert!(Plan::from_options(&options).is_ok());
    }

    #[test]
    fn test_query_selection() {
        let planned = plan(OptionSet {
            get_mute: true,
            list_sinks: true,
            ..Default::default()
        });
        assert_eq!(planned.query, Query::GetMute);

        let planned = plan(OptionSet {
            list_sinks: true,
            list_sources: true,
            ..Default::default()
        });
        assert_eq!(
            planned.query,
            Query::List {
                sinks: true,
                sources: true
            }
        );
    }

    #[test]
    fn test_target_volume_boost_limit() {
        let change = VolumeChange {
            direction: Direction::SetAbsolute,
            value: 150,
            gamma: 1.0,
            allow_boost: false,
        };
        assert_eq!(change.target_volume(0), VOLUME_NORM);

        let boosted = VolumeChange {
            allow_boost: true,
            ..change
        };
        assert_eq!(boosted.target_volume(0), VOLUME_NORM * 3 / 2);
    }

    #[test]
    fn test_mute_change() {
        assert!(MuteChange::Toggle.apply(false));
        assert!(!MuteChange::Toggle.apply(true));
        assert!(MuteChange::Mute.apply(false));
        assert!(!MuteChange::Unmute.apply(true));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitStatus::SUCCESS.code(), 0);
        assert_eq!(ExitStatus::QUERY_FALSE.code(), 1);
        assert_eq!(ExitStatus::USAGE_ERROR.code(), 2);
        assert_eq!(ExitStatus::FAILURE.code(), 3);
    }
}

//! Command-line interface
//!
//! Argument parsing and help rendering. `--help` is handled by the planner
//! rather than by clap so that help and "no options" behave the same way.

use clap::{CommandFactory, Parser};
use mixctl_core::OptionSet;

/// Control the volume and mute state of audio sinks and sources
#[derive(Parser, Debug, Default)]
#[command(name = "mixctl")]
#[command(version, about, long_about = None)]
#[command(disable_help_flag = true, allow_negative_numbers = true)]
pub struct Args {
    /// Print this help message
    #[arg(short = 'h', long)]
    pub help: bool,

    /// Choose a different sink than the default
    #[arg(short = 's', long, value_name = "NAME")]
    pub sink: Option<String>,

    /// Choose a different source than the default
    #[arg(long, value_name = "NAME")]
    pub source: Option<String>,

    /// Select the default source
    #[arg(long)]
    pub default_source: bool,

    /// Print the current volume in percent
    #[arg(long)]
    pub get_volume: bool,

    /// Set the volume in percent
    #[arg(long, value_name = "PERCENT")]
    pub set_volume: Option<i32>,

    /// Increase the volume by PERCENT
    #[arg(short, long, value_name = "PERCENT")]
    pub increase: Option<i32>,

    /// Decrease the volume by PERCENT
    #[arg(short, long, value_name = "PERCENT")]
    pub decrease: Option<i32>,

    /// Switch between mute and unmute
    #[arg(short, long)]
    pub toggle_mute: bool,

    /// Set mute
    #[arg(short, long)]
    pub mute: bool,

    /// Allow the volume to go above 100%
    #[arg(long)]
    pub allow_boost: bool,

    /// Increase/decrease using gamma correction, e.g. 2.2 [default: 1.0]
    #[arg(long, value_name = "GAMMA")]
    pub gamma: Option<f64>,

    /// Unset mute
    #[arg(short, long)]
    pub unmute: bool,

    /// Print true if the device is muted, false otherwise
    #[arg(long)]
    pub get_mute: bool,

    /// List the sinks
    #[arg(long)]
    pub list_sinks: bool,

    /// List the sources
    #[arg(long)]
    pub list_sources: bool,

    /// Increase logging verbosity
    /// -v = info, -vv = debug, -vvv = trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Options the planner cares about
    pub fn to_options(&self) -> OptionSet {
        OptionSet {
            help: self.help,
            sink: self.sink.clone(),
            source: self.source.clone(),
            default_source: self.default_source,
            get_volume: self.get_volume,
            set_volume: self.set_volume,
            increase: self.increase,
            decrease: self.decrease,
            toggle_mute: self.toggle_mute,
            mute: self.mute,
            allow_boost: self.allow_boost,
            gamma: self.gamma,
            unmute: self.unmute,
            get_mute: self.get_mute,
            list_sinks: self.list_sinks,
            list_sources: self.list_sources,
        }
    }

    /// Default log filter for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Rendered usage text
pub fn usage() -> String {
    Args::command().render_help().to_string()
}

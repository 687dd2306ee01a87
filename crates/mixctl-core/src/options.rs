//! Parsed command-line options
//!
//! [`OptionSet`] records only what the user actually typed. Defaults (from
//! the built-in values or the configuration file) are applied later by the
//! planner, so they can never trip a conflict check.

/// Every option the planner knows about, by its long name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionName {
    Help,
    Sink,
    Source,
    DefaultSource,
    GetVolume,
    SetVolume,
    Increase,
    Decrease,
    ToggleMute,
    Mute,
    AllowBoost,
    Gamma,
    Unmute,
    GetMute,
    ListSinks,
    ListSources,
}

impl OptionName {
    /// Long flag name without the leading dashes
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionName::Help => "help",
            OptionName::Sink => "sink",
            OptionName::Source => "source",
            OptionName::DefaultSource => "default-source",
            OptionName::GetVolume => "get-volume",
            OptionName::SetVolume => "set-volume",
            OptionName::Increase => "increase",
            OptionName::Decrease => "decrease",
            OptionName::ToggleMute => "toggle-mute",
            OptionName::Mute => "mute",
            OptionName::AllowBoost => "allow-boost",
            OptionName::Gamma => "gamma",
            OptionName::Unmute => "unmute",
            OptionName::GetMute => "get-mute",
            OptionName::ListSinks => "list-sinks",
            OptionName::ListSources => "list-sources",
        }
    }

    pub fn all() -> &'static [OptionName] {
        &[
            OptionName::Help,
            OptionName::Sink,
            OptionName::Source,
            OptionName::DefaultSource,
            OptionName::GetVolume,
            OptionName::SetVolume,
            OptionName::Increase,
            OptionName::Decrease,
            OptionName::ToggleMute,
            OptionName::Mute,
            OptionName::AllowBoost,
            OptionName::Gamma,
            OptionName::Unmute,
            OptionName::GetMute,
            OptionName::ListSinks,
            OptionName::ListSources,
        ]
    }
}

/// Options as supplied on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet {
    pub help: bool,
    pub sink: Option<String>,
    pub source: Option<String>,
    pub default_source: bool,
    pub get_volume: bool,
    pub set_volume: Option<i32>,
    pub increase: Option<i32>,
    pub decrease: Option<i32>,
    pub toggle_mute: bool,
    pub mute: bool,
    pub allow_boost: bool,
    pub gamma: Option<f64>,
    pub unmute: bool,
    pub get_mute: bool,
    pub list_sinks: bool,
    pub list_sources: bool,
}

impl OptionSet {
    /// Whether `option` was given explicitly
    pub fn is_present(&self, option: OptionName) -> bool {
        match option {
            OptionName::Help => self.help,
            OptionName::Sink => self.sink.is_some(),
            OptionName::Source => self.source.is_some(),
            OptionName::DefaultSource => self.default_source,
            OptionName::GetVolume => self.get_volume,
            OptionName::SetVolume => self.set_volume.is_some(),
            OptionName::Increase => self.increase.is_some(),
            OptionName::Decrease => self.decrease.is_some(),
            OptionName::ToggleMute => self.toggle_mute,
            OptionName::Mute => self.mute,
            OptionName::AllowBoost => self.allow_boost,
            OptionName::Gamma => self.gamma.is_some(),
            OptionName::Unmute => self.unmute,
            OptionName::GetMute => self.get_mute,
            OptionName::ListSinks => self.list_sinks,
            OptionName::ListSources => self.list_sources,
        }
    }

    /// Names of all explicitly supplied options, in declaration order
    pub fn present(&self) -> Vec<OptionName> {
        OptionName::all()
            .iter()
            .copied()
            .filter(|option| self.is_present(*option))
            .collect()
    }

    /// True when nothing but `--gamma` (a pure modifier) was given
    pub fn is_empty(&self) -> bool {
        self.present()
            .iter()
            .all(|option| *option == OptionName::Gamma)
    }

    /// `--help`, or nothing to do: print usage without reading
    /// configuration or contacting the server
    pub fn wants_usage(&self) -> bool {
        self.help || self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let options = OptionSet::default();
        assert!(options.is_empty());
        assert!(options.present().is_empty());
    }

    #[test]
    fn test_gamma_alone_is_empty() {
        let options = OptionSet {
            gamma: Some(2.2),
            ..Default::default()
        };
        assert!(options.is_present(OptionName::Gamma));
        assert!(options.is_empty());
    }

    #[test]
    fn test_presence() {
        let options = OptionSet {
            sink: Some("alsa_output.pci".into()),
            increase: Some(-3),
            mute: true,
            ..Default::default()
        };
        assert_eq!(
            options.present(),
            vec![OptionName::Sink, OptionName::Increase, OptionName::Mute]
        );
        assert!(!options.is_empty());
    }

    #[test]
    fn test_wants_usage() {
        assert!(OptionSet::default().wants_usage());

        let help = OptionSet {
            help: true,
            get_volume: true,
            ..Default::default()
        };
        assert!(help.wants_usage());

        let query = OptionSet {
            get_volume: true,
            gamma: Some(2.0),
            ..Default::default()
        };
        assert!(!query.wants_usage());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = OptionName::all().iter().map(|o| o.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OptionName::all().len());
    }
}

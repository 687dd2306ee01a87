//! Volume arithmetic
//!
//! Conversions between user-facing percentages and the audio server's
//! normalized volume unit, plus the gamma-corrected relative step used by
//! `--increase` / `--decrease`.

/// Backend volume unit. `VOLUME_NORM` is 100%, anything above it is boost.
pub type NormalizedVolume = u32;

/// Normalized volume representing 100% (PulseAudio's `PA_VOLUME_NORM`).
pub const VOLUME_NORM: NormalizedVolume = 0x10000;

/// Normalized volume representing silence.
pub const VOLUME_MUTED: NormalizedVolume = 0;

/// Largest volume the server accepts (`PA_VOLUME_MAX`).
pub const VOLUME_MAX: NormalizedVolume = u32::MAX / 2;

/// Which branch of the volume math a mutation runs through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increase,
    Decrease,
    SetAbsolute,
}

impl Direction {
    /// Compute the new volume for a step of `value` percent from `current`.
    ///
    /// `SetAbsolute` ignores `current` and `gamma`.
    pub fn apply(self, current: NormalizedVolume, value: u32, gamma: f64) -> NormalizedVolume {
        let delta = i32::try_from(value).unwrap_or(i32::MAX);
        match self {
            Direction::SetAbsolute => percent_to_normalized(value),
            Direction::Increase => gamma_adjust(current, gamma, delta),
            Direction::Decrease => gamma_adjust(current, gamma, -delta),
        }
    }
}

/// Convert a percentage to normalized units, rounding to nearest.
///
/// No clamping happens here; 150 yields one and a half times `VOLUME_NORM`.
pub fn percent_to_normalized(percent: u32) -> NormalizedVolume {
    let volume = (f64::from(percent) * f64::from(VOLUME_NORM) / 100.0).round();
    volume as NormalizedVolume
}

/// Convert normalized units to a whole percentage, rounding to nearest.
pub fn normalized_to_percent(volume: NormalizedVolume) -> u32 {
    (f64::from(volume) * 100.0 / f64::from(VOLUME_NORM)).round() as u32
}

/// Step `current` by `delta_percent` in perceptual space.
///
/// The volume is mapped to `[0, 1+]` linear, raised to `1/gamma`, offset by
/// `delta_percent / 100`, floored at zero and mapped back with `^gamma`.
/// With `gamma == 1.0` this is plain linear percent stepping. There is no
/// upper bound here; see [`apply_boost_limit`].
pub fn gamma_adjust(current: NormalizedVolume, gamma: f64, delta_percent: i32) -> NormalizedVolume {
    let norm = f64::from(VOLUME_NORM);

    let linear = f64::from(current) / norm;
    // 0^(1/gamma) is 0 for any positive gamma, no special case needed
    let perceptual = linear.powf(1.0 / gamma) + f64::from(delta_percent) / 100.0;
    let perceptual = perceptual.max(0.0);

    let adjusted = perceptual.powf(gamma) * norm;
    // `as` saturates, absurd boosts end up at u32::MAX rather than wrapping
    adjusted.round() as NormalizedVolume
}

/// Cap `volume` at `VOLUME_NORM` unless boost is allowed.
pub fn apply_boost_limit(volume: NormalizedVolume, allow_boost: bool) -> NormalizedVolume {
    if !allow_boost && volume > VOLUME_NORM {
        tracing::debug!("Capping volume {} at {}", volume, VOLUME_NORM);
        return VOLUME_NORM;
    }
    volume
}

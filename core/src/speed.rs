use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Multiplier applied to the base tick rate, stored in tenths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeedMultiplier {
    tenths: u32,
}

impl SpeedMultiplier {
    /// Slowest multiplier reachable through the preset cycle.
    pub const MIN: Self = Self::from_tenths(5);

    /// Multiplier a session starts with.
    pub const DEFAULT: Self = Self::from_tenths(10);

    /// Ceiling for automatic acceleration.
    pub const MAX: Self = Self::from_tenths(30);

    /// Increment applied each time the score crosses a speed-up interval.
    pub const STEP_TENTHS: u32 = 2;

    /// Creates a multiplier from an integer number of tenths.
    #[must_use]
    pub const fn from_tenths(tenths: u32) -> Self {
        Self { tenths }
    }

    /// Multiplier expressed in tenths.
    #[must_use]
    pub const fn tenths(&self) -> u32 {
        self.tenths
    }

    /// Returns the accelerated multiplier, or `None` once the ceiling is reached.
    #[must_use]
    pub fn accelerated(self) -> Option<Self> {
        if self >= Self::MAX {
            return None;
        }

        let tenths = (self.tenths + Self::STEP_TENTHS).min(Self::MAX.tenths);
        Some(Self::from_tenths(tenths))
    }

    /// Preset selected when the player cycles from this multiplier.
    #[must_use]
    pub const fn next_preset(self) -> SpeedPreset {
        match self.tenths {
            0..=6 => SpeedPreset::Normal,
            7..=11 => SpeedPreset::Fast,
            12..=16 => SpeedPreset::VeryFast,
            _ => SpeedPreset::Slow,
        }
    }

    /// Wall-clock time between ticks for the provided base tick rate.
    ///
    /// Equals `1000 ms / (base_tick_rate * multiplier)`. A zero rate or
    /// multiplier yields [`Duration::MAX`] so the clock never fires.
    #[must_use]
    pub fn tick_interval(&self, base_tick_rate: u32) -> Duration {
        let ticks_per_ten_seconds = u64::from(base_tick_rate) * u64::from(self.tenths);
        match 10_000_000_u64.checked_div(ticks_per_ten_seconds) {
            Some(micros) => Duration::from_micros(micros),
            None => Duration::MAX,
        }
    }
}

impl Default for SpeedMultiplier {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SpeedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}.{}", self.tenths / 10, self.tenths % 10)
    }
}

/// Speed presets the player can cycle through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedPreset {
    /// Half speed.
    Slow,
    /// Base speed.
    #[default]
    Normal,
    /// One and a half times the base speed.
    Fast,
    /// Double speed.
    VeryFast,
}

impl SpeedPreset {
    /// Multiplier represented by the preset.
    #[must_use]
    pub const fn multiplier(self) -> SpeedMultiplier {
        match self {
            Self::Slow => SpeedMultiplier::from_tenths(5),
            Self::Normal => SpeedMultiplier::from_tenths(10),
            Self::Fast => SpeedMultiplier::from_tenths(15),
            Self::VeryFast => SpeedMultiplier::from_tenths(20),
        }
    }

    /// Human readable preset name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_one_hundred_milliseconds() {
        assert_eq!(
            SpeedMultiplier::DEFAULT.tick_interval(10),
            Duration::from_millis(100)
        );
        assert_eq!(
            SpeedMultiplier::from_tenths(12).tick_interval(10),
            Duration::from_micros(83_333)
        );
    }

    #[test]
    fn zero_tick_rate_never_fires() {
        assert_eq!(SpeedMultiplier::DEFAULT.tick_interval(0), Duration::MAX);
    }

    #[test]
    fn acceleration_saturates_at_ceiling() {
        assert_eq!(
            SpeedMultiplier::DEFAULT.accelerated(),
            Some(SpeedMultiplier::from_tenths(12))
        );
        assert_eq!(
            SpeedMultiplier::from_tenths(29).accelerated(),
            Some(SpeedMultiplier::MAX)
        );
        assert_eq!(SpeedMultiplier::MAX.accelerated(), None);
    }

    #[test]
    fn preset_cycle_follows_thresholds() {
        let mut multiplier = SpeedMultiplier::DEFAULT;
        let mut visited = Vec::new();
        for _ in 0..4 {
            let preset = multiplier.next_preset();
            visited.push(preset);
            multiplier = preset.multiplier();
        }

        assert_eq!(
            visited,
            vec![
                SpeedPreset::Fast,
                SpeedPreset::VeryFast,
                SpeedPreset::Slow,
                SpeedPreset::Normal,
            ]
        );
        assert_eq!(
            SpeedMultiplier::from_tenths(12).next_preset(),
            SpeedPreset::Fast
        );
    }

    #[test]
    fn display_uses_single_decimal() {
        assert_eq!(SpeedMultiplier::from_tenths(12).to_string(), "x1.2");
        assert_eq!(SpeedMultiplier::MIN.to_string(), "x0.5");
    }
}

//! Display profiles for the LCD filters
//!
//! - [`DisplayProfile`]: colour-correction matrix and gamma of a colour LCD
//! - [`MonoDisplayProfile`]: foreground/background of a monochrome LCD
//!
//! Both come as built-in presets ([`GridPreset`], [`MonoPreset`]) or as
//! caller-supplied values, which are validated before use.

mod display;
mod error;
mod mono;

pub use display::DisplayProfile;
pub use error::{ParseColorError, ProfileError};
pub use mono::{MonoAdjustment, MonoDisplayProfile, ThresholdKernel};

/// Built-in monochrome palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonoPreset {
    #[default]
    Dmg,
    Pocket,
    Light,
}

impl MonoPreset {
    pub const ALL: [Self; 3] = [Self::Dmg, Self::Pocket, Self::Light];

    pub fn profile(self) -> MonoDisplayProfile {
        match self {
            Self::Dmg => MonoDisplayProfile::DMG,
            Self::Pocket => MonoDisplayProfile::POCKET,
            Self::Light => MonoDisplayProfile::LIGHT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dmg => "dmg",
            Self::Pocket => "pocket",
            Self::Light => "light",
        }
    }
}

/// Built-in colour LCD profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridPreset {
    #[default]
    Gbc,
    Gba,
    GbaSp,
    GbaSpWhite,
}

impl GridPreset {
    pub const ALL: [Self; 4] = [Self::Gbc, Self::Gba, Self::GbaSp, Self::GbaSpWhite];

    pub fn profile(self) -> DisplayProfile {
        match self {
            Self::Gbc => DisplayProfile::GBC,
            Self::Gba => DisplayProfile::GBA,
            Self::GbaSp => DisplayProfile::GBA_SP,
            Self::GbaSpWhite => DisplayProfile::GBA_SP_WHITE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Gbc => "gbc",
            Self::Gba => "gba",
            Self::GbaSp => "gba-sp",
            Self::GbaSpWhite => "gba-sp-white",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_are_unique() {
        let mut names: Vec<_> = MonoPreset::ALL
            .iter()
            .map(|p| p.name())
            .chain(GridPreset::ALL.iter().map(|p| p.name()))
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn test_preset_profiles() {
        assert_eq!(MonoPreset::Pocket.profile(), MonoDisplayProfile::POCKET);
        assert_eq!(GridPreset::GbaSpWhite.profile(), DisplayProfile::GBA_SP_WHITE);
        assert_eq!(GridPreset::default().profile(), DisplayProfile::GBC);
    }
}

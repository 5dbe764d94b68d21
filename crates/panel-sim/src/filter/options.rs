//! Filter selection and per-invocation configuration.
//!
//! Integer mode indices from the outside world are resolved into a
//! [`ColorMode`] once, before any pixel is touched. Filters never look at
//! the raw index again.

use std::fmt;

use crate::api::EmulateError;
use crate::profile::{DisplayProfile, GridPreset, MonoAdjustment, MonoDisplayProfile, MonoPreset};

/// Mode names in index order. Indices past the end also select CRT.
pub const MODE_NAMES: [&str; 9] = [
    "dmg",
    "pocket",
    "light",
    "custom",
    "gbc",
    "gba",
    "gba-sp",
    "gba-sp-white",
    "crt",
];

/// Index of the first colour LCD mode.
const FIRST_GRID_MODE: usize = 4;
/// Index of the first CRT mode.
pub(crate) const FIRST_CRT_MODE: usize = 8;

/// Sub-pixel structure used by the LCD grid filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridAlgorithm {
    /// Point-sampled colour offsetting into six stripe bands with row-edge
    /// darkening.
    #[default]
    Subpixel,
    /// Analytic smear-kernel integral over four neighbours.
    Smear,
    /// Plain point sampling.
    None,
}

impl GridAlgorithm {
    pub const ALL: [Self; 3] = [Self::Subpixel, Self::Smear, Self::None];

    /// `0` subpixel, `1` smear, anything else no grid.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Subpixel,
            1 => Self::Smear,
            _ => Self::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Subpixel => "subpixel",
            Self::Smear => "smear",
            Self::None => "none",
        }
    }

    /// Parse `subpixel`, `smear` or `none`, or a numeric index.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        if let Ok(index) = name.parse::<usize>() {
            return Some(Self::from_index(index));
        }
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}

/// Monochrome palette: built in or caller supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonoPalette {
    Preset(MonoPreset),
    Custom(MonoDisplayProfile),
}

impl MonoPalette {
    pub fn profile(&self) -> MonoDisplayProfile {
        match self {
            Self::Preset(p) => p.profile(),
            Self::Custom(p) => *p,
        }
    }
}

/// Colour LCD profile: built in or caller supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelProfile {
    Preset(GridPreset),
    Custom(DisplayProfile),
}

impl PanelProfile {
    pub fn profile(&self) -> DisplayProfile {
        match self {
            Self::Preset(p) => p.profile(),
            Self::Custom(p) => *p,
        }
    }
}

/// Which filter runs, with everything it needs to know about the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorMode {
    Mono(MonoPalette),
    Grid {
        profile: PanelProfile,
        algorithm: GridAlgorithm,
    },
    Crt,
}

impl Default for ColorMode {
    fn default() -> Self {
        Self::Mono(MonoPalette::Preset(MonoPreset::Dmg))
    }
}

impl ColorMode {
    /// Resolve a mode index.
    ///
    /// `0..=2` are the mono presets, `3` is `custom`, `4..=7` the colour LCD
    /// presets and anything above selects the CRT filter.
    pub fn from_index(
        index: usize,
        custom: MonoDisplayProfile,
        algorithm: GridAlgorithm,
    ) -> Result<Self, EmulateError> {
        let mode = match index {
            0..=2 => Self::Mono(MonoPalette::Preset(MonoPreset::ALL[index])),
            3 => Self::Mono(MonoPalette::Custom(custom)),
            FIRST_GRID_MODE..=7 => Self::Grid {
                profile: PanelProfile::Preset(GridPreset::ALL[index - FIRST_GRID_MODE]),
                algorithm,
            },
            _ if cfg!(feature = "crt") => Self::Crt,
            _ => return Err(EmulateError::UnsupportedMode(index)),
        };
        Ok(mode)
    }

    /// Look a mode up by its name in [`MODE_NAMES`].
    pub fn index_of(name: &str) -> Option<usize> {
        let name = name.trim().to_ascii_lowercase();
        MODE_NAMES.iter().position(|n| *n == name)
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Mono(_) => FilterKind::Mono,
            Self::Grid { .. } => FilterKind::LcdGrid,
            Self::Crt => FilterKind::Crt,
        }
    }
}

/// The three filter families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Mono,
    LcdGrid,
    Crt,
}

impl FilterKind {
    /// Filter family for a mode index, without resolving profiles.
    pub fn for_index(index: usize) -> Self {
        match index {
            0..=3 => Self::Mono,
            i if i < FIRST_CRT_MODE => Self::LcdGrid,
            _ => Self::Crt,
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mono => write!(f, "mono LCD"),
            Self::LcdGrid => write!(f, "LCD grid"),
            Self::Crt => write!(f, "CRT"),
        }
    }
}

/// Integer output magnification, 1..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputScale(u32);

impl OutputScale {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 8;

    pub fn new(scale: u32) -> Result<Self, EmulateError> {
        if (Self::MIN..=Self::MAX).contains(&scale) {
            Ok(Self(scale))
        } else {
            Err(EmulateError::InvalidScale(scale))
        }
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for OutputScale {
    fn default() -> Self {
        Self(1)
    }
}

/// Everything one filter invocation needs besides the pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    pub mode: ColorMode,
    pub scale: OutputScale,
    /// Source pixels per device pixel.
    pub stride: usize,
    /// Tone controls for the mono filter; ignored by the others.
    pub mono_adjustment: MonoAdjustment,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            mode: ColorMode::default(),
            scale: OutputScale::default(),
            stride: 1,
            mono_adjustment: MonoAdjustment::default(),
        }
    }
}

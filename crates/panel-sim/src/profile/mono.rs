//! Monochrome LCD palettes and tone adjustment.

use super::error::ProfileError;
use crate::color::Srgb;

/// Foreground and background of a reflective monochrome LCD.
///
/// The background has no opacity: the panel is composited in linear light
/// and the encoded output cannot be blended onto anything else afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonoDisplayProfile {
    pub foreground: Srgb,
    /// Global multiplier on the quantized pixel opacity, 0.0..=1.0.
    pub foreground_opacity: f64,
    pub background: Srgb,
}

impl MonoDisplayProfile {
    /// Original green-tinted handheld.
    pub const DMG: Self = Self {
        foreground: Srgb::new(19.0 / 255.0, 74.0 / 255.0, 7.0 / 255.0),
        foreground_opacity: 1.0,
        background: Srgb::new(170.0 / 255.0, 181.0 / 255.0, 19.0 / 255.0),
    };

    /// Later grey-screen model.
    pub const POCKET: Self = Self {
        foreground: Srgb::new(0.0, 0.0, 0.0),
        foreground_opacity: 1.0,
        background: Srgb::new(164.0 / 255.0, 169.0 / 255.0, 137.0 / 255.0),
    };

    /// Backlit teal model.
    pub const LIGHT: Self = Self {
        foreground: Srgb::new(0.0, 46.0 / 255.0, 44.0 / 255.0),
        foreground_opacity: 1.0,
        background: Srgb::new(0.0, 181.0 / 255.0, 176.0 / 255.0),
    };

    pub fn new(foreground: Srgb, foreground_opacity: f64, background: Srgb) -> Self {
        Self {
            foreground,
            foreground_opacity,
            background,
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(0.0..=1.0).contains(&self.foreground_opacity) {
            return Err(ProfileError::InvalidOpacity(self.foreground_opacity));
        }
        let channels = [
            ("foreground.r", self.foreground.r),
            ("foreground.g", self.foreground.g),
            ("foreground.b", self.foreground.b),
            ("background.r", self.background.r),
            ("background.g", self.background.g),
            ("background.b", self.background.b),
        ];
        for (name, value) in channels {
            if !value.is_finite() {
                return Err(ProfileError::NonFinite { name });
            }
        }
        Ok(())
    }
}

impl Default for MonoDisplayProfile {
    fn default() -> Self {
        Self::DMG
    }
}

/// Ordered-dither thresholds, indexed `[x % 4][y % 4]`.
const BAYER_4X4: [[f64; 4]; 4] = [
    [0.0, 0.5, 0.125, 0.625],
    [0.75, 0.25, 0.875, 0.375],
    [0.1875, 0.6875, 0.0625, 0.5625],
    [0.9375, 0.4375, 0.8125, 0.3125],
];

/// Leniency so slightly-off 4-colour palettes still land on the right shade.
const BORDER_ERROR: f64 = 0.03;

/// Quantized opacity levels, darkest input first.
const LEVELS: [f32; 4] = [1.0, 0.666_666_7, 0.333_333_33, 0.07];
const LEVELS_INVERTED: [f32; 4] = [0.07, 0.333_333_33, 0.666_666_7, 1.0];

/// Tone controls applied to lightness before quantization.
///
/// The default leaves the classic thresholds (0.28, 0.53, 0.78) untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonoAdjustment {
    /// Use a 4x4 Bayer matrix for the mid threshold instead of 0.5.
    pub dither: bool,
    pub brightness: f64,
    pub contrast: f64,
    pub invert: bool,
    /// Unsharp weight on the 4-neighbour lightness; 0 disables it.
    pub edge_enhancement: f64,
}

impl Default for MonoAdjustment {
    fn default() -> Self {
        Self {
            dither: false,
            brightness: 1.0,
            contrast: 1.0,
            invert: false,
            edge_enhancement: 0.0,
        }
    }
}

impl MonoAdjustment {
    /// Precompute the three thresholds for every cell of the 4x4 pattern.
    pub fn threshold_kernel(&self) -> ThresholdKernel {
        let mut cells = [[[0.0; 3]; 4]; 4];
        for (x, column) in cells.iter_mut().enumerate() {
            for (y, cell) in column.iter_mut().enumerate() {
                let mid = if self.dither { BAYER_4X4[x][y] } else { 0.5 };
                *cell = self.thresholds(mid);
            }
        }
        ThresholdKernel {
            cells,
            levels: if self.invert { LEVELS_INVERTED } else { LEVELS },
        }
    }

    fn thresholds(&self, mid: f64) -> [f64; 3] {
        let t = (mid - 0.5) * 0.25 + 0.5;
        let range = 0.25 / self.contrast.max(0.01);
        [
            ((t - range + BORDER_ERROR) / self.brightness).clamp(0.0, 1.0),
            ((t + BORDER_ERROR) / self.brightness).clamp(0.0, 1.0),
            ((t + range + BORDER_ERROR) / self.brightness).clamp(0.0, 1.0),
        ]
    }
}

/// Per-cell thresholds built from a [`MonoAdjustment`].
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdKernel {
    cells: [[[f64; 3]; 4]; 4],
    levels: [f32; 4],
}

impl ThresholdKernel {
    /// Quantize lightness `l` at device pixel `(x, y)` to an opacity level.
    #[inline]
    pub fn quantize(&self, l: f64, x: usize, y: usize) -> f32 {
        let t = &self.cells[x % 4][y % 4];
        if l <= t[0] {
            self.levels[0]
        } else if l <= t[1] {
            self.levels[1]
        } else if l <= t[2] {
            self.levels[2]
        } else {
            self.levels[3]
        }
    }
}

impl Default for ThresholdKernel {
    fn default() -> Self {
        MonoAdjustment::default().threshold_kernel()
    }
}

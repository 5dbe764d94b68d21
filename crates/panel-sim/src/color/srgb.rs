//! sRGB transfer functions and the gamma-encoded colour type.
//!
//! The piecewise curves follow IEC 61966-2-1 exactly; they are evaluated in
//! `f64` so that the filters reproduce the same bytes on every platform.

use std::str::FromStr;

use super::linear_color::LinearColor;
use crate::profile::ParseColorError;

/// Decode one gamma-encoded channel (0.0..=1.0) to linear light.
#[inline]
pub fn to_linear(v: f64) -> f64 {
    if v <= 0.04045 {
        v * (1.0 / 12.92)
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode one linear channel to the sRGB gamma curve.
#[inline]
pub fn to_gamma(v: f64) -> f64 {
    if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// Quantize an encoded channel to a byte.
///
/// Uses `floor(v * 256)` with everything at or above 1.0 mapped to 255.
/// This is not round-to-nearest; output bytes depend on it.
#[inline]
pub fn to_byte(v: f64) -> u8 {
    if v >= 1.0 {
        return 255;
    }
    // `as` saturates: negatives and NaN land on 0
    (v * 256.0).floor() as u8
}

#[inline]
pub fn clamp(v: f64, low: f64, high: f64) -> f64 {
    v.max(low).min(high)
}

#[inline]
pub fn clamp01(v: f64) -> f64 {
    clamp(v, 0.0, 1.0)
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// A gamma-encoded sRGB colour with channels in 0.0..=1.0.
///
/// Used for caller-facing colours (palette foregrounds and backgrounds).
/// Convert to [`LinearColor`] before doing any arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Create a colour from 8-bit channels (`v / 255`).
    ///
    /// # Example
    /// ```
    /// use panel_sim::Srgb;
    /// let c = Srgb::from_u8(255, 0, 0);
    /// assert_eq!(c.r, 1.0);
    /// ```
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Quantize with the same `floor(v * 256)` rule the filters use.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [to_byte(self.r), to_byte(self.g), to_byte(self.b)]
    }

    /// Decode through the exact transfer function (no lookup table).
    #[inline]
    pub fn to_linear(self) -> LinearColor {
        LinearColor::new(to_linear(self.r), to_linear(self.g), to_linear(self.b))
    }
}

impl From<LinearColor> for Srgb {
    fn from(c: LinearColor) -> Self {
        Self {
            r: to_gamma(c.r),
            g: to_gamma(c.g),
            b: to_gamma(c.b),
        }
    }
}

impl FromStr for Srgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::from_u8(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::from_u8(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

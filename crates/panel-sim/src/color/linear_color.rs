//! Linear-light colour value with shader-style arithmetic.
//!
//! Every filter works on [`LinearColor`] between the lookup-table load and
//! the final gamma encode. Arithmetic may leave 0.0..=1.0 freely; callers
//! clamp before quantizing.

use std::ops::{Add, AddAssign, Div, Mul, Sub};

use super::srgb::{to_byte, to_gamma, to_linear};

/// Three-channel colour in linear light, no alpha.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl LinearColor {
    pub const BLACK: Self = Self::splat(0.0);
    pub const WHITE: Self = Self::splat(1.0);

    #[inline]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// All three channels set to `v`.
    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self { r: v, g: v, b: v }
    }

    #[inline]
    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Component-wise power with a per-channel exponent.
    #[inline]
    pub fn pow(self, e: Self) -> Self {
        Self::new(self.r.powf(e.r), self.g.powf(e.g), self.b.powf(e.b))
    }

    #[inline]
    pub fn powf(self, e: f64) -> Self {
        self.map(|v| v.powf(e))
    }

    /// `v * v * v * v` per channel, cheaper than `powf(4.0)`.
    #[inline]
    pub fn pow4(self) -> Self {
        self.map(|v| v * v * v * v)
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        self.map(f64::sqrt)
    }

    #[inline]
    pub fn exp(self) -> Self {
        self.map(f64::exp)
    }

    #[inline]
    pub fn clamp01(self) -> Self {
        self.map(|v| v.max(0.0).min(1.0))
    }

    /// Relative luminance with ITU-R BT.709 weights.
    #[inline]
    pub fn luminance(self) -> f64 {
        self.r * 0.2126 + self.g * 0.7152 + self.b * 0.0722
    }

    /// `self + (other - self) * t`
    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }

    /// Swap red and blue, for panels wired BGR.
    #[inline]
    pub fn swap_rb(self) -> Self {
        Self::new(self.b, self.g, self.r)
    }

    /// Apply the sRGB encode curve to every channel.
    #[inline]
    pub fn to_gamma(self) -> Self {
        self.map(to_gamma)
    }

    /// Treat the channels as encoded values and decode them exactly.
    #[inline]
    pub fn to_linear(self) -> Self {
        self.map(to_linear)
    }

    /// Quantize already-encoded channels to opaque RGBA bytes.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [to_byte(self.r), to_byte(self.g), to_byte(self.b), 255]
    }
}

impl Add for LinearColor {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Add<f64> for LinearColor {
    type Output = Self;
    #[inline]
    fn add(self, rhs: f64) -> Self {
        Self::new(self.r + rhs, self.g + rhs, self.b + rhs)
    }
}

impl AddAssign for LinearColor {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for LinearColor {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Sub<f64> for LinearColor {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: f64) -> Self {
        Self::new(self.r - rhs, self.g - rhs, self.b - rhs)
    }
}

impl Mul for LinearColor {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f64> for LinearColor {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl Div for LinearColor {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::new(self.r / rhs.r, self.g / rhs.g, self.b / rhs.b)
    }
}

impl Div<f64> for LinearColor {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::new(self.r / rhs, self.g / rhs, self.b / rhs)
    }
}

//! Colour LCD panel profiles.

use super::error::ProfileError;
use crate::color::LinearColor;

/// Colour response of a physical LCD panel.
///
/// Coefficients are named `<source><target>`: `gr` is how much of the
/// source green lands in the output red. The diagonal entries (`r`, `g`,
/// `b`) keep their own channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayProfile {
    pub r: f64,
    pub gr: f64,
    pub br: f64,
    pub rg: f64,
    pub g: f64,
    pub bg: f64,
    pub rb: f64,
    pub gb: f64,
    pub b: f64,
    /// Luminance gain applied before the matrix.
    pub lum: f64,
    pub gamma: f64,
    /// Deviation of the panel's effective gamma from `gamma`.
    pub gamma_offset: f64,
    /// Sub-pixels are wired blue-green-red.
    pub bgr: bool,
}

impl DisplayProfile {
    pub const GBC: Self = Self {
        r: 0.80,
        gr: 0.275,
        br: -0.075,
        rg: 0.135,
        g: 0.64,
        bg: 0.225,
        rb: 0.195,
        gb: 0.155,
        b: 0.65,
        lum: 0.93,
        gamma: 2.2,
        gamma_offset: -0.5,
        bgr: false,
    };

    pub const GBA: Self = Self {
        r: 0.80,
        gr: 0.275,
        br: -0.075,
        rg: 0.135,
        g: 0.64,
        bg: 0.225,
        rb: 0.195,
        gb: 0.155,
        b: 0.65,
        lum: 0.93,
        gamma: 2.0,
        gamma_offset: 0.5,
        bgr: true,
    };

    pub const GBA_SP: Self = Self {
        r: 0.86,
        gr: 0.10,
        br: -0.06,
        rg: 0.03,
        g: 0.745,
        bg: 0.0675,
        rb: 0.0025,
        gb: -0.03,
        b: 1.0275,
        lum: 0.97,
        gamma: 2.0,
        gamma_offset: 0.0,
        bgr: false,
    };

    pub const GBA_SP_WHITE: Self = Self {
        r: 0.955,
        gr: 0.11,
        br: -0.065,
        rg: 0.0375,
        g: 0.885,
        bg: 0.0775,
        rb: 0.0025,
        gb: -0.03,
        b: 1.0275,
        lum: 0.94,
        gamma: 2.0,
        gamma_offset: 0.0,
        bgr: false,
    };

    /// Identity matrix, unit gain, no gamma shift.
    pub const NEUTRAL: Self = Self {
        r: 1.0,
        gr: 0.0,
        br: 0.0,
        rg: 0.0,
        g: 1.0,
        bg: 0.0,
        rb: 0.0,
        gb: 0.0,
        b: 1.0,
        lum: 1.0,
        gamma: 2.2,
        gamma_offset: 0.0,
        bgr: false,
    };

    /// Reject profiles that would produce NaN or invert the gamma curve.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let coefficients = [
            ("r", self.r),
            ("gr", self.gr),
            ("br", self.br),
            ("rg", self.rg),
            ("g", self.g),
            ("bg", self.bg),
            ("rb", self.rb),
            ("gb", self.gb),
            ("b", self.b),
            ("lum", self.lum),
            ("gamma_offset", self.gamma_offset),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() {
                return Err(ProfileError::NonFinite { name });
            }
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(ProfileError::InvalidGamma(self.gamma));
        }
        if self.gamma + self.gamma_offset <= 0.0 {
            return Err(ProfileError::InvalidGammaOffset(
                self.gamma + self.gamma_offset,
            ));
        }
        Ok(())
    }

    /// Map a linear colour through the panel response.
    ///
    /// The matrix rows are applied in place, red first: the green row sees
    /// the corrected red and the blue row sees corrected red and green.
    /// Output bytes depend on this order.
    pub fn color_correct(&self, c: LinearColor) -> LinearColor {
        let mut c = c.powf((self.gamma + self.gamma_offset) / self.gamma);
        c = (c * self.lum).clamp01();

        c.r = self.r * c.r + self.gr * c.g + self.br * c.b;
        c.g = self.rg * c.r + self.g * c.g + self.bg * c.b;
        c.b = self.rb * c.r + self.gb * c.g + self.b * c.b;

        c.clamp01()
    }
}

impl Default for DisplayProfile {
    fn default() -> Self {
        Self::GBC
    }
}

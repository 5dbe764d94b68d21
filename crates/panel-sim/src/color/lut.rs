//! Byte-indexed linearization table.
//!
//! Every pixel load goes through [`LinearizationTable`] so the sRGB power
//! curve is evaluated 256 times per process instead of once per sample.

use super::linear_color::LinearColor;
use super::srgb::to_linear;

/// Immutable 256-entry table of `to_linear(i / 255)`.
///
/// Built once by the caller (normally [`ScreenEmulator`](crate::ScreenEmulator))
/// and shared by reference with every filter.
#[derive(Debug, Clone)]
pub struct LinearizationTable {
    entries: [f64; 256],
}

impl LinearizationTable {
    pub fn new() -> Self {
        let mut entries = [0.0; 256];
        for (i, entry) in entries.iter_mut().enumerate() {
            *entry = to_linear(i as f64 / 255.0);
        }
        Self { entries }
    }

    /// Linear value for an 8-bit encoded sample.
    #[inline]
    pub fn get(&self, encoded: u8) -> f64 {
        self.entries[encoded as usize]
    }

    /// Linear value for a 16-bit encoded sample, indexed by its top 8 bits.
    #[inline]
    pub fn get16(&self, encoded: u16) -> f64 {
        self.entries[(encoded >> 8) as usize]
    }

    /// Load a straight-alpha RGBA8 pixel as linear light.
    ///
    /// Channels are widened to 16 bits and premultiplied by alpha before the
    /// lookup, so a fully transparent pixel reads as black and an opaque one
    /// reads exactly `get(channel)`.
    #[inline]
    pub fn load_rgba(&self, [r, g, b, a]: [u8; 4]) -> LinearColor {
        LinearColor::new(
            self.get16(premultiply16(r, a)),
            self.get16(premultiply16(g, a)),
            self.get16(premultiply16(b, a)),
        )
    }
}

impl Default for LinearizationTable {
    fn default() -> Self {
        Self::new()
    }
}

/// `c * 0x101 * a / 0xff` in integer arithmetic.
#[inline]
fn premultiply16(c: u8, a: u8) -> u16 {
    let wide = c as u32 * 0x101 * a as u32 / 0xff;
    wide as u16
}

//! Screen emulation filters.
//!
//! Three filter families, each a pure function from a screenshot to a new
//! image:
//!
//! - [`MonoFilter`]: reflective monochrome LCD with grid gaps, edge smear
//!   and drop shadow
//! - [`LcdGridFilter`]: colour LCD with sub-pixel structure and panel colour
//!   correction
//! - `CrtFilter` (feature `crt`): scanlines, dot mask and Lanczos
//!   reconstruction
//!
//! All of them implement [`ScreenFilter`]. Which one runs is decided once
//! from a [`ColorMode`].

pub mod blur;
#[cfg(feature = "crt")]
mod crt;
mod lcd_grid;
mod mono;
mod options;

#[cfg(feature = "crt")]
pub use crt::{inv_gamma, lanczos2, scanline_weights, CrtFilter};
pub use lcd_grid::{int_smear, LcdGridFilter};
pub use mono::{perceptual_lightness, MonoFilter, MONO_MARGIN, MONO_SCALE};
pub use options::{
    ColorMode, FilterConfig, FilterKind, GridAlgorithm, MonoPalette, OutputScale, PanelProfile,
    MODE_NAMES,
};
#[cfg(not(feature = "crt"))]
pub(crate) use options::FIRST_CRT_MODE;

use crate::color::LinearizationTable;
use crate::preprocess::Downsampler;
use crate::raster::RgbaImage;

/// A screen emulation filter.
///
/// Implementations read `src` through `downsampler` at device resolution,
/// load pixels through `lut`, and return an opaque image. They keep no
/// state between calls.
pub trait ScreenFilter {
    fn apply(
        &self,
        src: &RgbaImage,
        downsampler: &Downsampler,
        lut: &LinearizationTable,
    ) -> RgbaImage;
}

//! Reflective monochrome LCD.
//!
//! The source is reduced to four opacity levels, drawn onto a 5x grid with
//! one-pixel gaps, softened, and composited in linear light as a dark
//! foreground over a coloured background that carries a blurred drop shadow.

use super::blur::{bilinear_scale, PingPong, SHADOW_KERNEL, SMEAR_KERNEL};
use super::ScreenFilter;
use crate::color::{LinearColor, LinearizationTable};
use crate::preprocess::{Downsampler, Frame};
use crate::profile::{MonoAdjustment, MonoDisplayProfile, ThresholdKernel};
use crate::raster::{PixelGrid, RgbaImage};

/// Output pixels per device pixel. The gap test below assumes exactly 5.
pub const MONO_SCALE: usize = 5;
/// Border around the panel in device pixels, wide enough for the blur spread.
pub const MONO_MARGIN: usize = 5;

const SHADOW_OPACITY: f64 = 0.5;
const SHADOW_OFFSET: isize = 1;

/// Normalized CIE L* (0.0..=1.0) of a relative luminance.
#[inline]
pub fn perceptual_lightness(luminance: f64) -> f64 {
    let l = if luminance <= 216.0 / 24389.0 {
        luminance * (24389.0 / 27.0)
    } else {
        luminance.powf(1.0 / 3.0) * 116.0 - 16.0
    };
    (l / 100.0).clamp(0.0, 1.0)
}

/// Monochrome LCD filter.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoFilter {
    profile: MonoDisplayProfile,
    adjustment: MonoAdjustment,
}

impl MonoFilter {
    pub fn new(profile: MonoDisplayProfile) -> Self {
        Self {
            profile,
            adjustment: MonoAdjustment::default(),
        }
    }

    pub fn with_adjustment(mut self, adjustment: MonoAdjustment) -> Self {
        self.adjustment = adjustment;
        self
    }

    /// Output size for a device-resolution picture of `width x height`.
    pub fn output_size(width: usize, height: usize) -> (usize, usize) {
        let margin = MONO_MARGIN * MONO_SCALE;
        (
            width * MONO_SCALE + margin * 2,
            height * MONO_SCALE + margin * 2,
        )
    }

    /// Device-resolution opacity after tone adjustment and quantization.
    fn quantize(&self, lightness: &PixelGrid<f64>) -> PixelGrid<f32> {
        let kernel: ThresholdKernel = self.adjustment.threshold_kernel();
        let e = self.adjustment.edge_enhancement;
        let opacity = self.profile.foreground_opacity as f32;
        let (w, h) = (lightness.width(), lightness.height());

        PixelGrid::from_fn(w, h, |x, y| {
            let mut l = lightness.get(x, y);
            if e > 0.0 {
                let left = x.saturating_sub(1);
                let right = (x + 1).min(w - 1);
                let up = y.saturating_sub(1);
                let down = (y + 1).min(h - 1);

                l += (l * 4.0) * e;
                l -= lightness.get(left, y) * e;
                l -= lightness.get(right, y) * e;
                l -= lightness.get(x, up) * e;
                l -= lightness.get(x, down) * e;
            }
            kernel.quantize(l, x, y) * opacity
        })
    }

    /// Draw every device pixel as a 4x4 block on a 5x5 pitch inside the margin.
    fn upscale_with_gaps(alpha: &PixelGrid<f32>) -> PixelGrid<f32> {
        let (out_w, out_h) = Self::output_size(alpha.width(), alpha.height());
        let margin = MONO_MARGIN * MONO_SCALE;
        let mut grid = PixelGrid::new(out_w, out_h);

        for y in 0..alpha.height() * MONO_SCALE {
            for x in 0..alpha.width() * MONO_SCALE {
                if x % MONO_SCALE >= 4 || y % MONO_SCALE >= 4 {
                    continue;
                }
                grid.set(
                    x + margin,
                    y + margin,
                    alpha.get(x / MONO_SCALE, y / MONO_SCALE),
                );
            }
        }
        grid
    }

    /// Half-resolution blur of the foreground, brought back to full size.
    fn shadow(foreground: &PixelGrid<f32>) -> PixelGrid<f32> {
        let (w, h) = (foreground.width(), foreground.height());

        let mut small = PixelGrid::new(w.div_ceil(2), h.div_ceil(2));
        bilinear_scale(foreground, &mut small);

        let mut blur = PingPong::new(small);
        blur.separable(&SHADOW_KERNEL);

        let mut shadow = PixelGrid::new(w, h);
        bilinear_scale(blur.current(), &mut shadow);
        shadow
    }
}

impl ScreenFilter for MonoFilter {
    fn apply(
        &self,
        src: &RgbaImage,
        downsampler: &Downsampler,
        lut: &LinearizationTable,
    ) -> RgbaImage {
        let fg = self.profile.foreground.to_linear();
        let bg = self.profile.background.to_linear();

        let lightness = downsampler.decimate(src, Frame::source(src), |px| {
            perceptual_lightness(lut.load_rgba(px).luminance())
        });
        let alpha = self.quantize(&lightness);

        let mut smear = PingPong::new(Self::upscale_with_gaps(&alpha));
        smear.separable(&SMEAR_KERNEL);
        let foreground = smear.into_current();

        let shadow = Self::shadow(&foreground);

        tracing::trace!(
            width = foreground.width(),
            height = foreground.height(),
            "Compositing mono LCD"
        );

        RgbaImage::from_fn(foreground.width(), foreground.height(), |x, y| {
            let (xi, yi) = (x as isize, y as isize);
            let s = shadow.get_checked(xi - SHADOW_OFFSET, yi - SHADOW_OFFSET) as f64;
            let c: LinearColor = bg * (1.0 - s * SHADOW_OPACITY);

            let opacity = foreground.get(x, y) as f64;
            let c = fg * opacity + c * (1.0 - opacity);
            c.to_gamma().to_rgba8()
        })
    }
}

//! Colour LCD sub-pixel grid.
//!
//! Magnifies the device-resolution picture by the output scale and
//! reconstructs the visible RGB stripe structure of the panel, then runs the
//! result through the panel's [`DisplayProfile`]. Texel reads clamp to the
//! picture edge.

use super::options::{GridAlgorithm, OutputScale};
use super::ScreenFilter;
use crate::color::{LinearColor, LinearizationTable};
use crate::preprocess::{Downsampler, Frame};
use crate::profile::DisplayProfile;
use crate::raster::{PixelGrid, RgbaImage};

/// Integral of `(1 - x^2 - x^4 + x^6)^2`, odd powers 1..=13.
const SMEAR_COEFFS_X: [f64; 7] = [
    1.0,
    -2.0 / 3.0,
    -1.0 / 5.0,
    4.0 / 7.0,
    -1.0 / 9.0,
    -2.0 / 11.0,
    1.0 / 13.0,
];

/// Integral of `(1 - 2x^4 + x^6)^2`, odd powers 1..=13.
const SMEAR_COEFFS_Y: [f64; 7] = [
    1.0,
    0.0,
    -4.0 / 5.0,
    2.0 / 7.0,
    4.0 / 9.0,
    -4.0 / 11.0,
    1.0 / 13.0,
];

const SMEAR_WIDTH_X: f64 = 1.5;
const SMEAR_WIDTH_Y: f64 = 0.63;
/// Keeps a texel boundary exactly under an output pixel centre on the left
/// texel.
const TEXEL_BIAS: f64 = 0.4999;

const COLOR_LOW: f64 = 0.8;
const COLOR_HIGH: f64 = 1.0;
const SCANLINE_DEPTH: f64 = 0.1;

/// Odd polynomial `sum(coeffs[i] * z^(2i + 1))`.
#[inline]
fn smear_poly(z: f64, coeffs: &[f64; 7]) -> f64 {
    let z2 = z * z;
    let mut zn = z;
    let mut ret = 0.0;
    for c in coeffs {
        ret += zn * c;
        zn *= z2;
    }
    ret
}

/// Average of the smear kernel of half-width `d` over `[x - dx/2, x + dx/2]`.
#[inline]
pub fn int_smear(x: f64, dx: f64, d: f64, coeffs: &[f64; 7]) -> f64 {
    let zl = ((x - dx * 0.5) / d).clamp(-1.0, 1.0);
    let zh = ((x + dx * 0.5) / d).clamp(-1.0, 1.0);
    d * (smear_poly(zh, coeffs) - smear_poly(zl, coeffs)) / dx
}

/// Edge-clamped reads from the device-resolution buffer.
struct Sampler<'a> {
    buff: &'a PixelGrid<LinearColor>,
    width: f64,
    height: f64,
}

impl<'a> Sampler<'a> {
    fn new(buff: &'a PixelGrid<LinearColor>) -> Self {
        Self {
            buff,
            width: buff.width() as f64,
            height: buff.height() as f64,
        }
    }

    /// Nearest texel for a normalized coordinate.
    #[inline]
    fn point(&self, u: f64, v: f64) -> LinearColor {
        let x = (u * self.width).floor() as isize;
        let y = (v * self.height).floor() as isize;
        self.buff.get_clamped(x, y)
    }

    #[inline]
    fn load(&self, x: isize, y: isize) -> LinearColor {
        self.buff.get_clamped(x, y)
    }
}

/// Colour LCD filter.
#[derive(Debug, Clone, PartialEq)]
pub struct LcdGridFilter {
    profile: DisplayProfile,
    algorithm: GridAlgorithm,
    scale: OutputScale,
}

impl LcdGridFilter {
    pub fn new(profile: DisplayProfile, algorithm: GridAlgorithm, scale: OutputScale) -> Self {
        Self {
            profile,
            algorithm,
            scale,
        }
    }

    /// Analytic smear integral over the 2x2 texel neighbourhood.
    fn smear(&self, s: &Sampler<'_>, u: f64, v: f64, out_texel: (f64, f64)) -> LinearColor {
        let tli_x = (u * s.width - TEXEL_BIAS).floor();
        let tli_y = (v * s.height - TEXEL_BIAS).floor();

        let subpix = (u * s.width - TEXEL_BIAS - tli_x) * 3.0;
        let rsubpix = out_texel.0 * s.width * 3.0;

        let smear_x = |offset: f64| int_smear(subpix + offset, rsubpix, SMEAR_WIDTH_X, &SMEAR_COEFFS_X);
        let mut lcol = LinearColor::new(smear_x(1.0), smear_x(0.0), smear_x(-1.0));
        let mut rcol = LinearColor::new(smear_x(-2.0), smear_x(-3.0), smear_x(-4.0));

        if self.profile.bgr {
            lcol = lcol.swap_rb();
            rcol = rcol.swap_rb();
        }

        let subpix = v * s.height - TEXEL_BIAS - tli_y;
        let rsubpix = out_texel.1 * s.height;
        let tcol = int_smear(subpix, rsubpix, SMEAR_WIDTH_Y, &SMEAR_COEFFS_Y);
        let bcol = int_smear(subpix - 1.0, rsubpix, SMEAR_WIDTH_Y, &SMEAR_COEFFS_Y);

        let (x, y) = (tli_x as isize, tli_y as isize);
        let top_left = s.load(x, y) * lcol * tcol;
        let bottom_right = s.load(x + 1, y + 1) * rcol * bcol;
        let bottom_left = s.load(x, y + 1) * lcol * bcol;
        let top_right = s.load(x + 1, y) * rcol * tcol;

        top_left + bottom_right + bottom_left + top_right
    }

    /// Point-sampled colour offsetting into six stripe bands.
    fn subpixel(&self, s: &Sampler<'_>, u: f64, v: f64) -> LinearColor {
        let texel_x = 1.0 / s.width;
        let texel_y = 1.0 / s.height;

        let pos_x = (u * s.width).fract();
        let pos_y = (v * s.height).fract();

        let mut center = s.point(u, v);
        let mut left = s.point(u - texel_x, v);
        let mut right = s.point(u + texel_x, v);

        // Row edges blend toward the neighbouring row and darken.
        if pos_y < 1.0 / 6.0 {
            let t = 0.5 - pos_y * 0.5;
            let dim = pos_y * SCANLINE_DEPTH + (1.0 - SCANLINE_DEPTH);
            center = center.lerp(s.point(u, v - texel_y), t) * dim;
            left = left.lerp(s.point(u - texel_x, v - texel_y), t) * dim;
            right = right.lerp(s.point(u + texel_x, v - texel_y), t) * dim;
        } else if pos_y > 5.0 / 6.0 {
            let t = pos_y * 0.5;
            let dim = (1.0 - pos_y) * SCANLINE_DEPTH + (1.0 - SCANLINE_DEPTH);
            center = center.lerp(s.point(u, v + texel_y), t) * dim;
            left = left.lerp(s.point(u - texel_x, v + texel_y), t) * dim;
            right = right.lerp(s.point(u + texel_x, v + texel_y), t) * dim;
        }

        let mid_left = left.lerp(center, 0.5);
        let mid_right = right.lerp(center, 0.5);

        let (hi, lo) = (COLOR_HIGH, COLOR_LOW);
        let c = center;
        let (from, to) = if pos_x < 1.0 / 6.0 {
            (
                LinearColor::new(hi * c.r, lo * c.g, hi * left.b),
                LinearColor::new(hi * c.r, lo * c.g, lo * left.b),
            )
        } else if pos_x < 2.0 / 6.0 {
            (
                LinearColor::new(hi * c.r, lo * c.g, lo * left.b),
                LinearColor::new(hi * c.r, hi * c.g, lo * mid_left.b),
            )
        } else if pos_x < 3.0 / 6.0 {
            (
                LinearColor::new(hi * c.r, hi * c.g, lo * mid_left.b),
                LinearColor::new(lo * mid_right.r, hi * c.g, lo * c.b),
            )
        } else if pos_x < 4.0 / 6.0 {
            (
                LinearColor::new(lo * mid_right.r, hi * c.g, lo * c.b),
                LinearColor::new(lo * right.r, hi * c.g, hi * c.b),
            )
        } else if pos_x < 5.0 / 6.0 {
            (
                LinearColor::new(lo * right.r, hi * c.g, hi * c.b),
                LinearColor::new(lo * right.r, lo * mid_right.g, hi * c.b),
            )
        } else {
            (
                LinearColor::new(lo * right.r, lo * mid_right.g, hi * c.b),
                LinearColor::new(hi * right.r, lo * right.g, hi * c.b),
            )
        };
        // whole-texel fraction, not band-local
        from.lerp(to, pos_x)
    }
}

impl ScreenFilter for LcdGridFilter {
    fn apply(
        &self,
        src: &RgbaImage,
        downsampler: &Downsampler,
        lut: &LinearizationTable,
    ) -> RgbaImage {
        let buff = downsampler.decimate_linear(src, Frame::source(src), lut);
        let sampler = Sampler::new(&buff);

        let scale = self.scale.get();
        let (out_w, out_h) = (buff.width() * scale, buff.height() * scale);
        let out_texel = (1.0 / out_w as f64, 1.0 / out_h as f64);

        tracing::trace!(
            algorithm = self.algorithm.name(),
            out_w,
            out_h,
            "Rendering LCD grid"
        );

        RgbaImage::from_fn(out_w, out_h, |x, y| {
            let u = out_texel.0 * (x as f64 + 0.5);
            let v = out_texel.1 * (y as f64 + 0.5);

            let p = match self.algorithm {
                GridAlgorithm::Smear => self.smear(&sampler, u, v, out_texel),
                GridAlgorithm::Subpixel => self.subpixel(&sampler, u, v),
                GridAlgorithm::None => sampler.point(u, v),
            };

            // the smear integral can overshoot
            let p = self.profile.color_correct(p.clamp01());
            p.to_gamma().to_rgba8()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(algorithm: GridAlgorithm, scale: u32) -> LcdGridFilter {
        LcdGridFilter::new(
            DisplayProfile::NEUTRAL,
            algorithm,
            OutputScale::new(scale).unwrap(),
        )
    }

    fn run(f: &LcdGridFilter, src: &RgbaImage) -> RgbaImage {
        f.apply(src, &Downsampler::new(1), &LinearizationTable::new())
    }

    fn solid(width: usize, height: usize, v: [u8; 3]) -> RgbaImage {
        RgbaImage::from_fn(width, height, |_, _| [v[0], v[1], v[2], 255])
    }

    #[test]
    fn test_int_smear_full_coverage() {
        // a window covering the whole kernel integrates to d * (P(1) - P(-1)) / dx
        let full = int_smear(0.0, 4.0, 1.5, &SMEAR_COEFFS_X);
        let expected = 1.5 * 2.0 * smear_poly(1.0, &SMEAR_COEFFS_X) / 4.0;
        assert!((full - expected).abs() < 1e-12);

        // far outside the kernel there is nothing to integrate
        assert_eq!(int_smear(10.0, 1.0, 1.5, &SMEAR_COEFFS_X), 0.0);
    }

    #[test]
    fn test_smear_poly_is_odd() {
        for z in [0.1, 0.5, 0.9] {
            let a = smear_poly(z, &SMEAR_COEFFS_Y);
            let b = smear_poly(-z, &SMEAR_COEFFS_Y);
            assert!((a + b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_output_dimensions_follow_scale() {
        let src = solid(4, 3, [10, 20, 30]);
        for alg in [GridAlgorithm::Subpixel, GridAlgorithm::Smear, GridAlgorithm::None] {
            let out = run(&filter(alg, 3), &src);
            assert_eq!((out.width(), out.height()), (12, 9));
        }
    }

    #[test]
    fn test_no_grid_neutral_profile_is_nearest_neighbour() {
        let src = RgbaImage::from_fn(2, 2, |x, y| {
            let v = (x * 100 + y * 50) as u8;
            [v, v, v, 255]
        });
        let out = run(&filter(GridAlgorithm::None, 2), &src);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(x, y), src.pixel(x / 2, y / 2));
            }
        }
    }

    #[test]
    fn test_black_stays_black() {
        let src = solid(3, 3, [0, 0, 0]);
        for alg in [GridAlgorithm::Subpixel, GridAlgorithm::Smear, GridAlgorithm::None] {
            let f = LcdGridFilter::new(DisplayProfile::GBA, alg, OutputScale::new(4).unwrap());
            let out = run(&f, &src);
            assert!(out
                .as_raw()
                .chunks_exact(4)
                .all(|px| px == [0, 0, 0, 255]));
        }
    }

    #[test]
    fn test_white_stays_in_range_and_shows_stripes() {
        let src = solid(3, 3, [255, 255, 255]);
        let out = run(&filter(GridAlgorithm::Subpixel, 6), &src);

        // centre texel, middle row: the first band keeps red high and green low
        let first_band = out.pixel(6, 9);
        assert!(first_band[0] > first_band[1]);
        assert!(out.as_raw().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_bgr_swaps_smear_weights() {
        let src = solid(3, 3, [255, 0, 0]);
        let rgb = LcdGridFilter::new(
            DisplayProfile::NEUTRAL,
            GridAlgorithm::Smear,
            OutputScale::new(6).unwrap(),
        );
        let bgr = LcdGridFilter::new(
            DisplayProfile {
                bgr: true,
                ..DisplayProfile::NEUTRAL
            },
            GridAlgorithm::Smear,
            OutputScale::new(6).unwrap(),
        );
        let a = run(&rgb, &src);
        let b = run(&bgr, &src);
        assert_ne!(a, b);
    }

    #[test]
    fn test_edge_texels_clamp_instead_of_darkening() {
        let src = solid(2, 2, [200, 200, 200]);
        let out = run(&filter(GridAlgorithm::None, 4), &src);
        assert_eq!(out.pixel(0, 0), [200, 200, 200, 255]);
        assert_eq!(out.pixel(7, 7), [200, 200, 200, 255]);
    }

    #[test]
    fn test_gbc_subpixel_reference_pixels() {
        let colors = [
            [[255, 255, 255], [200, 40, 40], [0, 0, 0]],
            [[40, 200, 40], [128, 128, 128], [40, 40, 200]],
            [[0, 0, 0], [255, 200, 0], [255, 255, 255]],
        ];
        let src = RgbaImage::from_fn(3, 3, |x, y| {
            let [r, g, b] = colors[y][x];
            [r, g, b, 255]
        });
        let f = LcdGridFilter::new(
            DisplayProfile::GBC,
            GridAlgorithm::Subpixel,
            OutputScale::new(6).unwrap(),
        );
        let out = run(&f, &src);

        for ((x, y), expected) in [
            ((6, 9), [147, 124, 96]),
            ((8, 9), [137, 139, 127]),
            ((10, 9), [70, 121, 131]),
            ((9, 6), [99, 113, 110]),
            ((9, 11), [177, 161, 135]),
            ((3, 3), [211, 241, 235]),
        ] {
            let [r, g, b] = expected;
            assert_eq!(out.pixel(x, y), [r, g, b, 255], "at ({x}, {y})");
        }
    }
}

//! CRT television fed by the console.
//!
//! Horizontal Lanczos-2 reconstruction, three-sample scanline weighting,
//! a green/magenta dot mask and a final curve that undoes the gamma the
//! scanline and mask math bake in. The picture sits inside a black frame;
//! texel reads outside the picture are black.

use std::f64::consts::PI;

use super::options::OutputScale;
use super::ScreenFilter;
use crate::color::{to_byte, LinearColor, LinearizationTable};
use crate::preprocess::{Downsampler, Frame};
use crate::raster::{PixelGrid, RgbaImage};

const SCANLINE_WEIGHT: f64 = 0.3;
const LUM: f64 = 0.0;
const DOT_MASK: f64 = 0.2;
const LANCZOS_SIZE: isize = 2;

/// Exponent blending the two halves of [`inv_gamma`].
pub const PWR: f64 =
    1.0 / ((-0.7 * (1.0 - SCANLINE_WEIGHT) + 1.0) * (-0.5 * DOT_MASK + 1.0)) - 1.25;

/// Lanczos-2 weight for a distance in source texels, 1 at the origin.
#[inline]
pub fn lanczos2(d: f64) -> f64 {
    if d == 0.0 {
        return 1.0;
    }
    let a = LANCZOS_SIZE as f64;
    (a * (PI * d).sin() * (PI * (d / a)).sin()) / (PI * PI * d * d)
}

/// Beam profile of one scanline at vertical `distance`, widened by brightness.
#[inline]
pub fn scanline_weights(distance: f64, color: LinearColor) -> LinearColor {
    let wid = color.pow4() * 2.0 + 2.0;
    let weights = LinearColor::splat(distance / SCANLINE_WEIGHT);
    let falloff = ((wid * 0.5).powf(-0.5) * weights).pow(wid) * -1.0;
    falloff.exp() * (LUM + 1.4) / (wid * 0.2 + 0.6)
}

/// Compensate for the gamma embedded by the scanline and mask weighting.
#[inline]
pub fn inv_gamma(c: LinearColor) -> LinearColor {
    let cir = c - 1.0;
    let cir = cir * cir;
    c.sqrt().lerp((LinearColor::WHITE - cir).sqrt(), PWR)
}

/// Horizontal Lanczos taps for one output column.
#[derive(Debug, Clone, Copy)]
struct ColumnTaps {
    /// Texel left of the sample position.
    xx: isize,
    /// Fractional position between `xx` and `xx + 1`.
    uv_x: f64,
    weights: [f64; 5],
}

/// CRT filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CrtFilter {
    scale: OutputScale,
}

impl CrtFilter {
    pub fn new(scale: OutputScale) -> Self {
        Self { scale }
    }

    /// Tap weights depend only on the output column, so they are computed
    /// once per column instead of once per pixel.
    fn column_taps(src_width: usize, out_width: usize) -> Vec<ColumnTaps> {
        let src_w = src_width as f64;
        let out_texel = 1.0 / out_width as f64;
        let src_texel = 1.0 / src_w;

        (0..out_width)
            .map(|x| {
                let u = out_texel * (x as f64 + 0.5);
                let ratio = u * src_w - 0.5;
                let xx = ratio.floor();

                // distances use the uncentred output coordinate
                let out_u = x as f64 * out_texel;
                let src_u = xx * src_texel;
                let mut weights = [0.0; 5];
                for (i, lx) in (-LANCZOS_SIZE..=LANCZOS_SIZE).enumerate() {
                    let sample_u = src_u + lx as f64 * src_texel;
                    let d = ((sample_u - out_u) * src_w)
                        .clamp(-LANCZOS_SIZE as f64, LANCZOS_SIZE as f64);
                    weights[i] = lanczos2(d);
                }

                ColumnTaps {
                    xx: xx as isize,
                    uv_x: ratio - xx,
                    weights,
                }
            })
            .collect()
    }

    fn pixel(
        buff: &PixelGrid<LinearColor>,
        taps: &ColumnTaps,
        yy: isize,
        uv_y: f64,
        filter: f64,
    ) -> LinearColor {
        let mut col = LinearColor::BLACK;
        let mut col2 = LinearColor::BLACK;
        for (i, lx) in (-LANCZOS_SIZE..=LANCZOS_SIZE).enumerate() {
            let w = taps.weights[i];
            col += buff.get_checked(taps.xx + lx, yy) * w;
            col2 += buff.get_checked(taps.xx + lx, yy + 1) * w;
        }
        let col = col.clamp01();
        let col2 = col2.clamp01();

        // three beam samples: at the scan position and a third of an
        // output line above and below it
        let mut uv = uv_y;
        let mut weights = scanline_weights(uv, col);
        let mut weights2 = scanline_weights(1.0 - uv, col2);
        uv += 1.0 / 3.0 * filter;

        weights = (weights + scanline_weights(uv, col)) / 3.0;
        weights2 = (weights2 + scanline_weights((1.0 - uv).abs(), col2)) / 3.0;
        uv -= 2.0 / 3.0 * filter;

        weights += scanline_weights(uv.abs(), col) / 3.0;
        weights2 += scanline_weights((1.0 - uv).abs(), col2) / 3.0;

        let res = col * weights + col2 * weights2;

        let green = 1.0 - (taps.uv_x * 2.0 - 1.0).abs();
        let mask = LinearColor::new(1.0, 1.0 - DOT_MASK, 1.0)
            .lerp(LinearColor::new(1.0 - DOT_MASK, 1.0, 1.0 - DOT_MASK), green);
        let res = (res * mask).clamp01();

        inv_gamma(res).clamp01()
    }
}

impl ScreenFilter for CrtFilter {
    fn apply(
        &self,
        src: &RgbaImage,
        downsampler: &Downsampler,
        lut: &LinearizationTable,
    ) -> RgbaImage {
        let frame = Frame::crt(src, downsampler.stride());
        let buff = downsampler.decimate_linear(src, frame, lut);

        let scale = self.scale.get();
        let (out_w, out_h) = (buff.width() * scale, buff.height() * scale);
        let src_h = buff.height() as f64;
        let out_texel_y = 1.0 / out_h as f64;
        let filter = 1.0 / scale as f64;

        tracing::trace!(?frame, out_w, out_h, "Rendering CRT");

        let taps = Self::column_taps(buff.width(), out_w);
        let mut out = RgbaImage::new(out_w, out_h);

        for y in 0..out_h {
            // uncentred in Y so the dark gap falls between output rows
            let v = out_texel_y * y as f64;
            let ratio = v * src_h - 0.5;
            let yy = ratio.floor();
            let uv_y = ratio - yy;

            for (x, column) in taps.iter().enumerate() {
                let p = Self::pixel(&buff, column, yy as isize, uv_y, filter);
                out.put_pixel(x, y, [to_byte(p.r), to_byte(p.g), to_byte(p.b), 255]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, v: u8) -> RgbaImage {
        RgbaImage::from_fn(width, height, |_, _| [v, v, v, 255])
    }

    fn run(scale: u32, src: &RgbaImage) -> RgbaImage {
        CrtFilter::new(OutputScale::new(scale).unwrap()).apply(
            src,
            &Downsampler::new(1),
            &LinearizationTable::new(),
        )
    }

    #[test]
    fn test_lanczos_unit_at_origin_and_zero_at_integers() {
        assert_eq!(lanczos2(0.0), 1.0);
        for d in [-2.0, -1.0, 1.0, 2.0] {
            assert!(lanczos2(d).abs() < 1e-15, "lanczos2({d}) = {}", lanczos2(d));
        }
        assert!((lanczos2(0.5) - lanczos2(-0.5)).abs() < 1e-15);
    }

    #[test]
    fn test_lanczos_reconstructs_flat_field() {
        // taps at integer spacing around a fractional offset sum to ~1
        for offset in [0.0, 0.1, 0.25, 0.5, 0.8] {
            let sum: f64 = (-2..=2)
                .map(|i| lanczos2((i as f64 - offset).clamp(-2.0, 2.0)))
                .sum();
            assert!((sum - 1.0).abs() < 0.03, "offset {offset}: {sum}");
        }
    }

    #[test]
    fn test_column_taps_match_direct_evaluation() {
        let taps = CrtFilter::column_taps(10, 30);
        let t = &taps[7];
        let out_u = 7.0 / 30.0;
        for (i, lx) in (-2..=2).enumerate() {
            let d = (((t.xx + lx) as f64 / 10.0 - out_u) * 10.0).clamp(-2.0, 2.0);
            assert!((t.weights[i] - lanczos2(d)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_inv_gamma_fixed_points() {
        assert_eq!(inv_gamma(LinearColor::BLACK), LinearColor::BLACK);
        let one = inv_gamma(LinearColor::WHITE);
        assert!((one.r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scanline_weight_falls_off_with_distance() {
        let c = LinearColor::splat(0.5);
        let near = scanline_weights(0.0, c);
        let far = scanline_weights(0.5, c);
        assert!(near.g > far.g);
        assert!(far.g > 0.0);
    }

    #[test]
    fn test_output_covers_frame() {
        let out = run(2, &solid(20, 10, 255));
        // 4 texel margin per side
        assert_eq!(out.width(), (20 + 8) * 2);
        assert_eq!(out.height(), (10 + 8) * 2);
    }

    #[test]
    fn test_margin_is_black_for_white_source() {
        let out = run(3, &solid(16, 12, 255));
        for (x, y) in [(0, 0), (5, 5), (out.width() - 1, out.height() - 1), (0, out.height() / 2)] {
            assert_eq!(out.pixel(x, y), [0, 0, 0, 255], "at ({x}, {y})");
        }
        // the picture itself is lit
        let centre = out.pixel(out.width() / 2, out.height() / 2 + 1);
        assert!(centre[1] > 0);
    }

    #[test]
    fn test_black_source_is_black() {
        let out = run(2, &solid(8, 8, 0));
        assert!(out.as_raw().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn test_short_frames_are_centred_in_240_rows() {
        let out = run(1, &solid(4, 230, 255));
        assert_eq!(out.height(), 240 + 8);
        // 5 synthesized rows + 4 margin rows above the picture
        assert_eq!(out.pixel(2, 3), [0, 0, 0, 255]);
    }

    #[test]
    fn test_reference_pixels() {
        let colors = [
            [[255, 255, 255], [200, 40, 40], [0, 0, 0], [40, 200, 40]],
            [[40, 40, 200], [128, 128, 128], [255, 200, 0], [0, 0, 0]],
            [[0, 0, 0], [255, 255, 255], [90, 160, 220], [255, 0, 255]],
            [[30, 30, 30], [220, 220, 220], [0, 255, 0], [255, 255, 255]],
        ];
        let src = RgbaImage::from_fn(4, 4, |x, y| {
            let [r, g, b] = colors[y][x];
            [r, g, b, 255]
        });
        let out = run(2, &src);

        for ((x, y), expected) in [
            ((8, 8), [166, 166, 166]),
            ((9, 9), [252, 232, 232]),
            ((12, 12), [170, 130, 120]),
            ((13, 14), [140, 171, 175]),
            ((14, 10), [20, 104, 20]),
            ((16, 13), [0, 0, 0]),
        ] {
            let [r, g, b] = expected;
            assert_eq!(out.pixel(x, y), [r, g, b, 255], "at ({x}, {y})");
        }
    }
}

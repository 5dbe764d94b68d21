//! Source-to-device decimation.
//!
//! Screenshots arrive at an integer multiple of the console resolution. The
//! filters work at device resolution, so the source is reduced by picking
//! one pixel per `stride x stride` block (no averaging). The CRT filter also
//! samples through a [`Frame`] that extends past the source with black.

use crate::color::{LinearColor, LinearizationTable};
use crate::raster::{PixelGrid, RgbaImage};

/// Fixed margin added around the picture by the CRT filter, in device pixels.
pub const CRT_FRAME_MARGIN: usize = 4;

/// Rectangle in source pixel coordinates that the decimation walks over.
///
/// `left`/`top` shift the source inside the frame; positions outside the
/// source read as a zeroed (transparent black) pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl Frame {
    /// The source itself, no margin.
    pub fn source(src: &RgbaImage) -> Self {
        Self {
            left: 0,
            top: 0,
            width: src.width(),
            height: src.height(),
        }
    }

    /// CRT frame: a 224..240 row picture is centred in a 240 row field, then
    /// [`CRT_FRAME_MARGIN`] device pixels are added on every side.
    pub fn crt(src: &RgbaImage, stride: usize) -> Self {
        let mut height = src.height();
        let mut top = 0;

        if (224..240).contains(&height) {
            top = (240 - height) / 2;
            height = 240;
        }

        let margin = CRT_FRAME_MARGIN * stride;
        Self {
            left: margin,
            top: top + margin,
            width: src.width() + margin * 2,
            height: height + margin * 2,
        }
    }
}

/// Integer-stride decimation from source to device resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downsampler {
    stride: usize,
}

impl Downsampler {
    /// A stride of 0 is treated as 1.
    pub fn new(stride: usize) -> Self {
        Self {
            stride: stride.max(1),
        }
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// `ceil(width / stride) x ceil(height / stride)`
    pub fn target_size(&self, width: usize, height: usize) -> (usize, usize) {
        (width.div_ceil(self.stride), height.div_ceil(self.stride))
    }

    /// Decimate `frame` of `src`, mapping every sampled pixel through `map`.
    pub fn decimate<T: Copy + Default>(
        &self,
        src: &RgbaImage,
        frame: Frame,
        mut map: impl FnMut([u8; 4]) -> T,
    ) -> PixelGrid<T> {
        let (width, height) = self.target_size(frame.width, frame.height);
        let outside = map([0; 4]);

        PixelGrid::from_fn(width, height, |tx, ty| {
            let sx = (tx * self.stride).checked_sub(frame.left);
            let sy = (ty * self.stride).checked_sub(frame.top);
            match (sx, sy) {
                (Some(sx), Some(sy)) if sx < src.width() && sy < src.height() => {
                    map(src.pixel(sx, sy))
                }
                _ => outside,
            }
        })
    }

    /// Decimate and linearize in one pass.
    pub fn decimate_linear(
        &self,
        src: &RgbaImage,
        frame: Frame,
        lut: &LinearizationTable,
    ) -> PixelGrid<LinearColor> {
        self.decimate(src, frame, |px| lut.load_rgba(px))
    }
}

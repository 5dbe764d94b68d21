//! 8-bit RGBA image exchanged with callers.

use crate::api::EmulateError;

/// Straight-alpha RGBA8 pixels in row-major order.
///
/// This is the only image type crossing the crate boundary: decoded
/// screenshots come in as `RgbaImage` and every filter returns one.
///
/// # Example
///
/// ```
/// use panel_sim::RgbaImage;
///
/// let img = RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
/// assert_eq!(img.pixel(1, 0), [0, 0, 255, 255]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl RgbaImage {
    /// Fully transparent black image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0; width * height * 4],
            width,
            height,
        }
    }

    /// Wrap an existing buffer, checking its length against the dimensions.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, EmulateError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(EmulateError::InvalidImage {
                width,
                height,
                expected: usize::MAX,
                actual: data.len(),
            })?;
        if data.len() != expected {
            return Err(EmulateError::InvalidImage {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Image whose pixel `(x, y)` is `f(x, y)`, evaluated in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, px: [u8; 4]) {
        let i = (y * self.width + x) * 4;
        self.data[i..i + 4].copy_from_slice(&px);
    }

    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

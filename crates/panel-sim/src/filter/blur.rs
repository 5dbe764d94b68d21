//! Separable blur and bilinear rescaling on single-channel opacity grids.
//!
//! Every pass reads one buffer and writes the other; [`PingPong`] owns both
//! and swaps their roles after each pass, so a pass never reads what it is
//! writing. All reads outside the grid are zero.

use std::mem;

use crate::raster::PixelGrid;

/// Symmetric 1D kernel stored as its left half plus the centre tap.
///
/// `half[0]` is the outermost weight and `half[N - 1]` the centre, giving a
/// radius of `N - 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetricKernel<const N: usize> {
    half: [f32; N],
}

impl<const N: usize> SymmetricKernel<N> {
    pub const fn new(half: [f32; N]) -> Self {
        Self { half }
    }

    #[inline]
    pub const fn radius(&self) -> isize {
        N as isize - 1
    }

    #[inline]
    fn weight(&self, offset: isize) -> f32 {
        self.half[N - 1 - offset.unsigned_abs()]
    }
}

/// 3-tap edge smear for LCD pixel borders.
pub const SMEAR_KERNEL: SymmetricKernel<2> = SymmetricKernel::new([0.1, 0.8]);

/// 7-tap Gaussian for the drop shadow, applied at half resolution.
pub const SHADOW_KERNEL: SymmetricKernel<4> = SymmetricKernel::new([0.006, 0.061, 0.241, 0.383]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A pair of equally sized buffers with swappable roles.
#[derive(Debug, Clone)]
pub struct PingPong {
    current: PixelGrid<f32>,
    scratch: PixelGrid<f32>,
}

impl PingPong {
    /// Take ownership of `current` and allocate a matching scratch buffer.
    pub fn new(current: PixelGrid<f32>) -> Self {
        let scratch = PixelGrid::new(current.width(), current.height());
        Self { current, scratch }
    }

    #[inline]
    pub fn current(&self) -> &PixelGrid<f32> {
        &self.current
    }

    /// One 1D pass from `current` into `scratch`, then swap.
    pub fn pass<const N: usize>(&mut self, kernel: &SymmetricKernel<N>, axis: Axis) {
        let src = &self.current;
        let dst = &mut self.scratch;
        let r = kernel.radius();

        for y in 0..src.height() {
            for x in 0..src.width() {
                let (xi, yi) = (x as isize, y as isize);
                let mut g = 0.0f32;
                for i in -r..=r {
                    let sample = match axis {
                        Axis::Horizontal => src.get_checked(xi + i, yi),
                        Axis::Vertical => src.get_checked(xi, yi + i),
                    };
                    g += sample * kernel.weight(i);
                }
                dst.set(x, y, g);
            }
        }

        mem::swap(&mut self.current, &mut self.scratch);
    }

    /// Horizontal pass followed by a vertical pass.
    pub fn separable<const N: usize>(&mut self, kernel: &SymmetricKernel<N>) {
        self.pass(kernel, Axis::Horizontal);
        self.pass(kernel, Axis::Vertical);
    }

    /// Give back the buffer holding the latest result.
    pub fn into_current(self) -> PixelGrid<f32> {
        self.current
    }
}

/// Bilinear resample of `from` into `to`'s dimensions.
///
/// Source positions are `x * from_width / to_width` (no half-pixel
/// centring), and the right/bottom neighbours fall off the grid as zero.
pub fn bilinear_scale(from: &PixelGrid<f32>, to: &mut PixelGrid<f32>) {
    let x_ratio = from.width() as f32 / to.width() as f32;
    let y_ratio = from.height() as f32 / to.height() as f32;

    for y in 0..to.height() {
        for x in 0..to.width() {
            let mut xf = x as f32 * x_ratio;
            let mut yf = y as f32 * y_ratio;
            let xi = xf as isize;
            let yi = yf as isize;
            xf -= xi as f32;
            yf -= yi as f32;

            let v = (1.0 - xf) * (1.0 - yf) * from.get_checked(xi, yi)
                + xf * (1.0 - yf) * from.get_checked(xi + 1, yi)
                + (1.0 - xf) * yf * from.get_checked(xi, yi + 1)
                + xf * yf * from.get_checked(xi + 1, yi + 1);
            to.set(x, y, v);
        }
    }
}

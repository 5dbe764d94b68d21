//! Row-major pixel buffer with explicit out-of-bounds policies.

/// Fixed-size, row-major 2D buffer.
///
/// Holds [`LinearColor`](crate::LinearColor) for the colour filters and
/// `f32` opacity for the monochrome path. Reads take signed coordinates so
/// filter kernels can address neighbours without branching at the edges;
/// the caller picks the policy per read: [`get_checked`](Self::get_checked)
/// returns `T::default()` (black, transparent) outside the grid and
/// [`get_clamped`](Self::get_clamped) repeats the nearest edge pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Copy + Default> PixelGrid<T> {
    /// Grid filled with `T::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![T::default(); width * height],
            width,
            height,
        }
    }

    /// Grid whose pixel `(x, y)` is `f(x, y)`, evaluated in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
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
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// In-bounds read. Panics outside the grid like slice indexing.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    /// Read returning `T::default()` outside the grid.
    #[inline]
    pub fn get_checked(&self, x: isize, y: isize) -> T {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return T::default();
        }
        self.data[y as usize * self.width + x as usize]
    }

    /// Read with coordinates clamped to the nearest edge pixel.
    ///
    /// The grid must not be empty.
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> T {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.data[y * self.width + x] = value;
    }
}

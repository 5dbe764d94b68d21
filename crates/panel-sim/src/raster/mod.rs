//! Pixel containers.
//!
//! [`RgbaImage`] is the 8-bit image callers hand in and get back.
//! [`PixelGrid`] is the working buffer the filters read and write in
//! between, with an explicit out-of-bounds policy per read.

mod grid;
mod rgba_image;

pub use grid::PixelGrid;
pub use rgba_image::RgbaImage;

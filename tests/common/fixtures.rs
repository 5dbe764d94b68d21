//! Test fixtures and constants.

use panel_sim::RgbaImage;
use pocketshot::rendering::encode_png;

/// Native screen sizes
pub mod sizes {
    pub const GBA: (usize, usize) = (240, 160);
    pub const GB: (usize, usize) = (160, 144);
}

/// Opaque image filled with one colour
pub fn solid(width: usize, height: usize, rgb: [u8; 3]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, _| [rgb[0], rgb[1], rgb[2], 255])
}

/// Horizontal grey ramp, the usual smoke test for tone handling
pub fn gradient(width: usize, height: usize) -> RgbaImage {
    let last = width.saturating_sub(1).max(1);
    RgbaImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / last) as u8;
        [v, v, v, 255]
    })
}

/// Black/white checkerboard of single pixels
pub fn checkerboard(width: usize, height: usize) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            [0, 0, 0, 255]
        } else {
            [255, 255, 255, 255]
        }
    })
}

/// Nearest-neighbour upscale, like an emulator exporting at `factor`x
pub fn integer_upscale(src: &RgbaImage, factor: usize) -> RgbaImage {
    RgbaImage::from_fn(src.width() * factor, src.height() * factor, |x, y| {
        src.pixel(x / factor, y / factor)
    })
}

/// PNG bytes of `image`
pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    encode_png(image, false).expect("fixture encodes")
}

/// Write `image` as PNG into `dir` and return the path
pub fn write_png(dir: &std::path::Path, name: &str, image: &RgbaImage) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(image)).expect("fixture written");
    path
}

/// A config exercising every section
pub const SAMPLE_CONFIG: &str = r##"
mode: gba
grid: smear
scale: 2
palettes:
  mint:
    foreground: "#0f380f"
    background: "#9bbc0f"
    opacity: 90
profiles:
  dim:
    lum: 0.8
    gamma: 2.2
"##;

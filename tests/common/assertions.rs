//! Assertion helpers for tests.

use panel_sim::RgbaImage;
use pocketshot::rendering::decode_png;
use pretty_assertions::assert_eq;

/// Assert bytes carry the PNG signature and decode
pub fn assert_png(bytes: &[u8]) -> RgbaImage {
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    decode_png(bytes).expect("output decodes")
}

/// Assert the image has the given size
pub fn assert_size(image: &RgbaImage, width: usize, height: usize) {
    assert_eq!(
        (image.width(), image.height()),
        (width, height),
        "Unexpected output size"
    );
}

/// Assert every pixel is fully opaque
pub fn assert_opaque(image: &RgbaImage) {
    let transparent = image
        .as_raw()
        .chunks_exact(4)
        .filter(|px| px[3] != 255)
        .count();
    assert_eq!(transparent, 0, "Expected an opaque image");
}

/// Assert a pixel value with its coordinates in the message
pub fn assert_pixel(image: &RgbaImage, x: usize, y: usize, expected: [u8; 4]) {
    assert_eq!(image.pixel(x, y), expected, "Pixel at ({x}, {y})");
}

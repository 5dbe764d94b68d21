use panel_sim::RgbaImage;
use std::io::Cursor;

use crate::error::ConvertError;

/// Decode a PNG into 8-bit RGBA.
///
/// Palette, grayscale and 16-bit images are expanded so the emulator always
/// sees four 8-bit channels. Alpha is kept; it is applied when the pixels
/// are linearized.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, ConvertError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| ConvertError::Decode(e.to_string()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ConvertError::Decode(e.to_string()))?;

    let (width, height) = (info.width as usize, info.height as usize);
    let expand: fn(&[u8]) -> [u8; 4] = match info.color_type {
        png::ColorType::Grayscale => |p| [p[0], p[0], p[0], 255],
        png::ColorType::GrayscaleAlpha => |p| [p[0], p[0], p[0], p[1]],
        png::ColorType::Rgb => |p| [p[0], p[1], p[2], 255],
        png::ColorType::Rgba => |p| [p[0], p[1], p[2], p[3]],
        png::ColorType::Indexed => {
            return Err(ConvertError::Decode(
                "palette image was not expanded".to_string(),
            ))
        }
    };
    let channels = info.color_type.samples();

    let mut rgba = Vec::with_capacity(width * height * 4);
    for row in buf[..info.buffer_size()].chunks(info.line_size) {
        for px in row[..width * channels].chunks_exact(channels) {
            rgba.extend_from_slice(&expand(px));
        }
    }

    tracing::debug!(width, height, color_type = ?info.color_type, "Decoded PNG");
    Ok(RgbaImage::from_raw(width, height, rgba)?)
}

/// Encode an RGBA image as PNG.
///
/// With `optimize`, the fast encoding is recompressed through oxipng; if
/// that fails the fast encoding is returned unchanged.
pub fn encode_png(image: &RgbaImage, optimize: bool) -> Result<Vec<u8>, ConvertError> {
    let width = u32::try_from(image.width())
        .map_err(|_| ConvertError::Encode(format!("width {} out of range", image.width())))?;
    let height = u32::try_from(image.height())
        .map_err(|_| ConvertError::Encode(format!("height {} out of range", image.height())))?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ConvertError::Encode(e.to_string()))?;
        writer
            .write_image_data(image.as_raw())
            .map_err(|e| ConvertError::Encode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    if !optimize {
        return Ok(png_bytes);
    }

    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => {
            tracing::debug!(
                before = png_bytes.len(),
                after = optimized.len(),
                "Recompressed PNG"
            );
            Ok(optimized)
        }
        Err(e) => {
            tracing::warn!(%e, "PNG recompression failed, keeping fast encoding");
            Ok(png_bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode_raw(
        width: u32,
        height: u32,
        color: png::ColorType,
        depth: png::BitDepth,
        data: &[u8],
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buf
    }

    #[test]
    fn test_round_trip_rgba() {
        let image = RgbaImage::from_fn(3, 2, |x, y| [x as u8 * 80, y as u8 * 100, 7, 200]);
        let bytes = encode_png(&image, false).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(decode_png(&bytes).unwrap(), image);
    }

    #[test]
    fn test_decode_grayscale_expands() {
        let bytes = encode_raw(2, 1, png::ColorType::Grayscale, png::BitDepth::Eight, &[10, 250]);
        let image = decode_png(&bytes).unwrap();
        assert_eq!(image.pixel(0, 0), [10, 10, 10, 255]);
        assert_eq!(image.pixel(1, 0), [250, 250, 250, 255]);
    }

    #[test]
    fn test_decode_rgb_adds_opaque_alpha() {
        let bytes = encode_raw(1, 1, png::ColorType::Rgb, png::BitDepth::Eight, &[1, 2, 3]);
        assert_eq!(decode_png(&bytes).unwrap().pixel(0, 0), [1, 2, 3, 255]);
    }

    #[test]
    fn test_decode_16_bit_strips_low_byte() {
        let bytes = encode_raw(
            1,
            1,
            png::ColorType::Rgb,
            png::BitDepth::Sixteen,
            &[0x12, 0x34, 0xab, 0xcd, 0xff, 0x00],
        );
        assert_eq!(decode_png(&bytes).unwrap().pixel(0, 0), [0x12, 0xab, 0xff, 255]);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = decode_png(b"definitely not a png").unwrap_err();
        assert!(matches!(err, ConvertError::Decode(_)));
    }

    #[test]
    fn test_optimized_output_decodes_identically() {
        let image = RgbaImage::from_fn(16, 16, |x, y| [(x * 16) as u8, (y * 16) as u8, 0, 255]);
        let bytes = encode_png(&image, true).unwrap();
        assert_eq!(decode_png(&bytes).unwrap(), image);
    }
}

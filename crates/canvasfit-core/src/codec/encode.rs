//! Encoding for export.
//!
//! JPEG has no alpha channel, so the alpha samples are dropped before
//! encoding. PNG and GIF keep the full RGBA data.

use std::io::Cursor;

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::ImageError;

/// Encode to JPEG.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses
/// * 60-80: Medium quality, acceptable for web
/// * Below 60: Low quality, visible artifacts
///
/// Out-of-range values are clamped to 1-100.
pub fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> Result<Vec<u8>, ImageError> {
    check(buffer)?;

    let quality = quality.clamp(1, 100);
    let rgb = buffer.to_rgb_bytes();
    let mut out = Cursor::new(Vec::new());

    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(&rgb, buffer.width, buffer.height, ExtendedColorType::Rgb8)
        .map_err(|e| ImageError::Encoding(e.to_string()))?;

    Ok(out.into_inner())
}

/// Encode to PNG with a compression level of 0-9.
///
/// The encoder only offers three levels, so the range is bucketed:
/// 0-2 fast, 3-6 default, 7-9 (and above) best.
pub fn encode_png(buffer: &PixelBuffer, compression: u8) -> Result<Vec<u8>, ImageError> {
    check(buffer)?;

    let mut out = Vec::new();
    PngEncoder::new_with_quality(&mut out, compression_type(compression), FilterType::Adaptive)
        .write_image(
            &buffer.pixels,
            buffer.width,
            buffer.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ImageError::Encoding(e.to_string()))?;

    Ok(out)
}

/// Encode a single-frame GIF.
pub fn encode_gif(buffer: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
    check(buffer)?;

    let mut out = Vec::new();
    {
        // The trailer is written when the encoder drops
        let mut encoder = GifEncoder::new(&mut out);
        encoder
            .encode(
                &buffer.pixels,
                buffer.width,
                buffer.height,
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| ImageError::Encoding(e.to_string()))?;
    }

    Ok(out)
}

fn compression_type(level: u8) -> CompressionType {
    match level {
        0..=2 => CompressionType::Fast,
        3..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

fn check(buffer: &PixelBuffer) -> Result<(), ImageError> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(ImageError::InvalidDimensions(format!(
            "cannot encode {}x{} image",
            buffer.width, buffer.height
        )));
    }

    let expected = buffer.pixel_count() * CHANNELS;
    if buffer.pixels.len() != expected {
        return Err(ImageError::Encoding(format!(
            "expected {expected} bytes (width * height * 4), got {}",
            buffer.pixels.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::new(width, height, vec![128u8; (width * height * 4) as usize])
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let jpeg = encode_jpeg(&gray(100, 100), 90).unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let img = gray(10, 10);
        assert!(encode_jpeg(&img, 0).is_ok());
        assert!(encode_jpeg(&img, 255).is_ok());
    }

    #[test]
    fn test_encode_png_signature() {
        let png = encode_png(&gray(16, 8), 9).unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_encode_png_every_level() {
        let img = gray(16, 16);
        for level in 0..=9 {
            assert!(encode_png(&img, level).is_ok(), "level {level}");
        }
    }

    #[test]
    fn test_compression_buckets() {
        assert!(matches!(compression_type(0), CompressionType::Fast));
        assert!(matches!(compression_type(2), CompressionType::Fast));
        assert!(matches!(compression_type(3), CompressionType::Default));
        assert!(matches!(compression_type(6), CompressionType::Default));
        assert!(matches!(compression_type(7), CompressionType::Best));
        assert!(matches!(compression_type(200), CompressionType::Best));
    }

    #[test]
    fn test_encode_gif_signature_and_trailer() {
        let gif = encode_gif(&gray(4, 4)).unwrap();
        assert_eq!(&gif[0..3], b"GIF");
        assert_eq!(gif[gif.len() - 1], 0x3B);
    }

    #[test]
    fn test_encode_rejects_mismatched_buffer() {
        let img = PixelBuffer {
            width: 10,
            height: 10,
            pixels: vec![0; 10],
            alpha_blending: false,
        };
        assert!(matches!(encode_png(&img, 9), Err(ImageError::Encoding(_))));
        assert!(matches!(encode_jpeg(&img, 90), Err(ImageError::Encoding(_))));
    }

    #[test]
    fn test_encode_rejects_zero_size() {
        let img = PixelBuffer {
            width: 0,
            height: 10,
            pixels: vec![],
            alpha_blending: false,
        };
        assert!(matches!(
            encode_gif(&img),
            Err(ImageError::InvalidDimensions(_))
        ));
    }
}

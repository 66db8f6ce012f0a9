//! Image byte-stream codecs.
//!
//! The [`Codec`] trait is the seam between the container and actual image
//! formats. [`ImageCodec`] is the default implementation on top of the
//! `image` crate and handles the three supported formats:
//!
//! | Format | MIME | Extension | Quality parameter |
//! |---|---|---|---|
//! | JPEG | `image/jpeg` | `jpg` | 1-100, default 90 |
//! | PNG | `image/png` | `png` | compression 0-9, default 9 |
//! | GIF | `image/gif` | `gif` | ignored |
//!
//! Anything else is detected as [`ImageFormat::Other`] and refused.

mod decode;
mod encode;

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::error::ImageError;

pub use decode::{decode, read_orientation, Orientation};
pub use encode::{encode_gif, encode_jpeg, encode_png};

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Default PNG compression level.
pub const DEFAULT_PNG_COMPRESSION: u8 = 9;

/// Detected container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    /// Recognised or not, but not one we encode.
    Other,
}

impl ImageFormat {
    /// Whether this format can be decoded and encoded.
    pub fn is_supported(self) -> bool {
        !matches!(self, ImageFormat::Other)
    }

    /// MIME type. Unsupported formats report JPEG, the output fallback.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Jpeg | ImageFormat::Other => "image/jpeg",
        }
    }

    /// File extension without the dot, JPEG for unsupported formats.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Jpeg | ImageFormat::Other => "jpg",
        }
    }

    /// The format used when writing an image whose source was `self`.
    pub fn output(self) -> ImageFormat {
        match self {
            ImageFormat::Other => ImageFormat::Jpeg,
            supported => supported,
        }
    }

    /// Default quality parameter for the encoder.
    pub fn default_quality(self) -> u8 {
        match self {
            ImageFormat::Png => DEFAULT_PNG_COMPRESSION,
            ImageFormat::Gif => 0,
            ImageFormat::Jpeg | ImageFormat::Other => DEFAULT_JPEG_QUALITY,
        }
    }
}

impl From<image::ImageFormat> for ImageFormat {
    fn from(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Jpeg => ImageFormat::Jpeg,
            image::ImageFormat::Png => ImageFormat::Png,
            image::ImageFormat::Gif => ImageFormat::Gif,
            _ => ImageFormat::Other,
        }
    }
}

/// Detect the format from magic bytes.
pub fn detect_format(bytes: &[u8]) -> ImageFormat {
    image::guess_format(bytes)
        .map(ImageFormat::from)
        .unwrap_or(ImageFormat::Other)
}

/// Decode and encode image byte streams.
pub trait Codec {
    /// Identify the format of `bytes`.
    fn detect_format(&self, bytes: &[u8]) -> ImageFormat;

    /// Decode `bytes` into an RGBA buffer.
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, ImageError>;

    /// Encode `buffer` as `format`. `quality` is format-specific.
    fn encode(
        &self,
        buffer: &PixelBuffer,
        format: ImageFormat,
        quality: u8,
    ) -> Result<Vec<u8>, ImageError>;

    /// Quality used when the caller does not pass one.
    fn default_quality(&self, format: ImageFormat) -> u8 {
        format.default_quality()
    }
}

/// [`Codec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCodec {
    /// Rotate/flip decoded images according to their EXIF orientation.
    pub apply_orientation: bool,
    pub jpeg_quality: u8,
    pub png_compression: u8,
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self {
            apply_orientation: false,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            png_compression: DEFAULT_PNG_COMPRESSION,
        }
    }
}

impl Codec for ImageCodec {
    fn detect_format(&self, bytes: &[u8]) -> ImageFormat {
        detect_format(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, ImageError> {
        let format = detect_format(bytes);
        if !format.is_supported() {
            return Err(ImageError::UnsupportedFormat(
                "expected JPEG, PNG or GIF data".to_string(),
            ));
        }
        decode(bytes, self.apply_orientation)
    }

    fn encode(
        &self,
        buffer: &PixelBuffer,
        format: ImageFormat,
        quality: u8,
    ) -> Result<Vec<u8>, ImageError> {
        let bytes = match format {
            ImageFormat::Jpeg => encode_jpeg(buffer, quality)?,
            ImageFormat::Png => encode_png(buffer, quality)?,
            ImageFormat::Gif => encode_gif(buffer)?,
            ImageFormat::Other => {
                return Err(ImageError::UnsupportedFormat(
                    "cannot encode to an unsupported format".to_string(),
                ))
            }
        };
        debug!(
            ?format,
            quality,
            width = buffer.width,
            height = buffer.height,
            len = bytes.len(),
            "encoded"
        );
        Ok(bytes)
    }

    fn default_quality(&self, format: ImageFormat) -> u8 {
        match format {
            ImageFormat::Png => self.png_compression,
            ImageFormat::Gif => 0,
            ImageFormat::Jpeg | ImageFormat::Other => self.jpeg_quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        let mut pixels = Vec::with_capacity(8 * 6 * 4);
        for y in 0..6u32 {
            for x in 0..8u32 {
                pixels.extend_from_slice(&[(x * 30) as u8, (y * 40) as u8, 90, 255]);
            }
        }
        PixelBuffer::new(8, 6, pixels)
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::Png.mime_type(), "image/png");
        assert_eq!(ImageFormat::Gif.mime_type(), "image/gif");
        assert_eq!(ImageFormat::Other.mime_type(), "image/jpeg");

        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Gif.extension(), "gif");
        assert_eq!(ImageFormat::Other.extension(), "jpg");

        assert_eq!(ImageFormat::Other.output(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::Gif.output(), ImageFormat::Gif);
    }

    #[test]
    fn test_detect_format_from_magic() {
        assert_eq!(detect_format(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]), ImageFormat::Jpeg);
        assert_eq!(
            detect_format(b"\x89PNG\r\n\x1a\n\0\0\0\0"),
            ImageFormat::Png
        );
        assert_eq!(detect_format(b"GIF89a\0\0"), ImageFormat::Gif);
        assert_eq!(detect_format(b"BM\0\0\0\0\0\0"), ImageFormat::Other);
        assert_eq!(detect_format(b"hello world"), ImageFormat::Other);
        assert_eq!(detect_format(&[]), ImageFormat::Other);
    }

    #[test]
    fn test_codec_roundtrip_png_is_lossless() {
        let codec = ImageCodec::default();
        let img = sample();
        let bytes = codec.encode(&img, ImageFormat::Png, 9).unwrap();

        assert_eq!(codec.detect_format(&bytes), ImageFormat::Png);
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded.pixels, img.pixels);
    }

    #[test]
    fn test_codec_encodes_every_supported_format() {
        let codec = ImageCodec::default();
        let img = sample();

        for format in [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Gif] {
            let quality = codec.default_quality(format);
            let bytes = codec.encode(&img, format, quality).unwrap();
            assert_eq!(codec.detect_format(&bytes), format);

            let decoded = codec.decode(&bytes).unwrap();
            assert_eq!(decoded.size(), img.size());
        }
    }

    #[test]
    fn test_codec_refuses_other() {
        let codec = ImageCodec::default();
        assert!(matches!(
            codec.encode(&sample(), ImageFormat::Other, 90),
            Err(ImageError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            codec.decode(b"not an image at all"),
            Err(ImageError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_default_quality_follows_settings() {
        let codec = ImageCodec {
            jpeg_quality: 75,
            png_compression: 3,
            ..ImageCodec::default()
        };
        assert_eq!(codec.default_quality(ImageFormat::Jpeg), 75);
        assert_eq!(codec.default_quality(ImageFormat::Png), 3);
        assert_eq!(codec.default_quality(ImageFormat::Gif), 0);

        assert_eq!(ImageFormat::Jpeg.default_quality(), DEFAULT_JPEG_QUALITY);
        assert_eq!(ImageFormat::Png.default_quality(), DEFAULT_PNG_COMPRESSION);
    }
}

//! Owned RGBA raster and the background colour type.

use std::fmt;
use std::str::FromStr;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::ImageError;
use crate::geometry::Size;

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// Colour of canvas pixels nothing is drawn on.
pub const CANVAS_BLACK: Rgba<u8> = Rgba([0, 0, 0, u8::MAX]);

/// An owned RGBA8 raster.
///
/// Every resize produces a new buffer; the old one is dropped by its owner
/// once the replacement exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
    /// Set on decoded images. Canvases built for compositing clear it: a
    /// canvas takes the drawn pixels' alpha as is.
    pub alpha_blending: bool,
}

impl PixelBuffer {
    /// Create a buffer from raw RGBA data. Blending is enabled, matching
    /// freshly decoded images.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
            alpha_blending: true,
        }
    }

    /// Create a PixelBuffer from an image::RgbaImage.
    pub fn from_rgba_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Wrap a compositing canvas. Blending stays disabled so later writes
    /// copy alpha as is.
    pub fn from_canvas(img: RgbaImage) -> Self {
        Self {
            alpha_blending: false,
            ..Self::from_rgba_image(img)
        }
    }

    /// Copy into an image::RgbaImage for the `imageops` routines.
    pub fn to_rgba_image(&self) -> Result<RgbaImage, ImageError> {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| self.length_error())
    }

    /// RGB bytes with the alpha channel dropped, for encoders without alpha.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(CHANNELS)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn length_error(&self) -> ImageError {
        ImageError::InvalidDimensions(format!(
            "{}x{} buffer holds {} bytes",
            self.width,
            self.height,
            self.pixels.len()
        ))
    }
}

#[cfg(test)]
impl PixelBuffer {
    /// Read the pixel at (x, y). Coordinates must be in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

/// Allocate a `width × height` canvas flooded with `color`.
///
/// # Errors
///
/// `InvalidDimensions` for a zero side, `CanvasAllocation` when the byte
/// length overflows or the allocator refuses the request.
pub fn canvas(width: u32, height: u32, color: Rgba<u8>) -> Result<RgbaImage, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions(format!(
            "canvas {width}x{height}"
        )));
    }

    let alloc_error = || ImageError::CanvasAllocation { width, height };
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(alloc_error)?;

    let mut pixels = Vec::new();
    pixels.try_reserve_exact(len).map_err(|_| alloc_error())?;
    pixels.resize(len, 0);

    let mut img = RgbaImage::from_raw(width, height, pixels).ok_or_else(alloc_error)?;
    for px in img.pixels_mut() {
        *px = color;
    }
    Ok(img)
}

/// An opaque RGB colour, written as six hex digits (`FF0000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, u8::MAX])
    }
}

impl Default for Rgb {
    /// Red, the historical padding colour.
    fn default() -> Self {
        Self::new(0xFF, 0x00, 0x00)
    }
}

impl FromStr for Rgb {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ImageError::InvalidColor(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ImageError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ImageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

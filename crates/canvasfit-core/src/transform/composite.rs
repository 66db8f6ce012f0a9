//! Canvas compositing: the pixel side of a resolved resize.
//!
//! The visible window is cut out with `imageops::crop_imm`, resampled to the
//! destination size with `imageops::thumbnail` (area averaging) and pasted
//! with `imageops::replace`, which clips at the canvas edges.

use image::{imageops, RgbaImage};
use tracing::debug;

use crate::buffer::{canvas, PixelBuffer, Rgb, CANVAS_BLACK};
use crate::error::ImageError;
use crate::geometry::{resolve, FieldsMode, Layout, Rect, ResizeMethod, Resolution, Size};
use crate::params::ResizeSpec;

/// Build a new canvas for `layout` and draw `source` onto it.
///
/// The canvas starts opaque black with blending disabled. With fields the
/// whole canvas is painted `background` first. CROP copies pixels unscaled;
/// every other method resamples `source_rect` onto `dest_rect`.
pub fn composite(
    source: &PixelBuffer,
    layout: &Layout,
    method: ResizeMethod,
    fields: FieldsMode,
    background: Rgb,
) -> Result<PixelBuffer, ImageError> {
    composite_image(source, layout, method, fields, background).map(PixelBuffer::from_canvas)
}

pub(super) fn composite_image(
    source: &PixelBuffer,
    layout: &Layout,
    method: ResizeMethod,
    fields: FieldsMode,
    background: Rgb,
) -> Result<RgbaImage, ImageError> {
    let fill = if fields.has_fields() {
        background.to_rgba()
    } else {
        CANVAS_BLACK
    };
    let mut target = canvas(layout.size.width, layout.size.height, fill)?;

    // Only the part of the window that lies on the source is drawn
    let Some(window) = layout.source_rect.intersect(Rect::full(source.size())) else {
        return Ok(target);
    };

    let src = source.to_rgba_image()?;
    let region = imageops::crop_imm(
        &src,
        window.x as u32,
        window.y as u32,
        window.width,
        window.height,
    )
    .to_image();

    let dest = layout.dest_rect;
    let (region, x, y) = if method.resamples() {
        let region = if region.dimensions() == (dest.width, dest.height) {
            region
        } else {
            imageops::thumbnail(&region, dest.width, dest.height)
        };
        (region, dest.x, dest.y)
    } else {
        // Unscaled: shift by whatever the clip took off the window origin
        (
            region,
            dest.x + (window.x - layout.source_rect.x),
            dest.y + (window.y - layout.source_rect.y),
        )
    };

    imageops::replace(&mut target, &region, x, y);
    Ok(target)
}

/// Resize `source` according to `spec`.
///
/// Returns `Ok(None)` when the quality guard declines to upscale; the caller
/// keeps the source untouched and nothing is allocated.
pub fn resize(source: &PixelBuffer, spec: &ResizeSpec) -> Result<Option<PixelBuffer>, ImageError> {
    let layout = match resolve(source.size(), spec)? {
        Resolution::Unchanged => {
            debug!(
                width = source.width,
                height = source.height,
                "resize skipped by quality guard"
            );
            return Ok(None);
        }
        Resolution::Layout(layout) => layout,
    };

    let out = composite(source, &layout, spec.method, spec.fields, spec.background)?;
    debug!(
        method = %spec.method,
        from = ?source.size(),
        to = ?out.size(),
        "resized"
    );
    Ok(Some(out))
}

/// Scale both sides by `factor`, rounding down.
///
/// Runs as an unscaled CROP with the default quality guard, so factors above
/// one leave the image as it is and factors below one keep the top-left
/// window. A factor that keeps the size, such as `1.0`, returns `Ok(None)`
/// like any other no-op, so the caller keeps its buffer untouched.
pub fn scale(source: &PixelBuffer, factor: f64) -> Result<Option<PixelBuffer>, ImageError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ImageError::InvalidDimensions(format!(
            "scale factor {factor} must be a positive finite number"
        )));
    }

    let target = Size::new(
        (source.width as f64 * factor).floor() as u32,
        (source.height as f64 * factor).floor() as u32,
    );
    if target == source.size() {
        debug!(factor, "scale keeps the size");
        return Ok(None);
    }

    let spec = ResizeSpec::exact(target.width, target.height).with_method(ResizeMethod::Crop);
    resize(source, &spec)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

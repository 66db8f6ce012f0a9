//! Method-specific rectangle resolution.
//!
//! Each [`ResizeMethod`] has its own function below; [`resolve`] completes
//! the requested dimensions, applies the quality guard and dispatches.
//!
//! With `sc = source aspect` and `tc = target aspect`:
//!
//! | Method | `sc > tc` (source wider) | otherwise |
//! |---|---|---|
//! | Stretch | full → full | full → full |
//! | Fill | crop source width | crop source height |
//! | Fit (fields) | letterbox top/bottom | pillarbox left/right |
//! | Fit (no fields) | shrink canvas height | shrink canvas width |
//! | FitHeight | overflow sides, clipped | shrink canvas width (`sc < tc`) |
//! | FitWidth | shrink canvas height | overflow top/bottom, clipped |
//! | Crop | unscaled `target`-sized window at (0, 0) | same |

use tracing::trace;

use super::{FieldsMode, Rect, ResizeMethod, Size};
use crate::error::ImageError;
use crate::params::ResizeSpec;

/// Canvas size plus the source and destination copy rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Actual canvas size. FIT without fields, FIT_HEIGHT and FIT_WIDTH may
    /// shrink one side below the requested value.
    pub size: Size,
    /// Region of the source image to read.
    pub source_rect: Rect,
    /// Region of the canvas to write; may overhang the canvas.
    pub dest_rect: Rect,
}

impl Layout {
    fn validate(self) -> Result<Self, ImageError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Err(ImageError::Geometry(format!(
                "canvas collapsed to {}x{}",
                self.size.width, self.size.height
            )));
        }
        if self.source_rect.is_degenerate() {
            return Err(ImageError::Geometry(format!(
                "source rectangle {:?}",
                self.source_rect
            )));
        }
        if self.dest_rect.is_degenerate() {
            return Err(ImageError::Geometry(format!(
                "destination rectangle {:?}",
                self.dest_rect
            )));
        }
        Ok(self)
    }
}

/// Outcome of resolving a resize against a source size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The quality guard refused to upscale; keep the source as it is.
    Unchanged,
    /// Composite according to this layout.
    Layout(Layout),
}

/// Complete a partially specified target size from the source aspect ratio.
///
/// # Errors
///
/// `InvalidDimensions` when neither side is given, the source is empty, or a
/// side resolves to zero.
pub fn resolve_dimensions(
    source: Size,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<Size, ImageError> {
    if source.width == 0 || source.height == 0 {
        return Err(ImageError::InvalidDimensions(format!(
            "source is {}x{}",
            source.width, source.height
        )));
    }

    let (sw, sh) = (source.width as f64, source.height as f64);
    let (width, height) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (None, Some(h)) => (to_dimension((h as f64 * sw / sh).round()), h),
        (Some(w), None) => (w, to_dimension((w as f64 * sh / sw).round())),
        (None, None) => {
            return Err(ImageError::InvalidDimensions(
                "neither width nor height given".to_string(),
            ))
        }
    };

    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions(format!(
            "result image size {width}x{height} is zero"
        )));
    }
    Ok(Size::new(width, height))
}

/// Resolve a resize request into a canvas layout.
pub fn resolve(source: Size, spec: &ResizeSpec) -> Result<Resolution, ImageError> {
    let target = resolve_dimensions(source, spec.width, spec.height)?;

    if spec.keep_quality && target.width > source.width && target.height > source.height {
        trace!(?source, ?target, "quality guard: skipping upscale");
        return Ok(Resolution::Unchanged);
    }

    let (h_align, v_align) = spec.alignment();
    let layout = match spec.method {
        ResizeMethod::Stretch => stretch(source, target),
        ResizeMethod::Fill => fill(source, target, h_align, v_align),
        ResizeMethod::Fit => fit(source, target, spec.fields, h_align, v_align),
        ResizeMethod::FitHeight => fit_height(source, target, h_align),
        ResizeMethod::FitWidth => fit_width(source, target, v_align),
        ResizeMethod::Crop => crop(source, target),
    }
    .validate()?;

    trace!(
        method = %spec.method,
        size = ?layout.size,
        source_rect = ?layout.source_rect,
        dest_rect = ?layout.dest_rect,
        "resolved layout"
    );
    Ok(Resolution::Layout(layout))
}

/// Saturating float → pixel count. Negative and NaN become zero.
#[inline]
fn to_dimension(value: f64) -> u32 {
    value as u32
}

#[inline]
fn floor_dim(value: f64) -> u32 {
    to_dimension(value.floor())
}

#[inline]
fn floor_offset(value: f64) -> i64 {
    value.floor() as i64
}

fn stretch(source: Size, target: Size) -> Layout {
    Layout {
        size: target,
        source_rect: Rect::full(source),
        dest_rect: Rect::full(target),
    }
}

fn fill(source: Size, target: Size, h_align: f64, v_align: f64) -> Layout {
    let (sw, sh) = (source.width as f64, source.height as f64);
    let target_coef = target.aspect();
    let mut source_rect = Rect::full(source);

    if source.aspect() > target_coef {
        let copy_width = (sh * target_coef).floor();
        source_rect.width = to_dimension(copy_width);
        source_rect.x = -floor_offset((copy_width - sw) * h_align);
    } else {
        let copy_height = (sw / target_coef).floor();
        source_rect.height = to_dimension(copy_height);
        source_rect.y = -floor_offset((copy_height - sh) * v_align);
    }

    Layout {
        size: target,
        source_rect,
        dest_rect: Rect::full(target),
    }
}

fn fit(source: Size, target: Size, fields: FieldsMode, h_align: f64, v_align: f64) -> Layout {
    let (tw, th) = (target.width as f64, target.height as f64);
    let source_coef = source.aspect();
    let wider = source_coef > target.aspect();

    let mut size = target;
    let mut dest_rect = Rect::full(target);

    match fields {
        FieldsMode::WithFields => {
            if wider {
                let copy_height = (tw / source_coef).floor();
                dest_rect.height = to_dimension(copy_height);
                dest_rect.y = -floor_offset((copy_height - th) * v_align);
            } else {
                let copy_width = (th * source_coef).floor();
                dest_rect.width = to_dimension(copy_width);
                dest_rect.x = floor_offset((tw - copy_width) * h_align);
            }
        }
        FieldsMode::WithoutFields => {
            if wider {
                size.height = floor_dim(tw / source_coef);
            } else {
                size.width = floor_dim(th * source_coef);
            }
            dest_rect = Rect::full(size);
        }
    }

    Layout {
        size,
        source_rect: Rect::full(source),
        dest_rect,
    }
}

fn fit_height(source: Size, target: Size, h_align: f64) -> Layout {
    let (tw, th) = (target.width as f64, target.height as f64);
    let source_coef = source.aspect();

    let mut size = target;
    let mut dest_rect = Rect::full(target);

    if source_coef < target.aspect() {
        size.width = floor_dim(th * source_coef);
        dest_rect = Rect::full(size);
    } else {
        let copy_width = (th * source_coef).floor();
        dest_rect.width = to_dimension(copy_width);
        dest_rect.x = floor_offset((tw - copy_width) * h_align);
    }

    Layout {
        size,
        source_rect: Rect::full(source),
        dest_rect,
    }
}

fn fit_width(source: Size, target: Size, v_align: f64) -> Layout {
    let (tw, th) = (target.width as f64, target.height as f64);
    let source_coef = source.aspect();

    let mut size = target;
    let mut dest_rect = Rect::full(target);

    if source_coef > target.aspect() {
        size.height = floor_dim(tw / source_coef);
        dest_rect = Rect::full(size);
    } else {
        let copy_height = (tw / source_coef).floor();
        dest_rect.height = to_dimension(copy_height);
        dest_rect.y = -floor_offset((copy_height - th) * v_align);
    }

    Layout {
        size,
        source_rect: Rect::full(source),
        dest_rect,
    }
}

fn crop(_source: Size, target: Size) -> Layout {
    Layout {
        size: target,
        source_rect: Rect::full(target),
        dest_rect: Rect::full(target),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

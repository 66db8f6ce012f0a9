//! Resize policies and the padding mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// How source pixels map onto a differently sized canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeMethod {
    /// Literal pixel-for-pixel region copy from the top-left corner, no scaling.
    Crop,
    /// Cover the canvas, cropping the source overflow (aspect preserved).
    #[default]
    Fill,
    /// Contain the whole source inside the canvas (aspect preserved).
    Fit,
    /// Height is authoritative; width follows the source aspect.
    FitHeight,
    /// Width is authoritative; height follows the source aspect.
    FitWidth,
    /// Scale both axes independently to the exact canvas.
    Stretch,
}

impl ResizeMethod {
    pub const ALL: [ResizeMethod; 6] = [
        ResizeMethod::Crop,
        ResizeMethod::Fill,
        ResizeMethod::Fit,
        ResizeMethod::FitHeight,
        ResizeMethod::FitWidth,
        ResizeMethod::Stretch,
    ];

    /// Whether the copy resamples (everything except CROP).
    #[inline]
    pub fn resamples(self) -> bool {
        self != ResizeMethod::Crop
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeMethod::Crop => "crop",
            ResizeMethod::Fill => "fill",
            ResizeMethod::Fit => "fit",
            ResizeMethod::FitHeight => "fit-height",
            ResizeMethod::FitWidth => "fit-width",
            ResizeMethod::Stretch => "stretch",
        }
    }
}

/// Numeric codes used by stored job descriptions: CROP=1 … STRETCH=6.
impl TryFrom<u8> for ResizeMethod {
    type Error = ImageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ResizeMethod::Crop),
            2 => Ok(ResizeMethod::Fill),
            3 => Ok(ResizeMethod::Fit),
            4 => Ok(ResizeMethod::FitHeight),
            5 => Ok(ResizeMethod::FitWidth),
            6 => Ok(ResizeMethod::Stretch),
            other => Err(ImageError::UnsupportedMethod(format!("method code {other}"))),
        }
    }
}

impl FromStr for ResizeMethod {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ResizeMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| ImageError::UnsupportedMethod(s.to_string()))
    }
}

impl fmt::Display for ResizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the canvas keeps its requested size by padding with the
/// background colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldsMode {
    /// Fill the canvas with the background before compositing.
    WithFields,
    /// No background fill; FIT shrinks the canvas to the content.
    #[default]
    WithoutFields,
}

impl FieldsMode {
    #[inline]
    pub fn has_fields(self) -> bool {
        self == FieldsMode::WithFields
    }
}

/// Numeric codes: WITH_FIELDS=1, WITHOUT_FIELDS=2.
impl TryFrom<u8> for FieldsMode {
    type Error = ImageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FieldsMode::WithFields),
            2 => Ok(FieldsMode::WithoutFields),
            other => Err(ImageError::UnsupportedMethod(format!("fields code {other}"))),
        }
    }
}

impl FromStr for FieldsMode {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "with-fields" => Ok(FieldsMode::WithFields),
            "without-fields" => Ok(FieldsMode::WithoutFields),
            _ => Err(ImageError::UnsupportedMethod(s.to_string())),
        }
    }
}

//! Default settings loaded from TOML.
//!
//! Every key is optional; a sparse file overrides just what it names.
//!
//! ```toml
//! [resize]
//! method = "fill"            # stretch | fill | fit | fit-height | fit-width | crop
//! fields = "without-fields"  # with-fields | without-fields
//! horizontal_align = 0.5     # 0 = left, 1 = right
//! vertical_align = 0.5       # 0 = top, 1 = bottom
//! background = "FF0000"      # padding colour for with-fields
//! keep_quality = true        # never enlarge both sides
//!
//! [slice]
//! columns = 5
//! rows = 5
//!
//! [encode]
//! jpeg_quality = 90          # 1-100
//! png_compression = 9        # 0-9
//!
//! [decode]
//! apply_orientation = false  # honour EXIF orientation
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::buffer::Rgb;
use crate::codec::{ImageCodec, DEFAULT_JPEG_QUALITY, DEFAULT_PNG_COMPRESSION};
use crate::geometry::{FieldsMode, ResizeMethod};
use crate::params::{ResizeSpec, SliceSpec, DEFAULT_ALIGN, DEFAULT_GRID};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub resize: ResizeConfig,
    pub slice: SliceConfig,
    pub encode: EncodeConfig,
    pub decode: DecodeConfig,
}

/// Defaults applied to every resize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub method: ResizeMethod,
    pub fields: FieldsMode,
    pub horizontal_align: f64,
    pub vertical_align: f64,
    pub background: Rgb,
    pub keep_quality: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            method: ResizeMethod::default(),
            fields: FieldsMode::default(),
            horizontal_align: DEFAULT_ALIGN,
            vertical_align: DEFAULT_ALIGN,
            background: Rgb::default(),
            keep_quality: true,
        }
    }
}

/// Grid used by slicing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SliceConfig {
    pub columns: u32,
    pub rows: u32,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_GRID,
            rows: DEFAULT_GRID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeConfig {
    pub jpeg_quality: u8,
    pub png_compression: u8,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            png_compression: DEFAULT_PNG_COMPRESSION,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeConfig {
    pub apply_orientation: bool,
}

impl CanvasConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CanvasConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.resize.horizontal_align) {
            return Err(ConfigError::Validation(
                "resize.horizontal_align must be 0-1".into(),
            ));
        }
        if !in_unit(self.resize.vertical_align) {
            return Err(ConfigError::Validation(
                "resize.vertical_align must be 0-1".into(),
            ));
        }
        if !(1..=100).contains(&self.encode.jpeg_quality) {
            return Err(ConfigError::Validation(
                "encode.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.encode.png_compression > 9 {
            return Err(ConfigError::Validation(
                "encode.png_compression must be 0-9".into(),
            ));
        }
        if self.slice.columns == 0 || self.slice.rows == 0 {
            return Err(ConfigError::Validation(
                "slice.columns and slice.rows must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// A resize request to the given size using these defaults.
    pub fn resize_spec(&self, width: Option<u32>, height: Option<u32>) -> ResizeSpec {
        let r = &self.resize;
        ResizeSpec::new(width, height)
            .with_method(r.method)
            .with_fields(r.fields)
            .with_align(r.horizontal_align, r.vertical_align)
            .with_background(r.background)
            .with_keep_quality(r.keep_quality)
    }

    /// A slice request on the configured grid.
    pub fn slice_spec(&self, width: u32, height: u32, column: u32, row: u32) -> SliceSpec {
        SliceSpec::new(width, height, column, row)
            .with_grid(self.slice.columns, self.slice.rows)
            .with_fields(self.resize.fields)
    }

    /// A codec with the configured encode and decode settings.
    pub fn codec(&self) -> ImageCodec {
        ImageCodec {
            apply_orientation: self.decode.apply_orientation,
            jpeg_quality: self.encode.jpeg_quality,
            png_compression: self.encode.png_compression,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_is_default() {
        let config = CanvasConfig::from_toml_str("").unwrap();
        assert_eq!(config, CanvasConfig::default());
        assert_eq!(config.resize.method, ResizeMethod::Fill);
        assert_eq!(config.resize.background, Rgb::new(0xFF, 0, 0));
        assert_eq!(config.slice.columns, 5);
        assert_eq!(config.encode.jpeg_quality, 90);
        assert_eq!(config.encode.png_compression, 9);
        assert!(!config.decode.apply_orientation);
    }

    #[test]
    fn test_sparse_override() {
        let config = CanvasConfig::from_toml_str(
            r##"
            [resize]
            method = "fit-height"
            fields = "with-fields"
            background = "#00ff00"

            [slice]
            rows = 2
            "##,
        )
        .unwrap();

        assert_eq!(config.resize.method, ResizeMethod::FitHeight);
        assert_eq!(config.resize.fields, FieldsMode::WithFields);
        assert_eq!(config.resize.background, Rgb::new(0, 0xFF, 0));
        assert!(config.resize.keep_quality);
        assert_eq!(config.slice.columns, 5);
        assert_eq!(config.slice.rows, 2);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result = CanvasConfig::from_toml_str("[resize]\nmehtod = \"fit\"\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));

        let result = CanvasConfig::from_toml_str("[cache]\nsize = 3\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(matches!(
            CanvasConfig::from_toml_str("[resize]\nmethod = \"squash\"\n"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            CanvasConfig::from_toml_str("[resize]\nbackground = \"red\"\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_validation_ranges() {
        let cases = [
            "[resize]\nhorizontal_align = 1.5\n",
            "[resize]\nvertical_align = -0.1\n",
            "[encode]\njpeg_quality = 0\n",
            "[encode]\njpeg_quality = 101\n",
            "[encode]\npng_compression = 10\n",
            "[slice]\ncolumns = 0\n",
            "[slice]\nrows = 0\n",
        ];
        for case in cases {
            assert!(
                matches!(
                    CanvasConfig::from_toml_str(case),
                    Err(ConfigError::Validation(_))
                ),
                "{case}"
            );
        }
    }

    #[test]
    fn test_resize_spec_uses_defaults() {
        let config = CanvasConfig::from_toml_str(
            "[resize]\nmethod = \"stretch\"\nhorizontal_align = 0.0\nkeep_quality = false\n",
        )
        .unwrap();
        let spec = config.resize_spec(Some(100), None);

        assert_eq!(spec.width, Some(100));
        assert_eq!(spec.height, None);
        assert_eq!(spec.method, ResizeMethod::Stretch);
        assert_eq!(spec.h_align, 0.0);
        assert_eq!(spec.v_align, 0.5);
        assert!(!spec.keep_quality);
    }

    #[test]
    fn test_slice_spec_and_codec() {
        let config = CanvasConfig::from_toml_str(
            "[slice]\ncolumns = 3\nrows = 4\n\
             [encode]\njpeg_quality = 70\n\
             [decode]\napply_orientation = true\n",
        )
        .unwrap();

        let spec = config.slice_spec(300, 400, 2, 3);
        assert_eq!((spec.columns, spec.rows), (3, 4));
        assert_eq!((spec.column, spec.row), (2, 3));

        let codec = config.codec();
        assert_eq!(codec.jpeg_quality, 70);
        assert_eq!(codec.png_compression, 9);
        assert!(codec.apply_orientation);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("canvasfit.toml");
        fs::write(&path, "[encode]\npng_compression = 4\n").unwrap();

        let config = CanvasConfig::load(&path).unwrap();
        assert_eq!(config.encode.png_compression, 4);

        let missing = CanvasConfig::load(&tmp.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = CanvasConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(CanvasConfig::from_toml_str(&text).unwrap(), config);
    }
}

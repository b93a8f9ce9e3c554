//! Session configuration for MerchMagic
//!
//! Configuration is organized into logical sections:
//! - Canvas dimensions (the logical editing surface)
//! - Print area (size and vertical offset; always centred horizontally)
//! - Artwork placement (initial fit ratio, overflow policy for the clamp)
//! - Export defaults (resolution multiplier, variation limit)
//!
//! Values are fixed for the lifetime of a session once it is created.

use merchmagic_core::constants::{
    ARTWORK_FIT_RATIO, CANVAS_HEIGHT, CANVAS_WIDTH, EXPORT_SCALE_FACTOR, GARMENT_TEMPLATE_ID,
    MAX_VARIATIONS, PRINT_AREA_HEIGHT, PRINT_AREA_TOP, PRINT_AREA_WIDTH,
};
use merchmagic_core::{OverflowPolicy, Rect, Size};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Logical canvas dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

impl CanvasSettings {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Print area geometry. The left edge is derived so the area is centred
/// horizontally on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintAreaSettings {
    pub width: f64,
    pub height: f64,
    pub top: f64,
}

impl Default for PrintAreaSettings {
    fn default() -> Self {
        Self {
            width: PRINT_AREA_WIDTH,
            height: PRINT_AREA_HEIGHT,
            top: PRINT_AREA_TOP,
        }
    }
}

impl PrintAreaSettings {
    /// Resolves the print area rectangle on a canvas.
    pub fn rect(&self, canvas: &CanvasSettings) -> Rect {
        Rect::new(
            (canvas.width - self.width) / 2.0,
            self.top,
            self.width,
            self.height,
        )
    }
}

/// Artwork placement preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtworkSettings {
    /// Fraction of the print area filled by a freshly uploaded artwork
    pub fit_ratio: f64,
    /// Placement on an axis where the artwork is larger than the print area
    pub overflow_policy: OverflowPolicy,
}

impl Default for ArtworkSettings {
    fn default() -> Self {
        Self {
            fit_ratio: ARTWORK_FIT_RATIO,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

/// Export defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Multiplier applied to the canvas size for exported rasters
    pub scale_factor: f64,
    /// Upper bound on variations per export request
    pub max_variations: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale_factor: EXPORT_SCALE_FACTOR,
            max_variations: MAX_VARIATIONS,
        }
    }
}

impl ExportSettings {
    /// Output raster size for a canvas.
    pub fn output_size(&self, canvas: &CanvasSettings) -> (u32, u32) {
        (
            (canvas.width * self.scale_factor).round() as u32,
            (canvas.height * self.scale_factor).round() as u32,
        )
    }

    /// Clamps a requested variation count to `1..=max_variations`.
    pub fn clamp_variations(&self, requested: u32) -> u32 {
        requested.clamp(1, self.max_variations.max(1))
    }
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub canvas: CanvasSettings,
    pub print_area: PrintAreaSettings,
    pub artwork: ArtworkSettings,
    pub export: ExportSettings,
    /// Identifier passed to the template source when loading the garment
    pub garment_template_id: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSettings::default(),
            print_area: PrintAreaSettings::default(),
            artwork: ArtworkSettings::default(),
            export: ExportSettings::default(),
            garment_template_id: GARMENT_TEMPLATE_ID.to_string(),
        }
    }
}

impl SessionConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolved print area rectangle.
    pub fn print_area_rect(&self) -> Rect {
        self.print_area.rect(&self.canvas)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file (JSON or TOML, chosen by extension)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        config.validate()?;
        tracing::debug!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML, chosen by extension)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.canvas.size().is_positive() {
            return Err(ConfigError::out_of_range(
                "canvas",
                format!("{}x{}", self.canvas.width, self.canvas.height),
            ));
        }

        let area = self.print_area_rect();
        if !area.size().is_positive() {
            return Err(ConfigError::out_of_range(
                "print_area",
                format!("{}x{}", area.width, area.height),
            ));
        }
        let canvas_rect = Rect::new(0.0, 0.0, self.canvas.width, self.canvas.height);
        if !canvas_rect.contains_rect(&area, 0.0) {
            return Err(ConfigError::PrintAreaOutsideCanvas {
                area: format!("{:?}", area),
                width: self.canvas.width,
                height: self.canvas.height,
            });
        }

        if !(self.artwork.fit_ratio > 0.0 && self.artwork.fit_ratio <= 1.0) {
            return Err(ConfigError::out_of_range(
                "artwork.fit_ratio",
                self.artwork.fit_ratio,
            ));
        }

        if !(self.export.scale_factor > 0.0 && self.export.scale_factor <= 8.0) {
            return Err(ConfigError::out_of_range(
                "export.scale_factor",
                self.export.scale_factor,
            ));
        }

        if self.export.max_variations == 0 {
            return Err(ConfigError::out_of_range("export.max_variations", 0));
        }

        if self.garment_template_id.trim().is_empty() {
            return Err(ConfigError::out_of_range("garment_template_id", "\"\""));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_print_area_is_centered() {
        let config = SessionConfig::default();
        assert_eq!(config.print_area_rect(), Rect::new(140.0, 180.0, 320.0, 420.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
            [artwork]
            overflow_policy = "center"

            [export]
            scale_factor = 3.0
            "#,
        )
        .unwrap();
        assert_eq!(config.artwork.overflow_policy, OverflowPolicy::Center);
        assert_eq!(config.artwork.fit_ratio, 0.8);
        assert_eq!(config.export.output_size(&config.canvas), (1800, 2340));
        assert_eq!(config.canvas, CanvasSettings::default());
    }

    #[test]
    fn test_print_area_must_fit_canvas() {
        let mut config = SessionConfig::default();
        config.print_area.height = 700.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PrintAreaOutsideCanvas { .. })
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = SessionConfig::default();
        config.artwork.fit_ratio = 1.5;
        assert!(config.validate().is_err());

        let mut config = SessionConfig::default();
        config.export.max_variations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_variations() {
        let export = ExportSettings::default();
        assert_eq!(export.clamp_variations(10), 4);
        assert_eq!(export.clamp_variations(0), 1);
        assert_eq!(export.clamp_variations(3), 3);
    }
}

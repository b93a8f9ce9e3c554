//! Error handling for MerchMagic
//!
//! Provides the error taxonomy shared by every layer of the engine:
//! - Asset errors (template fetch failures, unparseable uploads)
//! - Surface errors (operations attempted before the render surface exists)
//! - Preset errors (unknown preset identifiers)
//! - Render errors (invalid output dimensions, PNG encoding)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Asset error type
///
/// Represents failures while obtaining or decoding the garment template or an
/// uploaded artwork asset. A failed load never replaces the object that was
/// already on the canvas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    /// The template (or other remote asset) could not be fetched
    #[error("Failed to load asset '{id}': {reason}")]
    Load {
        /// The identifier that was requested.
        id: String,
        /// Why the fetch failed.
        reason: String,
    },

    /// The asset content is empty or malformed, or yielded no shapes
    #[error("Failed to parse asset '{name}': {reason}")]
    Parse {
        /// Name of the asset (upload file name or template id).
        name: String,
        /// Why parsing failed.
        reason: String,
    },
}

impl AssetError {
    /// Shorthand for a load failure.
    pub fn load(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a parse failure.
    pub fn parse(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Render surface error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The render surface has not been mounted yet (or was disposed)
    #[error("Render surface not initialized (attempted: {operation})")]
    NotInitialized {
        /// The operation that required the surface.
        operation: String,
    },
}

/// Preset error type
///
/// Unknown presets are a soft failure: callers that decorate the scene log the
/// error and continue with an undecorated export.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    /// The preset identifier is not one of the registered presets
    #[error("Unknown preset id: {0}")]
    InvalidPresetId(String),
}

/// Rendering and encoding error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Requested raster dimensions cannot be allocated
    #[error("Invalid render dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// The raster could not be encoded
    #[error("Image encoding failed: {reason}")]
    Encode {
        /// The encoder's message.
        reason: String,
    },
}

/// Main error type for MerchMagic
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Asset error
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Surface error
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Preset error
    #[error(transparent)]
    Preset(#[from] PresetError),

    /// Render error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Shorthand for [`SurfaceError::NotInitialized`].
    pub fn surface_not_initialized(operation: impl Into<String>) -> Self {
        Error::Surface(SurfaceError::NotInitialized {
            operation: operation.into(),
        })
    }

    /// Check if this is an asset (load or parse) error
    pub fn is_asset_error(&self) -> bool {
        matches!(self, Error::Asset(_))
    }

    /// Check if this is an asset load (fetch) error
    pub fn is_load_error(&self) -> bool {
        matches!(self, Error::Asset(AssetError::Load { .. }))
    }

    /// Check if this is an asset parse error
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Asset(AssetError::Parse { .. }))
    }

    /// Check if this is a missing-surface error
    pub fn is_surface_error(&self) -> bool {
        matches!(self, Error::Surface(_))
    }

    /// Check if this is a render error
    pub fn is_render_error(&self) -> bool {
        matches!(self, Error::Render(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::load("mockups/shirt_base.svg", "not found");
        assert_eq!(
            err.to_string(),
            "Failed to load asset 'mockups/shirt_base.svg': not found"
        );

        let err = AssetError::parse("logo.svg", "no shapes");
        assert_eq!(err.to_string(), "Failed to parse asset 'logo.svg': no shapes");
    }

    #[test]
    fn test_error_classification() {
        let err: Error = AssetError::parse("x", "empty").into();
        assert!(err.is_asset_error());
        assert!(err.is_parse_error());
        assert!(!err.is_load_error());

        let err = Error::surface_not_initialized("flatten");
        assert!(err.is_surface_error());
        assert_eq!(
            err.to_string(),
            "Render surface not initialized (attempted: flatten)"
        );

        let err: Error = RenderError::InvalidDimensions {
            width: 0,
            height: 10,
        }
        .into();
        assert!(err.is_render_error());
    }

    #[test]
    fn test_preset_error_display() {
        let err = PresetError::InvalidPresetId("watercolor".to_string());
        assert_eq!(err.to_string(), "Unknown preset id: watercolor");
    }
}

//! Engine-wide constants.

/// Logical width of the editing canvas.
pub const CANVAS_WIDTH: f64 = 600.0;
/// Logical height of the editing canvas.
pub const CANVAS_HEIGHT: f64 = 780.0;

/// Print area size and vertical offset; it is centred horizontally.
pub const PRINT_AREA_WIDTH: f64 = 320.0;
pub const PRINT_AREA_HEIGHT: f64 = 420.0;
pub const PRINT_AREA_TOP: f64 = 180.0;

/// Fraction of the print area a freshly uploaded artwork fills.
pub const ARTWORK_FIT_RATIO: f64 = 0.8;

/// Identifier of the bundled garment silhouette.
pub const GARMENT_TEMPLATE_ID: &str = "mockups/shirt_base.svg";

/// Default multiplier applied to the canvas size when exporting.
pub const EXPORT_SCALE_FACTOR: f64 = 2.0;

/// Upper bound on variations generated per export request.
pub const MAX_VARIATIONS: u32 = 4;

/// Live view zoom limits.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 50.0;

/// Role tags used to look objects up in the scene.
pub const ROLE_GARMENT: &str = "shirt";
pub const ROLE_PRINT_AREA: &str = "print-area";
pub const ROLE_ARTWORK: &str = "artwork";
pub const ROLE_OVERLAY: &str = "overlay";

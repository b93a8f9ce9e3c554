//! Viewport and coordinate transformation for the editing surface.
//!
//! Handles conversion between pixel coordinates (screen space) and canvas
//! coordinates (scene space). Both spaces have their origin at the top-left
//! with +Y pointing down, so the mapping is a plain zoom-and-pan.

use std::fmt;

use merchmagic_core::constants::{MAX_ZOOM, MIN_ZOOM};
use merchmagic_core::Point;
use tiny_skia::Transform;

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

impl Viewport {
    /// The identity view: 100% zoom, no pan.
    pub fn identity() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, constrained to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Zooms in by multiplying current zoom by 1.2.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * 1.2);
    }

    /// Zooms out by dividing current zoom by 1.2.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / 1.2);
    }

    /// Gets the pan offset (X coordinate, pixels).
    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    /// Gets the pan offset (Y coordinate, pixels).
    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    /// Sets the pan offset.
    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Pans by a delta amount.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Resets zoom and pan to the identity view.
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Converts pixel coordinates to canvas coordinates.
    ///
    /// ```text
    /// canvas_x = (pixel_x - pan_x) / zoom
    /// canvas_y = (pixel_y - pan_y) / zoom
    /// ```
    pub fn pixel_to_world(&self, pixel_x: f64, pixel_y: f64) -> Point {
        Point::new(
            (pixel_x - self.pan_x) / self.zoom,
            (pixel_y - self.pan_y) / self.zoom,
        )
    }

    /// Converts canvas coordinates to pixel coordinates.
    pub fn world_to_pixel(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        (
            world_x * self.zoom + self.pan_x,
            world_y * self.zoom + self.pan_y,
        )
    }

    /// The raster transform for this view.
    pub fn transform(&self) -> Transform {
        Transform::from_scale(self.zoom as f32, self.zoom as f32)
            .post_translate(self.pan_x as f32, self.pan_y as f32)
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport(zoom: {:.2}x, pan: ({:.2}, {:.2}))",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

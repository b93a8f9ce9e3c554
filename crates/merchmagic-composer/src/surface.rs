//! The mounted render surface.
//!
//! A surface exists between [`CompositionSession::mount_surface`] and
//! [`CompositionSession::dispose`]; every operation that touches the scene
//! requires one.
//!
//! [`CompositionSession::mount_surface`]: crate::CompositionSession::mount_surface
//! [`CompositionSession::dispose`]: crate::CompositionSession::dispose

use crate::viewport::Viewport;

/// Pixel dimensions plus the view onto the logical canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSurface {
    width: u32,
    height: u32,
    pub viewport: Viewport,
}

/// Saved dimensions and view, restored after a temporary reconfiguration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    pub width: u32,
    pub height: u32,
    pub viewport: Viewport,
}

impl RenderSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            viewport: Viewport::identity(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resizes the backing raster. The view is left untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn state(&self) -> SurfaceState {
        SurfaceState {
            width: self.width,
            height: self.height,
            viewport: self.viewport,
        }
    }

    pub fn restore(&mut self, state: SurfaceState) {
        self.width = state.width;
        self.height = state.height;
        self.viewport = state.viewport;
    }
}

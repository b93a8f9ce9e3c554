//! Serializable artwork pose.
//!
//! A [`TransformRecord`] is detached from the live scene so it can be stored by
//! the presentation layer and handed back when the artwork layer is rebuilt
//! (for example after the garment colour changes).

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Snapshot of the artwork's position (rotation centre), uniform scale and
/// rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformRecord {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub angle: f64,
}

impl TransformRecord {
    pub fn new(x: f64, y: f64, scale: f64, angle: f64) -> Self {
        Self { x, y, scale, angle }
    }

    /// The pose reported when there is no artwork: print-area centre, unit
    /// scale, no rotation.
    pub fn centered_in(region: &Rect) -> Self {
        let c = region.center();
        Self::new(c.x, c.y, 1.0, 0.0)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Partially specified pose used when re-adding artwork.
///
/// Missing fields fall back to the defaults computed for a fresh upload. A
/// position is honoured as soon as either coordinate is present; the missing
/// coordinate then falls back to the print-area centre.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RestoredTransform {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub angle: Option<f64>,
}

impl RestoredTransform {
    pub fn has_position(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }

    /// Resolves the position against a fallback point.
    pub fn position_or(&self, fallback: Point) -> Point {
        Point::new(self.x.unwrap_or(fallback.x), self.y.unwrap_or(fallback.y))
    }
}

impl From<TransformRecord> for RestoredTransform {
    fn from(r: TransformRecord) -> Self {
        Self {
            x: Some(r.x),
            y: Some(r.y),
            scale: Some(r.scale),
            angle: Some(r.angle),
        }
    }
}

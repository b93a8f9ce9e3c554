//! Scene type definitions: SceneObject, ObjectKind, ObjectRole, Shadow, OverlayContent.

use std::fmt;
use std::sync::Arc;

use merchmagic_core::constants::{ROLE_ARTWORK, ROLE_GARMENT, ROLE_OVERLAY, ROLE_PRINT_AREA};
use merchmagic_core::{ObjectGeometry, Point, Rect, Rgba, Size, TransformRecord, Translation};
use tiny_skia::{BlendMode, Pixmap};

use crate::assets::{ArtworkContent, VectorGraphic};

/// Scene object identifier, unique within a session.
pub type ObjectId = u64;

/// The role an object plays in the composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRole {
    Garment,
    PrintAreaGuide,
    Artwork,
    Overlay,
}

impl ObjectRole {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Garment => ROLE_GARMENT,
            Self::PrintAreaGuide => ROLE_PRINT_AREA,
            Self::Artwork => ROLE_ARTWORK,
            Self::Overlay => ROLE_OVERLAY,
        }
    }
}

impl fmt::Display for ObjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Blurred, offset silhouette drawn beneath an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    /// Blur amount in canvas units.
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Shadow {
    pub fn new(color: Rgba, blur: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            color,
            blur,
            offset_x,
            offset_y,
        }
    }
}

/// Content of a decorative overlay.
#[derive(Debug, Clone)]
pub enum OverlayContent {
    /// Vertical gradient, `from` at the top edge and `to` at the bottom.
    LinearGradient { from: Rgba, to: Rgba },
    /// A tile stretched over the object's box.
    Texture(Arc<Pixmap>),
}

/// What an object draws.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    Garment(VectorGraphic),
    PrintAreaGuide,
    Artwork(ArtworkContent),
    Overlay(OverlayContent),
}

impl ObjectKind {
    pub fn role(&self) -> ObjectRole {
        match self {
            Self::Garment(_) => ObjectRole::Garment,
            Self::PrintAreaGuide => ObjectRole::PrintAreaGuide,
            Self::Artwork(_) => ObjectRole::Artwork,
            Self::Overlay(_) => ObjectRole::Overlay,
        }
    }
}

/// An object on the canvas.
///
/// `position` is the centre of the object, which is also its rotation
/// origin. `size` is the natural (unscaled, unrotated) size.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub size: Size,
    pub position: Point,
    pub scale: f64,
    /// Rotation in degrees, clockwise.
    pub angle: f64,
    /// Included in flattened exports.
    pub exportable: bool,
    /// Accepts pointer interaction.
    pub interactive: bool,
    pub selected: bool,
    pub shadow: Option<Shadow>,
    pub opacity: f32,
    pub blend_mode: BlendMode,
}

impl SceneObject {
    /// Creates an object centred at `position`. The id is assigned when the
    /// object is added to a [`SceneGraph`](super::SceneGraph).
    pub fn new(kind: ObjectKind, size: Size, position: Point) -> Self {
        let role = kind.role();
        Self {
            id: 0,
            name: role.tag().to_string(),
            kind,
            size,
            position,
            scale: 1.0,
            angle: 0.0,
            exportable: role != ObjectRole::PrintAreaGuide,
            interactive: role == ObjectRole::Artwork,
            selected: false,
            shadow: None,
            opacity: 1.0,
            blend_mode: BlendMode::SourceOver,
        }
    }

    /// Places an object so that it covers `rect`.
    pub fn covering(kind: ObjectKind, rect: &Rect) -> Self {
        Self::new(kind, rect.size(), rect.center())
    }

    pub fn role(&self) -> ObjectRole {
        self.kind.role()
    }

    pub fn geometry(&self) -> ObjectGeometry {
        ObjectGeometry::new(self.position, self.size, self.scale, self.angle)
    }

    /// Axis-aligned bounds of the scaled, rotated object.
    pub fn bounding_box(&self) -> Rect {
        self.geometry().bounding_box()
    }

    pub fn translate(&mut self, t: Translation) {
        self.position = self.position.translated(t);
    }

    pub fn transform_record(&self) -> TransformRecord {
        TransformRecord::new(self.position.x, self.position.y, self.scale, self.angle)
    }

    pub fn apply_record(&mut self, record: &TransformRecord) {
        self.position = record.position();
        self.scale = record.scale;
        self.angle = record.angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults() {
        let guide = SceneObject::covering(
            ObjectKind::PrintAreaGuide,
            &Rect::new(140.0, 180.0, 320.0, 420.0),
        );
        assert_eq!(guide.role(), ObjectRole::PrintAreaGuide);
        assert_eq!(guide.name, "print-area");
        assert_eq!(guide.position, Point::new(300.0, 390.0));
        assert!(!guide.exportable);
        assert!(!guide.interactive);

        let overlay = SceneObject::new(
            ObjectKind::Overlay(OverlayContent::LinearGradient {
                from: Rgba::WHITE,
                to: Rgba::BLACK,
            }),
            Size::new(600.0, 780.0),
            Point::new(300.0, 390.0),
        );
        assert!(overlay.exportable);
        assert_eq!(overlay.role().tag(), "overlay");
    }

    #[test]
    fn test_bounding_box_scales_and_rotates() {
        let mut obj = SceneObject::covering(
            ObjectKind::PrintAreaGuide,
            &Rect::new(0.0, 0.0, 100.0, 50.0),
        );
        obj.scale = 2.0;
        assert_eq!(obj.bounding_box(), Rect::new(-50.0, -25.0, 200.0, 100.0));

        obj.angle = 90.0;
        let bb = obj.bounding_box();
        assert!((bb.width - 100.0).abs() < 1e-9);
        assert!((bb.height - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_record_round_trip() {
        let mut obj = SceneObject::covering(
            ObjectKind::PrintAreaGuide,
            &Rect::new(0.0, 0.0, 10.0, 10.0),
        );
        let record = TransformRecord::new(200.0, 300.0, 0.5, 15.0);
        obj.apply_record(&record);
        assert_eq!(obj.transform_record(), record);
    }
}

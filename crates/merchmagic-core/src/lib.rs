//! # MerchMagic Core
//!
//! Core types shared by the composition engine:
//! - error taxonomy ([`error`])
//! - geometry and the print-area clamp ([`geometry`])
//! - colours and the garment colour catalogue ([`color`])
//! - the serializable artwork pose ([`transform`])

pub mod color;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod transform;

pub use color::{color_label, GarmentColor, Rgba, GARMENT_COLORS};
pub use error::{AssetError, Error, PresetError, RenderError, Result, SurfaceError};
pub use geometry::{
    clamp_rect_to_region, clamp_to_region, normalize_angle, rotated_bounding_box,
    ObjectGeometry, OverflowPolicy, Point, Rect, Size, Translation, CLAMP_EPSILON,
};
pub use transform::{RestoredTransform, TransformRecord};

//! # MerchMagic Composer
//!
//! Layered 2D composition engine for garment mockups: a recoloured garment
//! silhouette, a print-area guide and one user artwork, with the artwork
//! kept inside the print area at all times, and preset-styled raster export.
//!
//! ## Core Components
//!
//! - **Scene**: z-ordered objects with role, pose, shadow and blend settings
//! - **Session**: surface lifecycle, loads, artwork placement, interaction
//! - **Guards**: interaction subscriptions (clamp, redraw, publish)
//! - **Presets**: scoped decoration (background, shadow, overlays)
//! - **Renderer**: tiny-skia rasterization and PNG encoding
//!
//! ## Architecture
//!
//! ```text
//! CompositionSession
//!   ├── SceneGraph (overlays? / garment / guide / artwork)
//!   ├── RenderSurface (size + Viewport)
//!   ├── GuardRegistry (artwork interaction guards)
//!   ├── TransformSync (published artwork pose)
//!   └── NoiseCache (per-session noise tiles)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use merchmagic_composer::{CompositionSession, EmbeddedTemplateSource, UploadedAsset};
//!
//! let mut session = CompositionSession::default();
//! session.mount_surface();
//! session.load_garment(&EmbeddedTemplateSource, "#111827").await?;
//! session.load_artwork(&UploadedAsset::vector("logo.svg", markup), None)?;
//! let mockups = session.export_variations("gradient-noise", 4)?;
//! ```

pub mod assets;
pub mod guards;
pub mod presets;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod surface;
pub mod sync;
pub mod template_source;
pub mod viewport;

pub use assets::{png_data_uri, ArtworkContent, RasterImage, UploadedAsset, VectorGraphic};
pub use guards::{GuardAction, GuardRegistry, GuardSubscription, InteractionKind, PoseUpdate};
pub use presets::{
    list_presets, preset_label, DecorationGuard, PresetId, PresetInfo, PresetRestore, PresetStyle,
};
pub use renderer::{encode_png, render_scene, RenderOptions};
pub use scene::{ObjectId, ObjectKind, ObjectRole, OverlayContent, SceneGraph, SceneObject, Shadow};
pub use session::{CompositionSession, ExportedMockup, LoadOutcome, LoadRole, LoadTicket};
pub use surface::{RenderSurface, SurfaceState};
pub use sync::TransformSync;
pub use template_source::{
    fetch_garment, EmbeddedTemplateSource, FileTemplateSource, MemoryTemplateSource,
    TemplateSource, SHIRT_BASE_SVG,
};
pub use viewport::Viewport;

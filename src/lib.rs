//! # MerchMagic
//!
//! A garment mockup composition engine:
//! - Recoloured garment silhouette with a print-area guide
//! - One user artwork (vector or raster), always kept inside the print area
//! - Preset-styled raster export (flat studio shadow, gradient with noise)
//!
//! ## Architecture
//!
//! MerchMagic is organized as a workspace with multiple crates:
//!
//! 1. **merchmagic-core** - Geometry and clamp engine, colours, transform records, errors
//! 2. **merchmagic-settings** - Session configuration (TOML/JSON)
//! 3. **merchmagic-composer** - Scene graph, composition session, presets, renderer
//! 4. **merchmagic** - Facade re-exporting the above, plus logging setup

pub use merchmagic_composer as composer;
pub use merchmagic_core as core;
pub use merchmagic_settings as settings;

pub use merchmagic_core::{
    clamp_to_region, color_label, rotated_bounding_box, AssetError, Error, GarmentColor,
    ObjectGeometry, OverflowPolicy, Point, PresetError, Rect, RenderError, RestoredTransform,
    Result, Rgba, Size, SurfaceError, TransformRecord, Translation, GARMENT_COLORS,
};

pub use merchmagic_settings::{SessionConfig, SettingsError};

pub use merchmagic_composer::{
    list_presets, preset_label, CompositionSession, DecorationGuard, EmbeddedTemplateSource,
    ExportedMockup, FileTemplateSource, InteractionKind, LoadOutcome, LoadRole, LoadTicket,
    MemoryTemplateSource, PoseUpdate, PresetId, PresetInfo, PresetRestore, TemplateSource,
    UploadedAsset,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (default level: info)
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::Pretty)
}

/// Initialize logging with an explicit output format.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .json(),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}

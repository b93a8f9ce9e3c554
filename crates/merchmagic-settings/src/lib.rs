//! MerchMagic Settings Crate
//!
//! Session configuration: canvas and print-area geometry, artwork placement
//! policy and export defaults. Loaded from TOML or JSON and validated before
//! a composition session is built from it.

pub mod config;
pub mod error;

pub use config::{ArtworkSettings, CanvasSettings, ExportSettings, PrintAreaSettings, SessionConfig};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

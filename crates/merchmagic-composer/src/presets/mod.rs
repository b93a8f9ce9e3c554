//! Export style presets.
//!
//! A preset temporarily decorates the scene (background, garment shadow and
//! bottom-most overlays) for the duration of one flatten. Decoration is
//! scoped: [`PresetRestore`] and [`DecorationGuard`] undo it exactly.

mod decoration;
mod noise;

pub use decoration::{DecorationGuard, PresetRestore};
pub use noise::{generate_noise_tile, NoiseCache, NOISE_TILE_SIZE};

use std::fmt;
use std::str::FromStr;

use merchmagic_core::{PresetError, Rgba};
use serde::{Deserialize, Serialize};

use crate::scene::Shadow;

/// Opacity of the noise overlay.
pub const NOISE_OPACITY: f32 = 0.25;

/// Gradient backdrops, cycled by variation index.
pub const GRADIENT_PALETTE: [(Rgba, Rgba); 4] = [
    (Rgba::opaque(0xf6, 0xf1, 0xff), Rgba::opaque(0xe7, 0xf9, 0xff)),
    (Rgba::opaque(0xff, 0xf7, 0xed), Rgba::opaque(0xfc, 0xe7, 0xf3)),
    (Rgba::opaque(0xf0, 0xf9, 0xff), Rgba::opaque(0xed, 0xe9, 0xfe)),
    (Rgba::opaque(0xfe, 0xf3, 0xc7), Rgba::opaque(0xe0, 0xf2, 0xfe)),
];

const FLAT_BACKGROUND: Rgba = Rgba::opaque(0xf8, 0xf8, 0xf6);

/// Registered presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetId {
    /// Off-white studio backdrop with a soft garment shadow.
    FlatShadow,
    /// Pastel gradient backdrop with a noise texture.
    GradientNoise,
}

impl PresetId {
    pub const ALL: [PresetId; 2] = [PresetId::FlatShadow, PresetId::GradientNoise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlatShadow => "flat-shadow",
            Self::GradientNoise => "gradient-noise",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FlatShadow => "Flat studio shadow (simulated)",
            Self::GradientNoise => "Gradient with noise (simulated)",
        }
    }

    /// The decoration applied for one variation.
    pub fn style(&self, variation_index: u32) -> PresetStyle {
        match self {
            Self::FlatShadow => PresetStyle {
                background: Some(FLAT_BACKGROUND),
                garment_shadow: Shadow::new(Rgba::with_alpha_f(15, 23, 42, 0.22), 35.0, 0.0, 26.0),
                gradient: None,
                noise_texture: false,
            },
            Self::GradientNoise => PresetStyle {
                background: None,
                garment_shadow: Shadow::new(Rgba::with_alpha_f(15, 23, 42, 0.18), 25.0, 0.0, 18.0),
                gradient: Some(gradient_for_variation(variation_index)),
                noise_texture: true,
            },
        }
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetId {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PresetError::InvalidPresetId(s.to_string()))
    }
}

/// Decoration parameters of a preset variation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetStyle {
    /// Replaces the surface background when set.
    pub background: Option<Rgba>,
    pub garment_shadow: Shadow,
    /// Vertical gradient overlay (top, bottom) at the very back.
    pub gradient: Option<(Rgba, Rgba)>,
    /// Soft-light noise overlay directly above the gradient.
    pub noise_texture: bool,
}

/// Gradient colours for a variation; the palette wraps around.
pub fn gradient_for_variation(variation_index: u32) -> (Rgba, Rgba) {
    GRADIENT_PALETTE[variation_index as usize % GRADIENT_PALETTE.len()]
}

/// Identifier and display label of a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresetInfo {
    pub id: &'static str,
    pub label: &'static str,
}

/// All presets, in display order.
pub fn list_presets() -> Vec<PresetInfo> {
    PresetId::ALL
        .iter()
        .map(|p| PresetInfo {
            id: p.as_str(),
            label: p.label(),
        })
        .collect()
}

/// Display label for a preset id, or the id itself when unknown.
pub fn preset_label(id: &str) -> String {
    id.parse::<PresetId>()
        .map(|p| p.label().to_string())
        .unwrap_or_else(|_| id.to_string())
}

//! Flattening and preset-styled export.

use merchmagic_core::{Error, Result};
use serde::Serialize;
use tiny_skia::{Pixmap, Transform};
use uuid::Uuid;

use super::CompositionSession;
use crate::assets::png_data_uri;
use crate::presets::preset_label;
use crate::renderer::{encode_png, render_scene, RenderOptions};

/// One exported mockup image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedMockup {
    pub id: Uuid,
    pub preset: String,
    pub label: String,
    pub variation_index: u32,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub png: Vec<u8>,
}

impl ExportedMockup {
    /// The PNG as a `data:image/png;base64,` URI.
    pub fn to_data_uri(&self) -> String {
        png_data_uri(&self.png)
    }
}

impl CompositionSession {
    /// Output size for exports, from the configured scale factor.
    pub fn export_size(&self) -> (u32, u32) {
        self.config.export.output_size(&self.config.canvas)
    }

    /// Renders exportable objects at `width` x `height`, scaled from the
    /// logical canvas.
    ///
    /// The surface's size and view are reset to identity for the render and
    /// restored afterwards, whether or not rendering succeeds.
    pub fn flatten_pixmap(&mut self, width: u32, height: u32) -> Result<Pixmap> {
        let canvas = self.config.canvas;
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| Error::surface_not_initialized("flatten"))?;

        let saved = surface.state();
        surface.resize(width, height);
        surface.viewport.reset();
        let view = Transform::from_scale(
            width as f32 / canvas.width as f32,
            height as f32 / canvas.height as f32,
        )
        .pre_concat(surface.viewport.transform());

        let result = render_scene(
            &self.scene,
            self.background,
            width,
            height,
            view,
            RenderOptions::export(),
        );
        surface.restore(saved);
        Ok(result?)
    }

    /// [`flatten_pixmap`](Self::flatten_pixmap) encoded as PNG.
    pub fn flatten(&mut self, width: u32, height: u32) -> Result<Vec<u8>> {
        let pixmap = self.flatten_pixmap(width, height)?;
        Ok(encode_png(&pixmap)?)
    }

    /// [`flatten`](Self::flatten) as a data URI.
    pub fn flatten_data_uri(&mut self, width: u32, height: u32) -> Result<String> {
        self.flatten(width, height).map(|png| png_data_uri(&png))
    }

    /// Decorates with a preset, flattens at export size and reverts.
    ///
    /// An unknown preset id exports the undecorated scene.
    pub fn export_png(&mut self, preset_id: &str, variation_index: u32) -> Result<Vec<u8>> {
        let (width, height) = self.export_size();
        self.with_preset(preset_id, variation_index, |session| {
            session.flatten(width, height)
        })
    }

    /// Exports `count` variations (clamped to `1..=max_variations`) one
    /// after another.
    pub fn export_variations(
        &mut self,
        preset_id: &str,
        count: u32,
    ) -> Result<Vec<ExportedMockup>> {
        let count = self.config.export.clamp_variations(count);
        let (width, height) = self.export_size();
        let label = preset_label(preset_id);

        let mut results = Vec::with_capacity(count as usize);
        for variation_index in 0..count {
            let png = self.export_png(preset_id, variation_index)?;
            results.push(ExportedMockup {
                id: Uuid::new_v4(),
                preset: preset_id.to_string(),
                label: label.clone(),
                variation_index,
                width,
                height,
                png,
            });
        }

        tracing::info!(
            "Exported {} variation(s) with preset '{}' at {}x{}",
            results.len(),
            preset_id,
            width,
            height
        );
        Ok(results)
    }
}

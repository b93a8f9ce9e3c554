//! Scoped scene decoration.

use std::ops::{Deref, DerefMut};

use merchmagic_core::{Result, Rgba};
use tiny_skia::BlendMode;

use super::{PresetId, NOISE_OPACITY};
use crate::scene::{ObjectId, ObjectKind, ObjectRole, OverlayContent, SceneObject, Shadow};
use crate::session::CompositionSession;

/// Everything needed to undo one preset application.
///
/// Consumed by [`PresetRestore::revert`], so a decoration can be undone at
/// most once.
#[must_use = "the scene stays decorated until the restore token is reverted"]
#[derive(Debug)]
pub struct PresetRestore {
    preset: Option<PresetId>,
    background: Option<Rgba>,
    garment_shadow: Option<(ObjectId, Option<Shadow>)>,
    overlays: Vec<ObjectId>,
}

impl PresetRestore {
    /// The applied preset, or `None` when the id was not recognised and the
    /// scene was left untouched.
    pub fn preset(&self) -> Option<PresetId> {
        self.preset
    }

    /// Overlays added by the preset, bottom to top.
    pub fn overlay_ids(&self) -> &[ObjectId] {
        &self.overlays
    }

    /// Removes the added overlays and restores the garment shadow and the
    /// background captured before decoration.
    pub fn revert(self, session: &mut CompositionSession) {
        for id in &self.overlays {
            session.scene.remove(*id);
        }
        if let Some((id, shadow)) = self.garment_shadow {
            if let Some(garment) = session.scene.get_mut(id) {
                garment.shadow = shadow;
            }
        }
        session.background = self.background;
        session.render_requested = true;

        if let Some(preset) = self.preset {
            tracing::debug!("Reverted preset {}", preset);
        }
    }
}

/// RAII decoration scope. Derefs to the session; reverts on drop, including
/// when the work done inside the scope fails.
pub struct DecorationGuard<'a> {
    session: &'a mut CompositionSession,
    restore: Option<PresetRestore>,
}

impl DecorationGuard<'_> {
    pub fn preset(&self) -> Option<PresetId> {
        self.restore.as_ref().and_then(|r| r.preset())
    }

    /// Ends the scope now.
    pub fn revert(self) {}
}

impl Deref for DecorationGuard<'_> {
    type Target = CompositionSession;

    fn deref(&self) -> &Self::Target {
        &*self.session
    }
}

impl DerefMut for DecorationGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.session
    }
}

impl Drop for DecorationGuard<'_> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore.revert(&mut *self.session);
        }
    }
}

impl CompositionSession {
    /// Decorates the scene for `preset_id`.
    ///
    /// An unknown id is logged and yields a token that restores nothing; the
    /// scene is left as it was. Fails only when no surface is mounted.
    pub fn apply_preset(&mut self, preset_id: &str, variation_index: u32) -> Result<PresetRestore> {
        self.require_surface("apply_preset")?;

        let mut restore = PresetRestore {
            preset: None,
            background: self.background,
            garment_shadow: self
                .scene
                .find_by_role(ObjectRole::Garment)
                .map(|g| (g.id, g.shadow)),
            overlays: Vec::new(),
        };

        let preset = match preset_id.parse::<PresetId>() {
            Ok(preset) => preset,
            Err(err) => {
                tracing::warn!("{}; continuing without decoration", err);
                return Ok(restore);
            }
        };
        restore.preset = Some(preset);

        let style = preset.style(variation_index);
        if let Some(background) = style.background {
            self.background = Some(background);
        }
        if let Some(garment) = self.scene.find_by_role_mut(ObjectRole::Garment) {
            garment.shadow = Some(style.garment_shadow);
        }

        let canvas = self.canvas_rect();
        if let Some((from, to)) = style.gradient {
            let overlay = SceneObject::covering(
                ObjectKind::Overlay(OverlayContent::LinearGradient { from, to }),
                &canvas,
            );
            let id = self.scene.insert_at(overlay, restore.overlays.len());
            restore.overlays.push(id);
        }
        if style.noise_texture {
            match self.noise.get_or_generate(variation_index.wrapping_add(1)) {
                Some(tile) => {
                    let mut overlay = SceneObject::covering(
                        ObjectKind::Overlay(OverlayContent::Texture(tile)),
                        &canvas,
                    );
                    overlay.opacity = NOISE_OPACITY;
                    overlay.blend_mode = BlendMode::SoftLight;
                    let id = self.scene.insert_at(overlay, restore.overlays.len());
                    restore.overlays.push(id);
                }
                None => tracing::warn!("Noise tile unavailable; skipping texture overlay"),
            }
        }

        self.render_requested = true;
        tracing::debug!(
            "Applied preset {} (variation {}, {} overlays)",
            preset,
            variation_index,
            restore.overlays.len()
        );
        Ok(restore)
    }

    /// Decorates the scene for the lifetime of the returned guard.
    pub fn decorate(
        &mut self,
        preset_id: &str,
        variation_index: u32,
    ) -> Result<DecorationGuard<'_>> {
        let restore = self.apply_preset(preset_id, variation_index)?;
        Ok(DecorationGuard {
            session: self,
            restore: Some(restore),
        })
    }

    /// Runs `f` on the decorated scene and reverts afterwards, whether or not
    /// `f` succeeds.
    pub fn with_preset<T>(
        &mut self,
        preset_id: &str,
        variation_index: u32,
        f: impl FnOnce(&mut CompositionSession) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self.decorate(preset_id, variation_index)?;
        let result = f(&mut guard);
        guard.revert();
        result
    }
}

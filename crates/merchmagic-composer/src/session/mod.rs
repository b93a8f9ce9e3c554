//! Composition session.
//!
//! A [`CompositionSession`] owns everything the engine knows about one
//! editing session: the scene graph, the mounted render surface, interaction
//! guards, the published artwork transform and the noise tile cache. There
//! is no global state; two sessions never share anything.
//!
//! ## Invariants
//!
//! - At most one garment, one print-area guide and one artwork are present.
//! - Z-order from the bottom: overlays (only while decorated), garment,
//!   guide, artwork.
//! - After any artwork transform settles (interactive or programmatic), the
//!   artwork's bounding box lies inside the print area whenever it fits.

mod export;
mod loading;

pub use export::ExportedMockup;
pub use loading::{LoadOutcome, LoadRole, LoadTicket};

use merchmagic_core::{
    clamp_to_region, Error, Point, Rect, Result, Rgba, Size, TransformRecord, Translation,
};
use merchmagic_settings::SessionConfig;
use tiny_skia::Pixmap;

use crate::guards::{GuardAction, GuardRegistry, GuardSubscription, InteractionKind, PoseUpdate};
use crate::presets::NoiseCache;
use crate::renderer::{render_scene, RenderOptions};
use crate::scene::{ObjectId, ObjectRole, SceneGraph, SceneObject};
use crate::surface::RenderSurface;
use crate::sync::TransformSync;
use crate::viewport::Viewport;

use loading::LoadGenerations;

/// One editing session over a garment mockup.
#[derive(Debug)]
pub struct CompositionSession {
    pub(crate) config: SessionConfig,
    pub(crate) print_area: Rect,
    pub(crate) scene: SceneGraph,
    pub(crate) surface: Option<RenderSurface>,
    pub(crate) background: Option<Rgba>,
    pub(crate) guards: GuardRegistry,
    pub(crate) artwork_guards: Vec<GuardSubscription>,
    pub(crate) transform_sync: TransformSync,
    pub(crate) loads: LoadGenerations,
    pub(crate) noise: NoiseCache,
    pub(crate) garment_color: Option<Rgba>,
    pub(crate) render_requested: bool,
}

impl Default for CompositionSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl CompositionSession {
    /// Creates a session. `config` is expected to be validated (see
    /// [`SessionConfig::validate`]). No surface is mounted yet.
    pub fn new(config: SessionConfig) -> Self {
        let print_area = config.print_area_rect();
        Self {
            config,
            print_area,
            scene: SceneGraph::new(),
            surface: None,
            background: None,
            guards: GuardRegistry::new(),
            artwork_guards: Vec::new(),
            transform_sync: TransformSync::new(TransformRecord::centered_in(&print_area)),
            loads: LoadGenerations::default(),
            noise: NoiseCache::new(),
            garment_color: None,
            render_requested: false,
        }
    }

    // ---- surface lifecycle ----

    /// Mounts the render surface at canvas size. Mounting twice is a no-op.
    pub fn mount_surface(&mut self) {
        if self.surface.is_some() {
            return;
        }
        let size = self.canvas_size();
        self.surface = Some(RenderSurface::new(
            size.width.round() as u32,
            size.height.round() as u32,
        ));
        self.render_requested = true;
        tracing::info!("Render surface mounted ({}x{})", size.width, size.height);
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Tears the surface down: detaches every guard, empties the scene and
    /// drops cached noise tiles. Loads still in flight are superseded. The
    /// session can be mounted again.
    pub fn dispose(&mut self) {
        self.loads.invalidate_all();
        self.release_artwork_guards();
        self.guards.clear();
        self.scene.clear();
        self.noise.clear();
        self.surface = None;
        self.background = None;
        self.garment_color = None;
        self.render_requested = false;
        self.transform_sync
            .reset(TransformRecord::centered_in(&self.print_area));
        tracing::info!("Render surface disposed");
    }

    pub(crate) fn require_surface(&self, operation: &str) -> Result<()> {
        if self.surface.is_some() {
            Ok(())
        } else {
            Err(Error::surface_not_initialized(operation))
        }
    }

    pub fn surface(&self) -> Option<&RenderSurface> {
        self.surface.as_ref()
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.surface.as_ref().map(|s| &s.viewport)
    }

    pub fn viewport_mut(&mut self) -> Result<&mut Viewport> {
        self.render_requested = true;
        self.surface
            .as_mut()
            .map(|s| &mut s.viewport)
            .ok_or_else(|| Error::surface_not_initialized("viewport"))
    }

    /// Resizes the live surface (e.g. when the host view changes size).
    pub fn resize_surface(&mut self, width: u32, height: u32) -> Result<()> {
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| Error::surface_not_initialized("resize_surface"))?;
        surface.resize(width, height);
        self.render_requested = true;
        Ok(())
    }

    // ---- accessors ----

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn print_area(&self) -> Rect {
        self.print_area
    }

    pub fn canvas_size(&self) -> Size {
        self.config.canvas.size()
    }

    pub(crate) fn canvas_rect(&self) -> Rect {
        let size = self.canvas_size();
        Rect::new(0.0, 0.0, size.width, size.height)
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn background(&self) -> Option<Rgba> {
        self.background
    }

    pub fn set_background(&mut self, background: Option<Rgba>) {
        self.background = background;
        self.render_requested = true;
    }

    pub fn garment(&self) -> Option<&SceneObject> {
        self.scene.find_by_role(ObjectRole::Garment)
    }

    /// Colour of the current garment.
    pub fn garment_color(&self) -> Option<Rgba> {
        self.garment_color
    }

    pub fn artwork(&self) -> Option<&SceneObject> {
        self.scene.find_by_role(ObjectRole::Artwork)
    }

    /// Number of active interaction guards.
    pub fn guard_count(&self) -> usize {
        self.guards.len()
    }

    // ---- artwork placement ----

    /// The artwork's pose, or the print-area centre at unit scale when
    /// there is no artwork.
    pub fn current_transform(&self) -> TransformRecord {
        self.artwork()
            .map(|a| a.transform_record())
            .unwrap_or_else(|| TransformRecord::centered_in(&self.print_area))
    }

    /// Moves the artwork back inside the print area. Returns the translation
    /// that was applied (zero when already contained or absent).
    pub fn clamp_artwork(&mut self) -> Translation {
        let region = self.print_area;
        let policy = self.config.artwork.overflow_policy;
        let Some(artwork) = self.scene.find_by_role_mut(ObjectRole::Artwork) else {
            return Translation::ZERO;
        };
        let geometry = artwork.geometry();
        let bounds = geometry.bounding_box();
        if bounds.width > region.width || bounds.height > region.height {
            tracing::warn!(
                "Artwork ({:.1}x{:.1}) exceeds the print area; applying {:?}",
                bounds.width,
                bounds.height,
                policy
            );
        }
        let t = clamp_to_region(&geometry, &region, policy);
        if !t.is_zero() {
            artwork.translate(t);
            tracing::trace!("Artwork clamped by ({:.3}, {:.3})", t.dx, t.dy);
        }
        t
    }

    /// Centres the artwork in the print area, keeping scale and rotation.
    pub fn center_artwork(&mut self) -> bool {
        let center = self.print_area.center();
        self.settle_artwork(|artwork| artwork.position = center)
    }

    /// Centres the artwork at unit scale and zero rotation.
    pub fn reset_artwork(&mut self) -> bool {
        let center = self.print_area.center();
        self.settle_artwork(|artwork| {
            artwork.position = center;
            artwork.scale = 1.0;
            artwork.angle = 0.0;
        })
    }

    /// Programmatic pose change followed by the same clamp, redraw and
    /// publish an interactive gesture gets when it settles.
    fn settle_artwork(&mut self, update: impl FnOnce(&mut SceneObject)) -> bool {
        let Some(artwork) = self.scene.find_by_role_mut(ObjectRole::Artwork) else {
            return false;
        };
        update(artwork);
        self.clamp_artwork();
        self.render_requested = true;
        let record = self.current_transform();
        self.transform_sync.publish(record);
        true
    }

    /// Routes an interaction event on the artwork through its guards.
    ///
    /// The pose update is applied first, then every guard bound to `kind`
    /// runs in registration order. Returns the published record when the
    /// event caused a transform publish (only `Modified` does).
    pub fn interact(
        &mut self,
        kind: InteractionKind,
        update: PoseUpdate,
    ) -> Option<TransformRecord> {
        let artwork = self.scene.find_by_role_mut(ObjectRole::Artwork)?;
        let id = artwork.id;
        update.apply(artwork);

        let mut published = None;
        for action in self.guards.actions_for(id, kind) {
            match action {
                GuardAction::ClampToPrintArea => {
                    self.clamp_artwork();
                }
                GuardAction::RequestRender => self.render_requested = true,
                GuardAction::PublishTransform => {
                    let record = self.current_transform();
                    self.transform_sync.publish(record);
                    published = Some(record);
                }
            }
        }
        published
    }

    /// Publishes the current artwork pose on request.
    pub fn sync_transform(&mut self) -> TransformRecord {
        let record = self.current_transform();
        self.transform_sync.publish(record);
        record
    }

    /// Last published artwork pose.
    pub fn published_transform(&self) -> TransformRecord {
        self.transform_sync.published()
    }

    /// The pose published since the last call, if any.
    pub fn take_transform_update(&mut self) -> Option<TransformRecord> {
        self.transform_sync.take_update()
    }

    pub(crate) fn attach_artwork_guards(&mut self, id: ObjectId) {
        self.release_artwork_guards();
        let all = InteractionKind::ALL;
        self.artwork_guards = vec![
            self.guards.attach(id, &all, GuardAction::ClampToPrintArea),
            self.guards.attach(id, &all, GuardAction::RequestRender),
            self.guards
                .attach(id, &[InteractionKind::Modified], GuardAction::PublishTransform),
        ];
    }

    pub(crate) fn release_artwork_guards(&mut self) {
        for subscription in self.artwork_guards.drain(..) {
            self.guards.detach(subscription);
        }
    }

    // ---- live view ----

    /// Whether a redraw was requested since the last call.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    /// Renders the live surface: guides and selection handles included,
    /// through the current viewport.
    pub fn render_preview(&mut self) -> Result<Pixmap> {
        let surface = self
            .surface
            .as_ref()
            .ok_or_else(|| Error::surface_not_initialized("render_preview"))?;
        let pixmap = render_scene(
            &self.scene,
            self.background,
            surface.width(),
            surface.height(),
            surface.viewport.transform(),
            RenderOptions::live(),
        )?;
        self.render_requested = false;
        Ok(pixmap)
    }

    /// Maps a pointer position on the live surface to canvas coordinates.
    pub fn pointer_to_canvas(&self, pixel_x: f64, pixel_y: f64) -> Option<Point> {
        self.viewport().map(|v| v.pixel_to_world(pixel_x, pixel_y))
    }
}

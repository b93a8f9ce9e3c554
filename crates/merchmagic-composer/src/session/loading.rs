//! Garment and artwork loading.
//!
//! Loads are split into a fetch/decode phase and a commit phase. A
//! [`LoadTicket`] is issued before fetching; committing with a ticket that
//! has since been superseded by a newer load of the same role is discarded,
//! so the last-issued load always wins no matter which finishes first.

use merchmagic_core::{color_label, AssetError, Result, RestoredTransform, Rgba};

use super::CompositionSession;
use crate::assets::{ArtworkContent, UploadedAsset, VectorGraphic};
use crate::scene::{ObjectId, ObjectKind, ObjectRole, SceneObject};
use crate::template_source::{fetch_garment, TemplateSource};

/// Which layer a load targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadRole {
    Garment,
    Artwork,
}

/// Token identifying one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    role: LoadRole,
    generation: u64,
}

impl LoadTicket {
    pub fn role(&self) -> LoadRole {
        self.role
    }
}

/// Result of committing a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The object was placed on the canvas.
    Applied(ObjectId),
    /// A newer load of the same role was issued; nothing changed.
    Superseded,
}

impl LoadOutcome {
    pub fn applied_id(&self) -> Option<ObjectId> {
        match self {
            Self::Applied(id) => Some(*id),
            Self::Superseded => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LoadGenerations {
    garment: u64,
    artwork: u64,
}

impl LoadGenerations {
    /// Supersedes every ticket issued so far, for all roles.
    pub(crate) fn invalidate_all(&mut self) {
        self.garment += 1;
        self.artwork += 1;
    }

    fn slot(&mut self, role: LoadRole) -> &mut u64 {
        match role {
            LoadRole::Garment => &mut self.garment,
            LoadRole::Artwork => &mut self.artwork,
        }
    }

    fn current(&self, role: LoadRole) -> u64 {
        match role {
            LoadRole::Garment => self.garment,
            LoadRole::Artwork => self.artwork,
        }
    }
}

impl CompositionSession {
    /// Issues a ticket for a new load, superseding any load of the same
    /// role still in flight.
    pub fn begin_load(&mut self, role: LoadRole) -> LoadTicket {
        let slot = self.loads.slot(role);
        *slot += 1;
        LoadTicket {
            role,
            generation: *slot,
        }
    }

    /// Whether `ticket` belongs to the newest load of its role.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.loads.current(ticket.role) == ticket.generation
    }

    /// Fetches the garment template, recolours it and replaces the current
    /// garment. On failure the previous garment stays in place.
    pub async fn load_garment(
        &mut self,
        source: &dyn TemplateSource,
        color_hex: &str,
    ) -> Result<LoadOutcome> {
        self.require_surface("load_garment")?;
        let color = Rgba::from_hex(color_hex).ok_or_else(|| {
            AssetError::parse("garment colour", format!("invalid hex colour {:?}", color_hex))
        })?;

        let ticket = self.begin_load(LoadRole::Garment);
        let template_id = self.config.garment_template_id.clone();
        let graphic = fetch_garment(source, &template_id, color)
            .await
            .inspect_err(|e| tracing::warn!("Garment load failed: {}", e))?;
        self.commit_garment(ticket, graphic, color)
    }

    /// Places a fetched garment: bottom of the stack, centred on the canvas,
    /// with the print-area guide directly above it.
    pub fn commit_garment(
        &mut self,
        ticket: LoadTicket,
        graphic: VectorGraphic,
        color: Rgba,
    ) -> Result<LoadOutcome> {
        self.require_surface("commit_garment")?;
        if !self.is_current(&ticket) {
            tracing::debug!("Discarding superseded garment load");
            return Ok(LoadOutcome::Superseded);
        }

        self.scene.remove_role(ObjectRole::Garment);
        self.scene.remove_role(ObjectRole::PrintAreaGuide);

        let size = graphic.size();
        let center = self.canvas_rect().center();
        let id = self
            .scene
            .insert_at(SceneObject::new(ObjectKind::Garment(graphic), size, center), 0);
        let guide = SceneObject::covering(ObjectKind::PrintAreaGuide, &self.print_area);
        self.scene.insert_at(guide, 1);

        self.garment_color = Some(color);
        self.render_requested = true;
        tracing::info!("Garment loaded ({})", color_label(&color.to_hex()));
        Ok(LoadOutcome::Applied(id))
    }

    /// Decodes an upload and places it as the artwork, replacing any
    /// previous artwork. On failure the previous artwork stays in place.
    pub fn load_artwork(
        &mut self,
        asset: &UploadedAsset,
        restored: Option<RestoredTransform>,
    ) -> Result<LoadOutcome> {
        self.require_surface("load_artwork")?;
        let ticket = self.begin_load(LoadRole::Artwork);
        let content = ArtworkContent::decode(asset)
            .inspect_err(|e| tracing::warn!("Artwork load failed: {}", e))?;
        self.commit_artwork(ticket, content, restored)
    }

    /// Places decoded artwork.
    ///
    /// A fresh upload is centred in the print area at
    /// `fit_ratio * min(area.w / w, area.h / h)`. A restored transform
    /// overrides position (when either coordinate is given), scale and
    /// angle. The result is clamped into the print area immediately.
    pub fn commit_artwork(
        &mut self,
        ticket: LoadTicket,
        content: ArtworkContent,
        restored: Option<RestoredTransform>,
    ) -> Result<LoadOutcome> {
        self.require_surface("commit_artwork")?;
        if !self.is_current(&ticket) {
            tracing::debug!("Discarding superseded artwork load");
            return Ok(LoadOutcome::Superseded);
        }

        let size = content.size();
        if !size.is_positive() {
            return Err(AssetError::parse("artwork", "artwork has no area").into());
        }

        self.remove_artwork();

        let area = self.print_area;
        let fit_scale = self.config.artwork.fit_ratio
            * (area.width / size.width).min(area.height / size.height);
        let restored = restored.unwrap_or_default();
        let position = if restored.has_position() {
            restored.position_or(area.center())
        } else {
            area.center()
        };

        let mut artwork = SceneObject::new(ObjectKind::Artwork(content), size, position);
        artwork.scale = restored
            .scale
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(fit_scale);
        artwork.angle = restored.angle.filter(|a| a.is_finite()).unwrap_or(0.0);
        artwork.selected = true;

        let id = self.scene.add(artwork);
        self.scene.set_z_order(id, 2);
        self.attach_artwork_guards(id);
        self.clamp_artwork();

        let record = self.current_transform();
        self.transform_sync.publish(record);
        self.render_requested = true;
        tracing::info!(
            "Artwork placed at ({:.1}, {:.1}), scale {:.3}, angle {:.1}",
            record.x,
            record.y,
            record.scale,
            record.angle
        );
        Ok(LoadOutcome::Applied(id))
    }

    /// Removes the artwork and its guards. Artwork loads still in flight are
    /// superseded. Returns false when there was no artwork.
    pub fn clear_artwork(&mut self) -> bool {
        self.begin_load(LoadRole::Artwork);
        let removed = self.remove_artwork();
        if removed {
            let record = self.current_transform();
            self.transform_sync.publish(record);
            self.render_requested = true;
            tracing::info!("Artwork cleared");
        }
        removed
    }

    fn remove_artwork(&mut self) -> bool {
        self.release_artwork_guards();
        self.scene.remove_role(ObjectRole::Artwork) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_source::{EmbeddedTemplateSource, MemoryTemplateSource};

    const LOGO: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="1000" height="1000">
        <circle cx="500" cy="500" r="400" fill="#e11d48"/>
    </svg>"##;

    fn mounted() -> CompositionSession {
        let mut session = CompositionSession::default();
        session.mount_surface();
        session
    }

    #[test]
    fn test_tickets_supersede_older_loads() {
        let mut session = mounted();
        let first = session.begin_load(LoadRole::Artwork);
        let second = session.begin_load(LoadRole::Artwork);
        let garment = session.begin_load(LoadRole::Garment);

        assert!(!session.is_current(&first));
        assert!(session.is_current(&second));
        assert!(session.is_current(&garment));

        let logo = VectorGraphic::parse("logo.svg", LOGO).unwrap();
        let outcome = session
            .commit_artwork(second, ArtworkContent::Vector(logo.clone()), None)
            .unwrap();
        assert!(outcome.is_applied());

        let outcome = session
            .commit_artwork(first, ArtworkContent::Vector(logo), None)
            .unwrap();
        assert_eq!(outcome, LoadOutcome::Superseded);
        assert_eq!(session.scene().count_role(ObjectRole::Artwork), 1);
    }

    #[test]
    fn test_load_artwork_requires_surface() {
        let mut session = CompositionSession::default();
        let err = session
            .load_artwork(&UploadedAsset::vector("logo.svg", LOGO), None)
            .unwrap_err();
        assert!(err.is_surface_error());
    }

    #[test]
    fn test_failed_upload_keeps_previous_artwork() {
        let mut session = mounted();
        let id = session
            .load_artwork(&UploadedAsset::vector("logo.svg", LOGO), None)
            .unwrap()
            .applied_id()
            .unwrap();

        let err = session
            .load_artwork(&UploadedAsset::vector("broken.svg", "<svg"), None)
            .unwrap_err();
        assert!(err.is_parse_error());
        assert_eq!(session.artwork().map(|a| a.id), Some(id));
        assert_eq!(session.guard_count(), 3);
    }

    #[test]
    fn test_restored_transform_is_applied() {
        let mut session = mounted();
        let restored = RestoredTransform {
            x: Some(250.0),
            y: Some(300.0),
            scale: Some(0.1),
            angle: Some(45.0),
        };
        session
            .load_artwork(&UploadedAsset::vector("logo.svg", LOGO), Some(restored))
            .unwrap();
        let record = session.current_transform();
        assert_eq!((record.x, record.y), (250.0, 300.0));
        assert_eq!(record.scale, 0.1);
        assert_eq!(record.angle, 45.0);
    }

    #[test]
    fn test_zero_scale_falls_back_to_fit() {
        let mut session = mounted();
        let restored = RestoredTransform {
            scale: Some(0.0),
            ..Default::default()
        };
        session
            .load_artwork(&UploadedAsset::vector("logo.svg", LOGO), Some(restored))
            .unwrap();
        assert!((session.current_transform().scale - 0.256).abs() < 1e-9);
    }

    #[test]
    fn test_clear_artwork() {
        let mut session = mounted();
        assert!(!session.clear_artwork());
        session
            .load_artwork(&UploadedAsset::vector("logo.svg", LOGO), None)
            .unwrap();
        assert!(session.clear_artwork());
        assert!(session.artwork().is_none());
        assert_eq!(session.guard_count(), 0);
    }

    #[tokio::test]
    async fn test_garment_load_places_guide_above() {
        let mut session = mounted();
        session
            .load_garment(&EmbeddedTemplateSource, "#dc2626")
            .await
            .unwrap();
        let roles: Vec<_> = session.scene().iter().map(|o| o.role()).collect();
        assert_eq!(roles, vec![ObjectRole::Garment, ObjectRole::PrintAreaGuide]);
        assert_eq!(session.garment_color(), Rgba::from_hex("#dc2626"));
        assert_eq!(
            session.garment().unwrap().position,
            merchmagic_core::Point::new(300.0, 390.0)
        );
    }

    #[tokio::test]
    async fn test_invalid_garment_colour_is_parse_error() {
        let mut session = mounted();
        session
            .load_garment(&EmbeddedTemplateSource, "#2563eb")
            .await
            .unwrap();

        let err = session
            .load_garment(&EmbeddedTemplateSource, "navy")
            .await
            .unwrap_err();
        assert!(err.is_parse_error());
        assert_eq!(session.garment_color(), Rgba::from_hex("#2563eb"));
        assert_eq!(session.scene().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_garment_load_keeps_previous() {
        let mut session = mounted();
        let id = session
            .load_garment(&EmbeddedTemplateSource, "#ffffff")
            .await
            .unwrap()
            .applied_id();

        let empty = MemoryTemplateSource::new();
        let err = session.load_garment(&empty, "#111827").await.unwrap_err();
        assert!(err.is_load_error());
        assert_eq!(session.garment().map(|g| g.id), id);
        assert_eq!(session.garment_color(), Some(Rgba::WHITE));

        assert!(session
            .load_garment(&EmbeddedTemplateSource, "not-a-colour")
            .await
            .is_err());
    }
}

//! Load supersession, guard bookkeeping and surface lifecycle.

use std::time::Duration;

use async_trait::async_trait;
use merchmagic_composer::{
    fetch_garment, ArtworkContent, CompositionSession, EmbeddedTemplateSource, LoadOutcome,
    LoadRole, TemplateSource, UploadedAsset, SHIRT_BASE_SVG,
};
use merchmagic_core::{AssetError, Rgba};

const LOGO: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
    <rect width="100" height="100" fill="#0ea5e9"/>
</svg>"##;

/// Serves the shirt after a fixed delay.
struct SlowSource {
    delay: Duration,
}

#[async_trait]
impl TemplateSource for SlowSource {
    async fn fetch(&self, _id: &str) -> Result<String, AssetError> {
        tokio::time::sleep(self.delay).await;
        Ok(SHIRT_BASE_SVG.to_string())
    }
}

#[tokio::test]
async fn test_last_issued_garment_load_wins() {
    let mut session = CompositionSession::default();
    session.mount_surface();
    let template_id = session.config().garment_template_id.clone();

    let red = Rgba::from_hex("#dc2626").unwrap();
    let blue = Rgba::from_hex("#2563eb").unwrap();

    let slow = SlowSource {
        delay: Duration::from_millis(40),
    };
    let fast = SlowSource {
        delay: Duration::from_millis(1),
    };

    // Red is requested first but finishes last.
    let red_ticket = session.begin_load(LoadRole::Garment);
    let blue_ticket = session.begin_load(LoadRole::Garment);
    let (red_graphic, blue_graphic) = tokio::join!(
        fetch_garment(&slow, &template_id, red),
        fetch_garment(&fast, &template_id, blue),
    );

    let blue_outcome = session
        .commit_garment(blue_ticket, blue_graphic.unwrap(), blue)
        .unwrap();
    let red_outcome = session
        .commit_garment(red_ticket, red_graphic.unwrap(), red)
        .unwrap();

    assert!(blue_outcome.is_applied());
    assert_eq!(red_outcome, LoadOutcome::Superseded);
    assert_eq!(session.garment_color(), Some(blue));
    assert_eq!(session.garment().map(|g| g.id), blue_outcome.applied_id());
}

#[tokio::test]
async fn test_reloads_do_not_accumulate_guards() {
    let mut session = CompositionSession::default();
    session.mount_surface();
    session
        .load_garment(&EmbeddedTemplateSource, "#ffffff")
        .await
        .unwrap();

    for _ in 0..5 {
        let restored = session.current_transform();
        session
            .load_artwork(&UploadedAsset::vector("logo.svg", LOGO), Some(restored.into()))
            .unwrap();
        session
            .load_garment(&EmbeddedTemplateSource, "#111827")
            .await
            .unwrap();
    }
    assert_eq!(session.guard_count(), 3);
    assert_eq!(session.scene().len(), 3);

    session.clear_artwork();
    assert_eq!(session.guard_count(), 0);
}

#[tokio::test]
async fn test_restored_transform_survives_garment_change() {
    let mut session = CompositionSession::default();
    session.mount_surface();
    session
        .load_garment(&EmbeddedTemplateSource, "#ffffff")
        .await
        .unwrap();
    session
        .load_artwork(&UploadedAsset::vector("logo.svg", LOGO), None)
        .unwrap();
    session.interact(
        merchmagic_composer::InteractionKind::Moving,
        merchmagic_composer::PoseUpdate::move_to(220.0, 260.0),
    );
    let saved = session
        .interact(
            merchmagic_composer::InteractionKind::Modified,
            merchmagic_composer::PoseUpdate::none(),
        )
        .unwrap();

    // The presentation layer rebuilds the artwork from the saved record.
    session
        .load_garment(&EmbeddedTemplateSource, "#dc2626")
        .await
        .unwrap();
    session
        .load_artwork(&UploadedAsset::vector("logo.svg", LOGO), Some(saved.into()))
        .unwrap();
    assert_eq!(session.current_transform(), saved);
}

#[tokio::test]
async fn test_operations_after_dispose_fail() {
    let mut session = CompositionSession::default();
    session.mount_surface();
    session
        .load_garment(&EmbeddedTemplateSource, "#ffffff")
        .await
        .unwrap();
    session.dispose();

    let err = session
        .load_garment(&EmbeddedTemplateSource, "#ffffff")
        .await
        .unwrap_err();
    assert!(err.is_surface_error());
    assert!(session.flatten(10, 10).unwrap_err().is_surface_error());
    assert!(session.apply_preset("flat-shadow", 0).unwrap_err().is_surface_error());

    session.mount_surface();
    assert!(session
        .load_garment(&EmbeddedTemplateSource, "#ffffff")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_dispose_supersedes_loads_in_flight() {
    let mut session = CompositionSession::default();
    session.mount_surface();
    let template_id = session.config().garment_template_id.clone();
    let white = Rgba::WHITE;

    let garment_ticket = session.begin_load(LoadRole::Garment);
    let artwork_ticket = session.begin_load(LoadRole::Artwork);
    let graphic = fetch_garment(&EmbeddedTemplateSource, &template_id, white)
        .await
        .unwrap();
    let asset = UploadedAsset::vector("logo.svg", LOGO);
    let content = ArtworkContent::decode(&asset).unwrap();

    session.dispose();
    session.mount_surface();

    assert!(!session.is_current(&garment_ticket));
    assert!(!session.is_current(&artwork_ticket));
    let garment = session
        .commit_garment(garment_ticket, graphic, white)
        .unwrap();
    let artwork = session
        .commit_artwork(artwork_ticket, content, None)
        .unwrap();
    assert_eq!(garment, LoadOutcome::Superseded);
    assert_eq!(artwork, LoadOutcome::Superseded);
    assert!(session.scene().is_empty());
    assert_eq!(session.guard_count(), 0);

    // Loads issued after the remount apply normally.
    assert!(session
        .load_garment(&EmbeddedTemplateSource, "#ffffff")
        .await
        .unwrap()
        .is_applied());
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let mut a = CompositionSession::default();
    let mut b = CompositionSession::default();
    a.mount_surface();
    b.mount_surface();
    a.load_artwork(&UploadedAsset::vector("logo.svg", LOGO), None)
        .unwrap();

    assert!(a.artwork().is_some());
    assert!(b.artwork().is_none());
    assert_eq!(b.guard_count(), 0);
}

//! End-to-end placement scenarios: load, fit, clamp, reset.

use merchmagic_composer::{
    CompositionSession, EmbeddedTemplateSource, InteractionKind, ObjectRole, PoseUpdate,
    UploadedAsset,
};
use merchmagic_core::{OverflowPolicy, Rect};
use merchmagic_settings::SessionConfig;
use proptest::prelude::*;

const LOGO_1000: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="1000" height="1000">
    <rect x="100" y="100" width="800" height="800" fill="#f97316"/>
</svg>"##;

const BADGE_200: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200">
    <circle cx="100" cy="100" r="90" fill="#16a34a"/>
</svg>"##;

fn png_1000() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(1000, 1000, image::Rgba([200, 30, 30, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

async fn session_with_garment() -> CompositionSession {
    let mut session = CompositionSession::default();
    session.mount_surface();
    session
        .load_garment(&EmbeddedTemplateSource, "#111827")
        .await
        .unwrap();
    session
}

fn assert_contained(session: &CompositionSession) {
    let bb = session.artwork().unwrap().bounding_box();
    assert!(
        session.print_area().contains_rect(&bb, 1e-6),
        "{:?} escapes {:?}",
        bb,
        session.print_area()
    );
}

#[tokio::test]
async fn test_fresh_upload_is_fitted_and_centered() {
    let expected_scale = 0.8 * 320.0_f64.min(420.0) / 1000.0;

    for asset in [
        UploadedAsset::vector("logo.svg", LOGO_1000),
        UploadedAsset::from_png_bytes("logo.png", &png_1000()),
    ] {
        let mut session = session_with_garment().await;
        session.load_artwork(&asset, None).unwrap();

        let record = session.current_transform();
        assert!((record.scale - expected_scale).abs() < 1e-9);
        assert_eq!(record.position(), session.print_area().center());
        assert_eq!(record.angle, 0.0);
        assert_contained(&session);
    }
}

#[tokio::test]
async fn test_z_order_after_loads() {
    let mut session = session_with_garment().await;
    session
        .load_artwork(&UploadedAsset::vector("logo.svg", LOGO_1000), None)
        .unwrap();
    // Reloading the garment keeps it at the bottom.
    session
        .load_garment(&EmbeddedTemplateSource, "#2563eb")
        .await
        .unwrap();

    let roles: Vec<_> = session.scene().iter().map(|o| o.role()).collect();
    assert_eq!(
        roles,
        vec![ObjectRole::Garment, ObjectRole::PrintAreaGuide, ObjectRole::Artwork]
    );
}

#[tokio::test]
async fn test_out_of_bounds_drag_is_pinned_to_left_edge() {
    let mut session = session_with_garment().await;
    session
        .load_artwork(&UploadedAsset::vector("logo.svg", LOGO_1000), None)
        .unwrap();
    let area = session.print_area();

    session.interact(
        InteractionKind::Moving,
        PoseUpdate::move_to(area.left - 500.0, area.top),
    );

    let bb = session.artwork().unwrap().bounding_box();
    assert!((bb.left - area.left).abs() < 1e-9);
    assert_contained(&session);
}

#[tokio::test]
async fn test_reset_after_arbitrary_gestures() {
    let mut session = session_with_garment().await;
    session
        .load_artwork(&UploadedAsset::vector("badge.svg", BADGE_200), None)
        .unwrap();

    session.interact(InteractionKind::Moving, PoseUpdate::move_to(420.0, 250.0));
    session.interact(InteractionKind::Scaling, PoseUpdate::scale_to(0.4));
    session.interact(InteractionKind::Rotating, PoseUpdate::rotate_to(73.0));
    session.interact(InteractionKind::Modified, PoseUpdate::none());

    assert!(session.reset_artwork());
    let record = session.current_transform();
    assert_eq!(record.scale, 1.0);
    assert_eq!(record.angle, 0.0);
    assert_eq!(record.position(), session.print_area().center());
    assert_eq!(session.take_transform_update(), Some(record));
}

#[tokio::test]
async fn test_center_keeps_scale_and_rotation() {
    let mut session = session_with_garment().await;
    session
        .load_artwork(&UploadedAsset::vector("badge.svg", BADGE_200), None)
        .unwrap();
    session.interact(InteractionKind::Moving, PoseUpdate::move_to(200.0, 250.0));
    session.interact(InteractionKind::Rotating, PoseUpdate::rotate_to(15.0));

    let before = session.current_transform();
    assert!(session.center_artwork());
    let after = session.current_transform();
    assert_eq!(after.position(), session.print_area().center());
    assert_eq!(after.scale, before.scale);
    assert_eq!(after.angle, 15.0);
}

#[tokio::test]
async fn test_oversized_artwork_follows_overflow_policy() {
    let mut config = SessionConfig::default();
    config.artwork.overflow_policy = OverflowPolicy::Center;
    let mut session = CompositionSession::new(config);
    session.mount_surface();
    session
        .load_artwork(&UploadedAsset::vector("logo.svg", LOGO_1000), None)
        .unwrap();

    // 1000 wide at unit scale cannot fit a 320 wide print area.
    session.reset_artwork();
    assert_eq!(
        session.current_transform().position(),
        session.print_area().center()
    );

    let mut session = CompositionSession::default();
    session.mount_surface();
    session
        .load_artwork(&UploadedAsset::vector("logo.svg", LOGO_1000), None)
        .unwrap();
    session.reset_artwork();
    let bb = session.artwork().unwrap().bounding_box();
    let area = session.print_area();
    assert!((bb.left - area.left).abs() < 1e-9);
    assert!((bb.top - area.top).abs() < 1e-9);
}

#[tokio::test]
async fn test_restored_position_is_clamped_on_load() {
    let mut session = session_with_garment().await;
    let restored = merchmagic_core::RestoredTransform {
        x: Some(10.0),
        y: Some(10.0),
        ..Default::default()
    };
    session
        .load_artwork(&UploadedAsset::vector("logo.svg", LOGO_1000), Some(restored))
        .unwrap();
    assert_contained(&session);
}

fn mounted_with_badge() -> CompositionSession {
    let mut session = CompositionSession::default();
    session.mount_surface();
    session
        .load_artwork(&UploadedAsset::vector("badge.svg", BADGE_200), None)
        .unwrap();
    session
}

proptest! {
    #[test]
    fn prop_gestures_never_escape_print_area(
        x in -400.0f64..1000.0,
        y in -400.0f64..1200.0,
        scale in 0.05f64..1.1,
        angle in 0.0f64..360.0,
    ) {
        let mut session = mounted_with_badge();
        session.interact(InteractionKind::Moving, PoseUpdate::move_to(x, y));
        session.interact(InteractionKind::Scaling, PoseUpdate::scale_to(scale));
        session.interact(InteractionKind::Rotating, PoseUpdate::rotate_to(angle));
        let published = session.interact(InteractionKind::Modified, PoseUpdate::none());

        let area: Rect = session.print_area();
        let bb = session.artwork().unwrap().bounding_box();
        // 200 * 1.1 rotated by 45 degrees is ~311 wide, always fits.
        prop_assert!(area.contains_rect(&bb, 1e-6));
        prop_assert_eq!(published, Some(session.current_transform()));
    }
}

/*
 *  tests/gallery_integration.rs
 *
 *  Integration tests for layout classification and banner insets
 *
 *  PhotoGallery - responsive grid, banner aware
 *  (c) 2020-26 Stuart Hunter
 */

use std::time::Duration;

use photogallery::ads::{AdLoadError, SimulatedBanner, TEST_AD_UNIT_ID};
use photogallery::inset::{AdAwareInsetController, AdHeightState, InsetConfig, SystemInsets};
use photogallery::layout::{classify, DisplayMetrics, GridSpacing, Orientation, ScreenCategory, ScreenMetrics};
use photogallery::screen::{GalleryScreen, GallerySettings, ScreenEvent};
use photogallery::state::{lock, AppState};

fn settings() -> GallerySettings {
    GallerySettings { insets: InsetConfig::default(), ad_unit_id: TEST_AD_UNIT_ID.to_string() }
}

#[test]
fn test_device_catalogue() {
    let cases = [
        (411, 891, Orientation::Portrait, ScreenCategory::Phone, 3),
        (891, 411, Orientation::Landscape, ScreenCategory::PhoneLandscape, 6),
        (800, 1280, Orientation::Portrait, ScreenCategory::Tablet, 3),
        (1280, 800, Orientation::Landscape, ScreenCategory::Tablet, 6),
        (673, 841, Orientation::Portrait, ScreenCategory::FoldableUnfolded, 3),
        (841, 673, Orientation::Landscape, ScreenCategory::FoldableUnfolded, 3),
    ];
    for (w, h, orientation, category, columns) in cases {
        let profile = classify(&ScreenMetrics::new(w, h, orientation).unwrap());
        assert_eq!(profile.category, category, "{w}x{h}");
        assert_eq!(profile.columns, columns, "{w}x{h}");
    }
}

#[test]
fn test_degenerate_metrics_rejected() {
    assert!(ScreenMetrics::new(0, 800, Orientation::Portrait).is_err());
    assert!(ScreenMetrics::new(400, -1, Orientation::Portrait).is_err());
    assert!(DisplayMetrics::new(1080, 2400, 0.0).is_err());
}

#[test]
fn test_grid_spacing_from_profile() {
    let display = DisplayMetrics::new(1080, 2400, 3.0).unwrap();
    let profile = classify(&display.screen_metrics(Orientation::Portrait).unwrap());
    let spacing = GridSpacing::for_profile(&profile, &display).unwrap();
    assert_eq!(spacing.span_count(), 3);
    assert_eq!(spacing.spacing_px(), 24);
}

#[test]
fn test_late_outcome_from_superseded_load() {
    let display = DisplayMetrics::new(1080, 2400, 3.0).unwrap();
    let profile = classify(&display.screen_metrics(Orientation::Portrait).unwrap());
    let mut controller = AdAwareInsetController::new(InsetConfig::default(), profile, display);

    let a = controller.current_token();
    let b = controller.on_reload_requested();
    controller.on_ad_height_resolved(b, 200);
    controller.on_ad_height_resolved(a, 500);

    assert_eq!(controller.ad_state(), AdHeightState::Resolved(200));
    assert_eq!(controller.reserved_space().bottom, 200 + 72 + 117);
}

#[tokio::test]
async fn test_screen_survives_rotation_storm() {
    let display = DisplayMetrics::new(1080, 2400, 3.0).unwrap();
    let landscape = DisplayMetrics::new(2400, 1080, 3.0).unwrap();
    let (mut screen, mut events) = GalleryScreen::new(
        settings(),
        display,
        Orientation::Portrait,
        SimulatedBanner::loaded(150, Duration::from_millis(5)),
        None,
        AppState::shared(),
    )
    .unwrap();
    screen.start();

    for i in 0..4 {
        let (d, o) = if i % 2 == 0 { (landscape, Orientation::Landscape) } else { (display, Orientation::Portrait) };
        screen.handle(ScreenEvent::ConfigurationChanged { display: d, orientation: o });
        screen.handle(ScreenEvent::InsetsApplied(SystemInsets::new(84, 144, 0)));
    }

    // only the last load can resolve; anything earlier is stale or aborted
    let event = tokio::time::timeout(Duration::from_secs(2), events.recv()).await.unwrap().unwrap();
    screen.handle(event);

    assert_eq!(screen.profile().category, ScreenCategory::Phone);
    assert_eq!(screen.controller().ad_state(), AdHeightState::Resolved(150));
    assert_eq!(screen.controller().reserved_space().bottom, 150 + 72 + 117);
    assert_eq!(screen.controller().reserved_space().left, 0);
}

#[tokio::test]
async fn test_failed_banner_never_zero() {
    let display = DisplayMetrics::new(1440, 3120, 3.5).unwrap();
    let (mut screen, mut events) = GalleryScreen::new(
        settings(),
        display,
        Orientation::Portrait,
        SimulatedBanner::failing(AdLoadError::new(2, "Network error"), Duration::ZERO),
        None,
        AppState::shared(),
    )
    .unwrap();
    screen.start();
    let event = events.recv().await.unwrap();
    screen.handle(event);

    // 280 fallback + 84 margin + (480 * 13 / 10) / 4
    assert_eq!(screen.controller().reserved_space().bottom, 280 + 84 + 156);
    assert!(!lock(screen.state()).icon_urls_loaded());
}

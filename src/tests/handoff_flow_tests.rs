//! Tests for the navigation/session-store handoff through the app.

use web_time::Instant;

use super::{ms, png_1k, serve_read, signed_in_app};
use crate::app::{PlanviewApp, View};
use crate::config::AppConfig;
use crate::handoff::{MemorySessionStore, Route, SessionKey, SessionStore, storage_key};
use crate::message::Message;
use crate::model::EncodedImage;
use crate::upload::UploadView;
use crate::visualizer::VisualizerView;

/// Run one upload to completion and return the visualizer's session key.
fn complete_upload(app: &mut PlanviewApp, t0: Instant) -> SessionKey {
    app.update(Message::FilesPicked(vec![png_1k("plan.png")]), t0);
    serve_read(app, t0);
    assert!(app.tick(t0 + ms(1500)));
    match app.route() {
        Route::Visualizer(key) => key.clone(),
        Route::Home => panic!("expected visualizer route"),
    }
}

#[test]
fn test_completion_writes_session_store() {
    let t0 = Instant::now();
    let mut app = signed_in_app(t0);
    let key = complete_upload(&mut app, t0);

    let stored = app
        .channel()
        .store()
        .get_item(&storage_key(&key))
        .unwrap()
        .unwrap();
    assert!(stored.starts_with("data:image/png;base64,"));
    assert_eq!(Some(stored.as_str()), app.visualizer().unwrap().image().map(|i| i.as_str()));
}

#[test]
fn test_reload_recovers_image_from_store() {
    let t0 = Instant::now();
    let mut app = signed_in_app(t0);
    let key = complete_upload(&mut app, t0);
    let before = app.view();

    app.update(Message::Reload, t0 + ms(2000));
    assert_eq!(app.route(), &Route::Visualizer(key));
    assert_eq!(app.view(), before);
}

#[test]
fn test_reload_without_store_shows_empty_state() {
    let t0 = Instant::now();
    let mut app = PlanviewApp::new(AppConfig::default(), MemorySessionStore::disabled());
    app.update(Message::SignedInChanged(true), t0);
    complete_upload(&mut app, t0);

    // Navigation state alone carries the image across the transition
    assert!(matches!(
        app.view(),
        View::Visualizer(VisualizerView::Image { .. })
    ));

    app.update(Message::Reload, t0 + ms(2000));
    assert!(matches!(
        app.view(),
        View::Visualizer(VisualizerView::Empty { .. })
    ));
}

#[test]
fn test_deep_link_without_entry_shows_empty_state_and_back_works() {
    let t0 = Instant::now();
    let app_store = MemorySessionStore::new();
    let mut app = PlanviewApp::open(AppConfig::default(), app_store, "/visualizer/unknown");

    assert_eq!(
        app.route(),
        &Route::Visualizer(SessionKey::new("unknown"))
    );
    assert!(matches!(
        app.view(),
        View::Visualizer(VisualizerView::Empty { .. })
    ));

    let back = app.visualizer().unwrap().go_back();
    app.update(Message::Navigate(back), t0);
    assert_eq!(app.route(), &Route::Home);
    assert!(matches!(app.view(), View::Upload(UploadView::Dropzone { .. })));
}

#[test]
fn test_deep_link_with_stored_entry() {
    let image = EncodedImage::encode("image/png", b"from an earlier page load");
    let mut store = MemorySessionStore::new();
    store
        .set_item(&storage_key(&SessionKey::new("abc")), image.as_str())
        .unwrap();

    let app = PlanviewApp::open(AppConfig::default(), store, "/visualizer/abc");
    assert_eq!(app.visualizer().unwrap().image(), Some(&image));
}

#[test]
fn test_deep_link_with_corrupted_entry() {
    let mut store = MemorySessionStore::new();
    store
        .set_item(&storage_key(&SessionKey::new("abc")), "{\"image\":null}")
        .unwrap();

    let app = PlanviewApp::open(AppConfig::default(), store, "/visualizer/abc");
    assert!(app.visualizer().unwrap().image().is_none());
}

#[test]
fn test_unknown_path_opens_home() {
    let app = PlanviewApp::open(AppConfig::default(), MemorySessionStore::new(), "/nope/x");
    assert_eq!(app.route(), &Route::Home);
}

#[test]
fn test_each_upload_gets_its_own_entry() {
    let t0 = Instant::now();
    let mut app = signed_in_app(t0);
    let first = complete_upload(&mut app, t0);

    app.update(Message::GoHome, t0 + ms(2000));
    let second = complete_upload(&mut app, t0 + ms(3000));
    assert_ne!(first, second);

    let store = app.channel().store();
    assert!(store.get_item(&storage_key(&first)).unwrap().is_some());
    assert!(store.get_item(&storage_key(&second)).unwrap().is_some());
}

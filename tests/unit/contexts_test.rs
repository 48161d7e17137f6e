//! Integration tests wiring the three contexts together over an
//! in-memory database: navigation announcements, bookmark capture,
//! popup command flows and the connection liveness check.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use seekmark::app::App;
use seekmark::contexts::{CaptureRequest, NavigationEvent};
use seekmark::database::KeyValueBackend;
use seekmark::managers::PlayerSurface;
use seekmark::types::Bookmark;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=abc123";

#[derive(Default)]
struct SurfaceState {
    current_time: f64,
    duration: f64,
    title: Option<String>,
    control_installed: bool,
    last_seek: Option<f64>,
}

/// Player surface backed by shared state so tests can script the page
/// while the context owns the surface.
#[derive(Clone, Default)]
struct SharedSurface(Arc<Mutex<SurfaceState>>);

impl SharedSurface {
    fn set_time(&self, time: f64) {
        self.0.lock().unwrap().current_time = time;
    }

    fn last_seek(&self) -> Option<f64> {
        self.0.lock().unwrap().last_seek
    }
}

impl PlayerSurface for SharedSurface {
    fn controls_present(&self) -> bool {
        true
    }

    fn player_present(&self) -> bool {
        true
    }

    fn current_time(&self) -> Option<f64> {
        Some(self.0.lock().unwrap().current_time)
    }

    fn duration(&self) -> Option<f64> {
        Some(self.0.lock().unwrap().duration)
    }

    fn title(&self) -> Option<String> {
        self.0.lock().unwrap().title.clone()
    }

    fn thumbnail_url(&self) -> Option<String> {
        None
    }

    fn seek(&mut self, time: f64) -> bool {
        self.0.lock().unwrap().last_seek = Some(time);
        true
    }

    fn control_installed(&self) -> bool {
        self.0.lock().unwrap().control_installed
    }

    fn install_control(&mut self) -> bool {
        self.0.lock().unwrap().control_installed = true;
        true
    }
}

struct Harness {
    app: App,
    surface: SharedSurface,
    nav_tx: mpsc::Sender<NavigationEvent>,
    capture_tx: mpsc::Sender<CaptureRequest>,
}

impl Harness {
    fn new() -> Self {
        let app = App::in_memory().expect("open in-memory db");
        let surface = SharedSurface::default();
        let nav_tx = app.spawn_tracker();
        let capture_tx = app.spawn_page(surface.clone());
        Self {
            app,
            surface,
            nav_tx,
            capture_tx,
        }
    }

    async fn navigate(&self, url: &str) {
        self.nav_tx
            .send(NavigationEvent {
                url: url.to_string(),
            })
            .await
            .expect("tracker running");
        // Let the announcement reach the page context.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    async fn capture(&self, desc: &str) -> Result<Vec<Bookmark>, String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.capture_tx
            .send(CaptureRequest {
                desc: desc.to_string(),
                reply: reply_tx,
            })
            .await
            .expect("page running");
        reply_rx.await.expect("capture answered")
    }
}

#[tokio::test(start_paused = true)]
async fn test_navigation_flows_through_to_popup() {
    let harness = Harness::new();
    harness
        .surface
        .0
        .lock()
        .unwrap()
        .title
        .replace("Some Video".to_string());

    harness.navigate(WATCH_URL).await;

    let mut popup = harness.app.popup();
    popup.open().await;

    assert_eq!(popup.video_id(), Some("abc123"));
    assert_eq!(popup.video_data().title, "Some Video");
    assert_eq!(popup.notice(), None);
    assert_eq!(popup.bookmark_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_popup_without_active_video_shows_notice() {
    let harness = Harness::new();

    let mut popup = harness.app.popup();
    popup.open().await;

    assert_eq!(popup.video_id(), None);
    assert_eq!(popup.notice(), Some("This is not a video page"));
}

#[tokio::test(start_paused = true)]
async fn test_capture_saves_at_current_position() {
    let harness = Harness::new();
    harness.navigate(WATCH_URL).await;
    harness.surface.set_time(125.0);

    let list = harness.capture("").await.expect("bookmark saved");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].time, 125.0);
    assert_eq!(list[0].desc, "Bookmark at 00:02:05");

    // Visible from a fresh popup through shared storage.
    let mut popup = harness.app.popup();
    popup.open().await;
    assert_eq!(popup.bookmark_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_capture_rejected_before_playback_starts() {
    let harness = Harness::new();
    harness.navigate(WATCH_URL).await;
    harness.surface.set_time(0.0);

    let err = harness.capture("x").await.unwrap_err();
    assert_eq!(err, "cannot bookmark at 0 seconds");
}

#[tokio::test(start_paused = true)]
async fn test_capture_without_session_is_rejected() {
    let harness = Harness::new();
    harness.surface.set_time(30.0);

    let err = harness.capture("x").await.unwrap_err();
    assert_eq!(err, "no active video session");
}

#[tokio::test(start_paused = true)]
async fn test_play_seeks_the_player() {
    let harness = Harness::new();
    harness.navigate(WATCH_URL).await;

    let mut popup = harness.app.popup();
    popup.open().await;

    assert!(popup.play(42.5).await);
    assert_eq!(harness.surface.last_seek(), Some(42.5));
}

#[tokio::test(start_paused = true)]
async fn test_play_with_invalid_time_fails_without_seeking() {
    let harness = Harness::new();
    harness.navigate(WATCH_URL).await;

    let mut popup = harness.app.popup();
    popup.open().await;

    assert!(!popup.play(f64::NAN).await);
    assert!(!popup.play(-5.0).await);
    assert_eq!(harness.surface.last_seek(), None);
}

#[tokio::test(start_paused = true)]
async fn test_delete_updates_popup_and_storage() {
    let harness = Harness::new();
    harness
        .app
        .backend()
        .set(
            "abc123",
            r#"[{"time":5,"desc":"intro","timestamp":1},{"time":50,"desc":"chorus","timestamp":2}]"#,
        )
        .unwrap();
    harness.navigate(WATCH_URL).await;

    let mut popup = harness.app.popup();
    popup.open().await;
    assert_eq!(popup.bookmark_count(), 2);

    popup.delete(50.0).await;
    assert_eq!(popup.bookmark_count(), 1);
    assert_eq!(popup.visible_bookmarks()[0].desc, "intro");

    let raw = harness
        .app
        .backend()
        .get("abc123")
        .unwrap()
        .expect("key still present");
    assert!(raw.contains("intro"));
    assert!(!raw.contains("chorus"));
}

#[tokio::test(start_paused = true)]
async fn test_edit_applies_through_popup() {
    let harness = Harness::new();
    harness.navigate(WATCH_URL).await;
    harness.surface.set_time(10.0);
    harness.capture("old").await.unwrap();

    let mut popup = harness.app.popup();
    popup.open().await;

    // Dismissed and unchanged prompts leave the description alone.
    popup.edit(10.0, None).await;
    popup.edit(10.0, Some("old")).await;
    assert_eq!(popup.visible_bookmarks()[0].desc, "old");

    popup.edit(10.0, Some("  new  ")).await;
    assert_eq!(popup.visible_bookmarks()[0].desc, "new");
}

#[tokio::test(start_paused = true)]
async fn test_check_connection_with_live_page() {
    let harness = Harness::new();
    harness.navigate(WATCH_URL).await;

    let mut popup = harness.app.popup();
    popup.open().await;

    assert!(popup.check_connection().await);
    assert_eq!(popup.notice(), None);
}

#[tokio::test(start_paused = true)]
async fn test_check_connection_reports_dead_page() {
    // Tracker only; the page context never came up.
    let app = App::in_memory().expect("open in-memory db");
    let _nav_tx = app.spawn_tracker();

    let mut popup = app.popup();
    popup.open().await;

    assert!(!popup.check_connection().await);
    assert_eq!(
        popup.notice(),
        Some("Extension connection lost, refresh the page")
    );
}

#[tokio::test(start_paused = true)]
async fn test_check_connection_resyncs_after_video_change() {
    let harness = Harness::new();
    harness.navigate(WATCH_URL).await;

    let mut popup = harness.app.popup();
    popup.open().await;
    assert_eq!(popup.video_id(), Some("abc123"));

    harness.navigate("https://www.youtube.com/watch?v=xyz789").await;

    assert!(popup.check_connection().await);
    assert_eq!(popup.video_id(), Some("xyz789"));
}

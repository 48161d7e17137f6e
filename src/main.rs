//! seekmark demo harness.
//!
//! Drives the three contexts over newline-delimited JSON on stdin, with a
//! simulated player surface standing in for the DOM. One JSON object per
//! line in, one JSON response per line out; logs go to stderr.
//!
//! Events:
//!   {"event":"navigate","url":"https://www.youtube.com/watch?v=abc123"}
//!   {"event":"player.set","time":42.5,"duration":300,"title":"..."}
//!   {"event":"capture","desc":"chorus"}
//!   {"event":"popup.open"}
//!   {"event":"popup.list","search":"","filter":"all","sort":"time"}
//!   {"event":"popup.play","time":42.5}
//!   {"event":"popup.delete","time":42.5}
//!   {"event":"popup.edit","time":42.5,"desc":"new text"}
//!   {"event":"popup.check"}

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use seekmark::app::App;
use seekmark::contexts::{CaptureRequest, NavigationEvent};
use seekmark::managers::PlayerSurface;
use seekmark::services::popup_presenter::{DateFilter, SortKey};

/// Mutable model behind the simulated surface.
#[derive(Default)]
struct PlayerModel {
    current_time: f64,
    duration: f64,
    title: String,
    thumbnail: String,
    control_installed: bool,
}

/// Player surface backed by a shared in-process model.
#[derive(Clone)]
struct SimulatedSurface {
    model: Arc<Mutex<PlayerModel>>,
}

impl PlayerSurface for SimulatedSurface {
    fn controls_present(&self) -> bool {
        true
    }

    fn player_present(&self) -> bool {
        true
    }

    fn current_time(&self) -> Option<f64> {
        Some(self.model.lock().unwrap().current_time)
    }

    fn duration(&self) -> Option<f64> {
        Some(self.model.lock().unwrap().duration)
    }

    fn title(&self) -> Option<String> {
        let title = self.model.lock().unwrap().title.clone();
        (!title.is_empty()).then_some(title)
    }

    fn thumbnail_url(&self) -> Option<String> {
        let url = self.model.lock().unwrap().thumbnail.clone();
        (!url.is_empty()).then_some(url)
    }

    fn seek(&mut self, time: f64) -> bool {
        self.model.lock().unwrap().current_time = time;
        true
    }

    fn control_installed(&self) -> bool {
        self.model.lock().unwrap().control_installed
    }

    fn install_control(&mut self) -> bool {
        self.model.lock().unwrap().control_installed = true;
        true
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let db_path = std::env::var("SEEKMARK_DB").unwrap_or_else(|_| "seekmark.db".to_string());
    let app = App::new(&db_path)?;

    let model = Arc::new(Mutex::new(PlayerModel::default()));
    let surface = SimulatedSurface {
        model: model.clone(),
    };

    let nav_tx = app.spawn_tracker();
    let capture_tx = app.spawn_page(surface);
    let mut popup = app.popup();

    println!(
        "{}",
        json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let event: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(err) => {
                println!("{}", json!({"error": format!("parse error: {}", err)}));
                continue;
            }
        };

        let kind = event.get("event").and_then(Value::as_str).unwrap_or("");
        let response = match kind {
            "navigate" => {
                let url = event.get("url").and_then(Value::as_str).unwrap_or("");
                let _ = nav_tx
                    .send(NavigationEvent {
                        url: url.to_string(),
                    })
                    .await;
                // Give the announce a moment to reach the page context.
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                json!({"ok": true})
            }
            "player.set" => {
                let mut m = model.lock().unwrap();
                if let Some(t) = event.get("time").and_then(Value::as_f64) {
                    m.current_time = t;
                }
                if let Some(d) = event.get("duration").and_then(Value::as_f64) {
                    m.duration = d;
                }
                if let Some(t) = event.get("title").and_then(Value::as_str) {
                    m.title = t.to_string();
                }
                json!({"ok": true})
            }
            "capture" => {
                let desc = event
                    .get("desc")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let (reply_tx, reply_rx) = oneshot::channel();
                let sent = capture_tx
                    .send(CaptureRequest {
                        desc,
                        reply: reply_tx,
                    })
                    .await
                    .is_ok();
                if sent {
                    match reply_rx.await {
                        Ok(Ok(list)) => json!({"ok": true, "bookmarks": list}),
                        Ok(Err(err)) => json!({"ok": false, "error": err}),
                        Err(_) => json!({"ok": false, "error": "page context gone"}),
                    }
                } else {
                    json!({"ok": false, "error": "page context gone"})
                }
            }
            "popup.open" => {
                popup.open().await;
                json!({
                    "videoId": popup.video_id(),
                    "video": popup.video_data(),
                    "count": popup.bookmark_count(),
                    "notice": popup.notice(),
                })
            }
            "popup.list" => {
                if let Some(s) = event.get("search").and_then(Value::as_str) {
                    popup.query.search = s.to_string();
                }
                if let Some(f) = event.get("filter").and_then(Value::as_str) {
                    popup.query.date_filter = DateFilter::from_option_value(f);
                }
                if let Some(s) = event.get("sort").and_then(Value::as_str) {
                    popup.query.sort = SortKey::from_option_value(s);
                }
                json!(popup.visible_bookmarks())
            }
            "popup.play" => {
                let time = event.get("time").and_then(Value::as_f64).unwrap_or(f64::NAN);
                let success = popup.play(time).await;
                json!({"success": success, "notice": popup.notice()})
            }
            "popup.delete" => {
                let time = event.get("time").and_then(Value::as_f64).unwrap_or(f64::NAN);
                popup.delete(time).await;
                json!({"count": popup.bookmark_count(), "notice": popup.notice()})
            }
            "popup.edit" => {
                let time = event.get("time").and_then(Value::as_f64).unwrap_or(f64::NAN);
                let desc = event.get("desc").and_then(Value::as_str);
                popup.edit(time, desc).await;
                json!({"count": popup.bookmark_count(), "notice": popup.notice()})
            }
            "popup.check" => {
                let alive = popup.check_connection().await;
                json!({"alive": alive, "notice": popup.notice()})
            }
            other => {
                warn!(event = other, "unknown event");
                json!({"error": format!("unknown event: {}", other)})
            }
        };

        println!("{}", response);
    }

    Ok(())
}

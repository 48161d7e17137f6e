//! Page context.
//!
//! Owns the active video session and its bookmark list. Dispatches the
//! page-bound half of the protocol (`NEW`, `PLAY`, `DELETE`,
//! `GET_VIDEO_DATA`), drives control injection with unbounded 1-second
//! retries while the page is still rendering, and exposes the bookmark
//! capture path wired to the injected control.
//!
//! Every handler failure is logged and answered; nothing terminates the
//! context.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use crate::managers::{BookmarkStore, PlayerAdapter, PlayerSurface};
use crate::message_router::{CommandAck, ContextId, Envelope, Message, Response, Router};
use crate::types::{Bookmark, VideoData, VideoSession};

/// Fixed delay between injection attempts while the player is rendering.
const INJECTION_RETRY_DELAY: Duration = Duration::from_secs(1);

/// A control activation: bookmark the current playback position.
///
/// `desc` is the modal's input; empty means "use the default description".
pub struct CaptureRequest {
    pub desc: String,
    pub reply: oneshot::Sender<Result<Vec<Bookmark>, String>>,
}

/// The page context's event loop state.
pub struct PageContext<S: PlayerSurface> {
    store: BookmarkStore,
    player: PlayerAdapter<S>,
    session: Option<VideoSession>,
    bookmarks: Vec<Bookmark>,
    inbox: mpsc::Receiver<Envelope>,
    capture_rx: mpsc::Receiver<CaptureRequest>,
    injection_pending: bool,
}

impl<S: PlayerSurface> PageContext<S> {
    /// Registers the page with the router and returns the context plus the
    /// channel the injected control's activation feeds into.
    pub fn new(
        router: Arc<Router>,
        store: BookmarkStore,
        surface: S,
    ) -> (Self, mpsc::Sender<CaptureRequest>) {
        let inbox = router.register(ContextId::Page);
        let (capture_tx, capture_rx) = mpsc::channel(8);
        (
            Self {
                store,
                player: PlayerAdapter::new(surface),
                session: None,
                bookmarks: Vec::new(),
                inbox,
                capture_rx,
                injection_pending: false,
            },
            capture_tx,
        )
    }

    /// Runs until the inbox and the capture channel close.
    pub async fn run(mut self) {
        let mut retry_tick = tokio::time::interval(INJECTION_RETRY_DELAY);
        retry_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                envelope = self.inbox.recv() => match envelope {
                    Some(envelope) => self.handle_envelope(envelope).await,
                    None => break,
                },
                request = self.capture_rx.recv() => match request {
                    Some(request) => self.handle_capture(request).await,
                    None => break,
                },
                _ = retry_tick.tick(), if self.injection_pending => {
                    self.try_inject();
                }
            }
        }
    }

    async fn handle_envelope(&mut self, envelope: Envelope) {
        let Envelope { message, reply } = envelope;
        match message {
            Message::New { video_id } => {
                self.activate_video(video_id);
            }
            Message::Play { value } => {
                let ack = match self.player.seek(value) {
                    Ok(()) => CommandAck::ok(),
                    Err(err) => {
                        warn!(value, error = %err, "play rejected");
                        CommandAck::failed(err.to_string())
                    }
                };
                if let Some(reply) = reply {
                    let _ = reply.send(Response::Ack(ack));
                }
            }
            Message::Delete { value } => {
                let list = self.delete_bookmark(value).await;
                if let Some(reply) = reply {
                    let _ = reply.send(Response::Bookmarks(list));
                }
            }
            Message::GetVideoData => {
                let data = self
                    .session
                    .as_ref()
                    .map(|s| s.data.clone())
                    .unwrap_or_default();
                if let Some(reply) = reply {
                    let _ = reply.send(Response::VideoData(data));
                }
            }
            // Tracker-bound messages; a misrouted one is logged and ignored.
            Message::GetCurrentVideo | Message::RefreshContentScript => {
                warn!(?message, "message not handled by page context");
            }
        }
    }

    /// Replaces the session with a fresh one for `video_id`, reloads its
    /// bookmarks and (re)schedules control injection.
    fn activate_video(&mut self, video_id: String) {
        let data = self.player.metadata();
        info!(video_id, title = %data.title, "video session replaced");

        self.bookmarks = self.store.load(&video_id);
        self.session = Some(VideoSession::new(video_id, data));
        self.try_inject();
    }

    fn try_inject(&mut self) {
        self.injection_pending = !self.player.inject_control();
    }

    /// `DELETE` acts on the current session only; with no session, or when
    /// the write fails, the reply is an empty list.
    async fn delete_bookmark(&mut self, time: f64) -> Vec<Bookmark> {
        let video_id = match &self.session {
            Some(session) => session.video_id.clone(),
            None => {
                warn!(time, "delete with no active video session");
                return Vec::new();
            }
        };

        match self.store.remove(&video_id, time).await {
            Ok(list) => {
                self.bookmarks = list.clone();
                list
            }
            Err(err) => {
                error!(video_id, time, error = %err, "delete failed");
                Vec::new()
            }
        }
    }

    async fn handle_capture(&mut self, request: CaptureRequest) {
        let result = self.capture_bookmark(&request.desc).await;
        let _ = request.reply.send(result);
    }

    /// Bookmarks the current playback position.
    ///
    /// Rejected before any store mutation when there is no active session
    /// or the player reports position ≤ 0.
    async fn capture_bookmark(&mut self, desc: &str) -> Result<Vec<Bookmark>, String> {
        let video_id = match &self.session {
            Some(session) => session.video_id.clone(),
            None => return Err("no active video session".to_string()),
        };

        let time = self.player.current_time();
        if time <= 0.0 {
            return Err("cannot bookmark at 0 seconds".to_string());
        }

        match self.store.add(&video_id, time, desc).await {
            Ok(list) => {
                self.bookmarks = list.clone();
                info!(video_id, time, "bookmark saved");
                Ok(list)
            }
            Err(err) => {
                error!(video_id, time, error = %err, "bookmark save failed");
                Err(err.to_string())
            }
        }
    }
}

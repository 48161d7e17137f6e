//! Background tracker context.
//!
//! Watches navigation events, runs the session state machine, and
//! announces new videos to the page context. Also answers the popup's
//! `GET_CURRENT_VIDEO` and `REFRESH_CONTENT_SCRIPT` requests.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::managers::SessionTracker;
use crate::message_router::{CommandAck, ContextId, CurrentVideo, Envelope, Message, Response, Router};
use crate::types::errors::RouterError;

/// Delay before the single re-send of `NEW` when the page context is not
/// yet registered.
const ANNOUNCE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A host-reported navigation in the watched tab.
#[derive(Debug, Clone)]
pub struct NavigationEvent {
    pub url: String,
}

/// The tracker context's event loop state.
pub struct TrackerContext {
    router: Arc<Router>,
    tracker: SessionTracker,
    inbox: mpsc::Receiver<Envelope>,
    nav_rx: mpsc::Receiver<NavigationEvent>,
}

impl TrackerContext {
    /// Registers the tracker with the router and returns the context plus
    /// the channel the host feeds navigation events into.
    pub fn new(router: Arc<Router>) -> (Self, mpsc::Sender<NavigationEvent>) {
        let inbox = router.register(ContextId::Tracker);
        let (nav_tx, nav_rx) = mpsc::channel(16);
        (
            Self {
                router,
                tracker: SessionTracker::new(),
                inbox,
                nav_rx,
            },
            nav_tx,
        )
    }

    /// Runs until both the navigation feed and the inbox close.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                event = self.nav_rx.recv() => match event {
                    Some(event) => self.handle_navigation(&event.url).await,
                    None => break,
                },
                envelope = self.inbox.recv() => match envelope {
                    Some(envelope) => self.handle_envelope(envelope).await,
                    None => break,
                },
            }
        }
        debug!("tracker context stopped");
    }

    async fn handle_navigation(&mut self, url: &str) {
        if let Some(video_id) = self.tracker.observe_navigation(url) {
            info!(video_id, "new video active");
            // Fire-and-forget; a failed announce does not roll back state.
            let _ = self.announce(&video_id).await;
        }
    }

    /// Sends `NEW` to the page context, retrying once after a short delay
    /// if the page is not ready, then giving up silently.
    async fn announce(&self, video_id: &str) -> Result<(), RouterError> {
        let message = Message::New {
            video_id: video_id.to_string(),
        };
        if self
            .router
            .send(ContextId::Page, message.clone())
            .await
            .is_ok()
        {
            return Ok(());
        }

        tokio::time::sleep(ANNOUNCE_RETRY_DELAY).await;
        match self.router.send(ContextId::Page, message).await {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!(video_id, error = %err, "page context unavailable, giving up on NEW");
                Err(err)
            }
        }
    }

    async fn handle_envelope(&mut self, envelope: Envelope) {
        let Envelope { message, reply } = envelope;
        match message {
            Message::GetCurrentVideo => {
                let response = Response::CurrentVideo(CurrentVideo {
                    video_id: self.tracker.current_video().map(str::to_string),
                });
                if let Some(reply) = reply {
                    let _ = reply.send(response);
                }
            }
            Message::RefreshContentScript => {
                let ack = match self.tracker.current_video() {
                    Some(video_id) => {
                        let video_id = video_id.to_string();
                        match self.announce(&video_id).await {
                            Ok(()) => CommandAck::ok(),
                            Err(err) => CommandAck::failed(err.to_string()),
                        }
                    }
                    None => CommandAck::failed("no active video"),
                };
                if let Some(reply) = reply {
                    let _ = reply.send(Response::Ack(ack));
                }
            }
            // Page-bound messages; a misrouted one is logged and ignored.
            Message::New { .. }
            | Message::Play { .. }
            | Message::Delete { .. }
            | Message::GetVideoData => {
                warn!(?message, "message not handled by tracker context");
            }
        }
    }
}

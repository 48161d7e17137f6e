//! Message protocol and router connecting the three contexts.
//!
//! The protocol is a closed tagged enum: one variant per message kind,
//! matched exhaustively by every handler, so adding a kind is a
//! compile-time-checked change rather than a silently-ignored default
//! case. Each kind has one explicit response type.
//!
//! Wire format is line-oriented JSON: `{"type": "...", "videoId"?, "value"?}`.
//! An unknown `type` tag fails deserialization at the boundary, where it
//! is logged and ignored; it never reaches a handler.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::types::errors::RouterError;
use crate::types::{Bookmark, VideoData};

/// One of the three isolated execution contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextId {
    Tracker,
    Page,
    Popup,
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextId::Tracker => write!(f, "tracker"),
            ContextId::Page => write!(f, "page"),
            ContextId::Popup => write!(f, "popup"),
        }
    }
}

/// The message protocol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Message {
    /// tracker → page: a new video became active. Fire-and-forget.
    #[serde(rename = "NEW")]
    New {
        #[serde(rename = "videoId")]
        video_id: String,
    },
    /// popup → page: seek the player to `value` seconds.
    #[serde(rename = "PLAY")]
    Play { value: f64 },
    /// popup → page: delete the bookmark at `value` seconds.
    #[serde(rename = "DELETE")]
    Delete { value: f64 },
    /// popup → page: snapshot of the active video.
    #[serde(rename = "GET_VIDEO_DATA")]
    GetVideoData,
    /// popup → tracker: which video is active?
    #[serde(rename = "GET_CURRENT_VIDEO")]
    GetCurrentVideo,
    /// popup → tracker: re-initialize the page context.
    #[serde(rename = "REFRESH_CONTENT_SCRIPT")]
    RefreshContentScript,
}

impl Message {
    /// Parses one wire message. Unknown tags and malformed payloads are
    /// errors for the caller to log and drop.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Acknowledgement for `PLAY` and `REFRESH_CONTENT_SCRIPT`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandAck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandAck {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Reply to `GET_CURRENT_VIDEO`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentVideo {
    #[serde(rename = "videoId", skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

/// One response type per message kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// `PLAY` / `REFRESH_CONTENT_SCRIPT`.
    Ack(CommandAck),
    /// `DELETE`: the updated list, empty on failure.
    Bookmarks(Vec<Bookmark>),
    /// `GET_VIDEO_DATA`.
    VideoData(VideoData),
    /// `GET_CURRENT_VIDEO`.
    CurrentVideo(CurrentVideo),
}

impl Response {
    /// Wire encoding for the demo harness and logs.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Response::Ack(ack) => serde_json::to_value(ack),
            Response::Bookmarks(list) => serde_json::to_value(list),
            Response::VideoData(data) => serde_json::to_value(data),
            Response::CurrentVideo(cv) => serde_json::to_value(cv),
        }
        .unwrap_or(serde_json::Value::Null)
    }
}

/// A routed message plus its reply channel.
///
/// `reply` is `None` for fire-and-forget sends. Handlers doing async work
/// hold the sender until the work completes; dropping it unanswered
/// surfaces as [`RouterError::ReplyDropped`] at the requester.
pub struct Envelope {
    pub message: Message,
    pub reply: Option<oneshot::Sender<Response>>,
}

/// Channel-based router between contexts.
///
/// Contexts register an inbox; peers address them by [`ContextId`]. There
/// is no shared memory behind this: delivery is the only coupling, and a
/// send to a deregistered or dropped context reports
/// [`RouterError::ContextUnavailable`] for the caller to retry once or
/// degrade gracefully.
pub struct Router {
    inboxes: Mutex<HashMap<ContextId, mpsc::Sender<Envelope>>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            inboxes: Mutex::new(HashMap::new()),
        }
    }

    /// Registers (or replaces) a context's inbox and returns its receiver.
    pub fn register(&self, ctx: ContextId) -> mpsc::Receiver<Envelope> {
        let (tx, rx) = mpsc::channel(32);
        self.inboxes
            .lock()
            .expect("router lock poisoned")
            .insert(ctx, tx);
        debug!(%ctx, "context registered");
        rx
    }

    /// Drops a context's inbox; subsequent sends report it unavailable.
    pub fn deregister(&self, ctx: ContextId) {
        self.inboxes
            .lock()
            .expect("router lock poisoned")
            .remove(&ctx);
        debug!(%ctx, "context deregistered");
    }

    fn sender_for(&self, ctx: ContextId) -> Result<mpsc::Sender<Envelope>, RouterError> {
        self.inboxes
            .lock()
            .expect("router lock poisoned")
            .get(&ctx)
            .cloned()
            .ok_or_else(|| RouterError::ContextUnavailable(ctx.to_string()))
    }

    /// Fire-and-forget delivery.
    pub async fn send(&self, ctx: ContextId, message: Message) -> Result<(), RouterError> {
        let sender = self.sender_for(ctx)?;
        sender
            .send(Envelope {
                message,
                reply: None,
            })
            .await
            .map_err(|_| {
                warn!(%ctx, "send to dropped context");
                RouterError::ContextUnavailable(ctx.to_string())
            })
    }

    /// Request/response delivery. The reply channel stays open until the
    /// handler answers or drops it.
    pub async fn request(
        &self,
        ctx: ContextId,
        message: Message,
    ) -> Result<Response, RouterError> {
        let sender = self.sender_for(ctx)?;
        let (reply_tx, reply_rx) = oneshot::channel();
        sender
            .send(Envelope {
                message,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| RouterError::ContextUnavailable(ctx.to_string()))?;

        reply_rx
            .await
            .map_err(|_| RouterError::ReplyDropped(ctx.to_string()))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

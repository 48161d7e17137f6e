//! Popup context.
//!
//! On open, asks the tracker which video is active, asks the page context
//! for the video snapshot, and reads the bookmark list directly through
//! the storage capability. Issues play/delete/edit commands; messaging
//! failures degrade to a single retry and then a user-visible notice
//! instead of propagating.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::database::KeyValueBackend;
use crate::format::now_ms;
use crate::managers::BookmarkStore;
use crate::message_router::{ContextId, CurrentVideo, Message, Response, Router};
use crate::services::popup_presenter::{self, Query};
use crate::types::errors::RouterError;
use crate::types::{Bookmark, VideoData};

/// Delay before the single retry of a failed request.
const REQUEST_RETRY_DELAY: Duration = Duration::from_millis(250);

const NOT_ON_VIDEO_PAGE: &str = "This is not a video page";
const CONNECTION_LOST: &str = "Extension connection lost, refresh the page";

/// The popup's view of the world while it is open.
pub struct PopupContext {
    router: Arc<Router>,
    store: BookmarkStore,
    video_id: Option<String>,
    video_data: VideoData,
    bookmarks: Vec<Bookmark>,
    pub query: Query,
    notice: Option<String>,
}

impl PopupContext {
    pub fn new(router: Arc<Router>, backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            router,
            store: BookmarkStore::new(backend),
            video_id: None,
            video_data: VideoData::default(),
            bookmarks: Vec::new(),
            query: Query::default(),
            notice: None,
        }
    }

    /// Initial load on popup open: discover the active video, fetch its
    /// snapshot, and read the bookmark list from storage.
    pub async fn open(&mut self) {
        self.notice = None;

        let current = match self.request_with_retry(ContextId::Tracker, Message::GetCurrentVideo).await
        {
            Ok(Response::CurrentVideo(CurrentVideo { video_id })) => video_id,
            Ok(other) => {
                warn!(?other, "unexpected reply to GET_CURRENT_VIDEO");
                None
            }
            Err(err) => {
                warn!(error = %err, "tracker unavailable");
                None
            }
        };

        let video_id = match current {
            Some(id) => id,
            None => {
                self.video_id = None;
                self.video_data = VideoData::default();
                self.bookmarks.clear();
                self.notice = Some(NOT_ON_VIDEO_PAGE.to_string());
                return;
            }
        };

        match self.request_with_retry(ContextId::Page, Message::GetVideoData).await {
            Ok(Response::VideoData(data)) => self.video_data = data,
            Ok(other) => warn!(?other, "unexpected reply to GET_VIDEO_DATA"),
            Err(err) => warn!(error = %err, "video data unavailable"),
        }

        self.bookmarks = self.store.load(&video_id);
        self.video_id = Some(video_id);
    }

    /// The list as rendered: search + date filter + sort over a working
    /// copy, leaving the loaded list untouched.
    pub fn visible_bookmarks(&self) -> Vec<Bookmark> {
        popup_presenter::apply(&self.bookmarks, &self.query, now_ms())
    }

    pub fn bookmark_count(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn video_data(&self) -> &VideoData {
        &self.video_data
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    /// The user-visible failure notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Seeks the player to a bookmarked time. Returns true on success.
    pub async fn play(&mut self, time: f64) -> bool {
        match self.request_with_retry(ContextId::Page, Message::Play { value: time }).await {
            Ok(Response::Ack(ack)) if ack.success => true,
            Ok(Response::Ack(ack)) => {
                self.notice = Some(
                    ack.error
                        .unwrap_or_else(|| "Failed to play bookmark".to_string()),
                );
                false
            }
            Ok(other) => {
                warn!(?other, "unexpected reply to PLAY");
                false
            }
            Err(err) => {
                warn!(time, error = %err, "play request failed");
                self.notice = Some(NOT_ON_VIDEO_PAGE.to_string());
                false
            }
        }
    }

    /// Deletes the bookmark at `time` via the page context and adopts the
    /// returned list.
    pub async fn delete(&mut self, time: f64) {
        match self.request_with_retry(ContextId::Page, Message::Delete { value: time }).await {
            Ok(Response::Bookmarks(list)) => {
                self.bookmarks = list;
            }
            Ok(other) => warn!(?other, "unexpected reply to DELETE"),
            Err(err) => {
                warn!(time, error = %err, "delete request failed");
                self.notice = Some(NOT_ON_VIDEO_PAGE.to_string());
            }
        }
    }

    /// Edit flow: `input` is what the blocking prompt returned. Dismissed,
    /// empty or unchanged input cancels with no mutation and no timestamp
    /// bump.
    pub async fn edit(&mut self, time: f64, input: Option<&str>) {
        let video_id = match &self.video_id {
            Some(id) => id.clone(),
            None => {
                self.notice = Some(NOT_ON_VIDEO_PAGE.to_string());
                return;
            }
        };

        let current = match self
            .bookmarks
            .iter()
            .find(|b| b.time.to_bits() == time.to_bits())
        {
            Some(bookmark) => bookmark.desc.clone(),
            None => {
                self.notice = Some("Bookmark not found".to_string());
                return;
            }
        };

        let new_desc = match popup_presenter::resolve_edit(&current, input) {
            Some(desc) => desc,
            None => return,
        };

        match self.store.update(&video_id, time, &new_desc).await {
            Ok(list) => self.bookmarks = list,
            Err(err) => {
                warn!(time, error = %err, "edit failed");
                self.notice = Some("Failed to save changes".to_string());
            }
        }
    }

    /// Periodic liveness check.
    ///
    /// Pings the page context; on failure asks the tracker to refresh the
    /// content script and pings again. A still-dead page context surfaces
    /// a connection-lost notice. Also re-syncs when the active video has
    /// changed underneath the popup. Returns true when the page context is
    /// reachable.
    pub async fn check_connection(&mut self) -> bool {
        let tracked = match self
            .request_with_retry(ContextId::Tracker, Message::GetCurrentVideo)
            .await
        {
            Ok(Response::CurrentVideo(CurrentVideo { video_id })) => video_id,
            _ => None,
        };
        if tracked != self.video_id {
            info!(?tracked, "active video changed, reloading popup state");
            self.open().await;
        }

        if self
            .router
            .request(ContextId::Page, Message::GetVideoData)
            .await
            .is_ok()
        {
            return true;
        }

        // Page context invalidated (e.g. extension reload): try to refresh it.
        let refreshed = matches!(
            self.router
                .request(ContextId::Tracker, Message::RefreshContentScript)
                .await,
            Ok(Response::Ack(ack)) if ack.success
        );

        if refreshed
            && self
                .router
                .request(ContextId::Page, Message::GetVideoData)
                .await
                .is_ok()
        {
            self.notice = None;
            return true;
        }

        warn!("page context unreachable after refresh attempt");
        self.notice = Some(CONNECTION_LOST.to_string());
        false
    }

    /// One attempt plus one delayed retry on an unavailable context.
    async fn request_with_retry(
        &self,
        ctx: ContextId,
        message: Message,
    ) -> Result<Response, RouterError> {
        match self.router.request(ctx, message.clone()).await {
            Ok(response) => Ok(response),
            Err(RouterError::ContextUnavailable(_)) => {
                tokio::time::sleep(REQUEST_RETRY_DELAY).await;
                self.router.request(ctx, message).await
            }
            Err(err) => Err(err),
        }
    }
}

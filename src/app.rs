//! App core.
//!
//! Owns the shared storage backend and the router, and constructs the
//! three contexts around them. Context event loops are spawned as tokio
//! tasks; the handles returned here are the host's way in (navigation
//! events, control activations, the popup object).

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::contexts::{CaptureRequest, NavigationEvent, PageContext, PopupContext, TrackerContext};
use crate::database::{KeyValueBackend, KvDatabase};
use crate::managers::{BookmarkStore, PlayerSurface};
use crate::message_router::Router;

/// Central wiring for one running instance.
pub struct App {
    backend: Arc<KvDatabase>,
    router: Arc<Router>,
}

impl App {
    /// Opens (or creates) the bookmark database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let backend = Arc::new(KvDatabase::open(db_path)?);
        Ok(Self {
            backend,
            router: Arc::new(Router::new()),
        })
    }

    /// In-memory variant for tests and demos.
    pub fn in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let backend = Arc::new(KvDatabase::open_in_memory()?);
        Ok(Self {
            backend,
            router: Arc::new(Router::new()),
        })
    }

    pub fn router(&self) -> Arc<Router> {
        self.router.clone()
    }

    pub fn backend(&self) -> Arc<dyn KeyValueBackend> {
        self.backend.clone()
    }

    /// Spawns the tracker context; returns the navigation-event feed.
    pub fn spawn_tracker(&self) -> mpsc::Sender<NavigationEvent> {
        let (tracker, nav_tx) = TrackerContext::new(self.router.clone());
        tokio::spawn(tracker.run());
        nav_tx
    }

    /// Spawns the page context over the given player surface; returns the
    /// capture channel wired to the injected control.
    pub fn spawn_page<S>(&self, surface: S) -> mpsc::Sender<CaptureRequest>
    where
        S: PlayerSurface + 'static,
    {
        let store = BookmarkStore::new(self.backend());
        let (page, capture_tx) = PageContext::new(self.router.clone(), store, surface);
        tokio::spawn(page.run());
        capture_tx
    }

    /// Builds a popup context sharing this app's router and storage.
    pub fn popup(&self) -> PopupContext {
        PopupContext::new(self.router.clone(), self.backend())
    }
}

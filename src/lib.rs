//! seekmark: timestamp bookmarks for video watch pages.
//!
//! Three isolated contexts (background tracker, page, popup) cooperate
//! through a typed message router and a shared persistent key-value store
//! keyed by video identifier. The DOM and the host transport are modeled
//! as capability traits; this crate owns the bookmark store, the protocol,
//! the session state machine and the popup pipeline.

pub mod app;
pub mod contexts;
pub mod database;
pub mod format;
pub mod managers;
pub mod message_router;
pub mod retry;
pub mod services;
pub mod types;

// Stateful cores.
// Managers own the bookmark list, the navigation state machine, and the
// player surface adapter.

pub mod bookmark_store;
pub mod player_adapter;
pub mod session_tracker;

pub use bookmark_store::BookmarkStore;
pub use player_adapter::{LocateOutcome, PlayerAdapter, PlayerSurface};
pub use session_tracker::{SessionState, SessionTracker};

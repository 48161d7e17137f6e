// The three isolated execution contexts.
// No shared memory between them: coordination is message passing plus the
// persistent key-value store.

pub mod page;
pub mod popup;
pub mod tracker;

pub use page::{CaptureRequest, PageContext};
pub use popup::PopupContext;
pub use tracker::{NavigationEvent, TrackerContext};

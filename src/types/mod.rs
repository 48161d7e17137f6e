// Shared type definitions.
// Each submodule defines types used across the three contexts.

pub mod bookmark;
pub mod errors;
pub mod session;

pub use bookmark::Bookmark;
pub use session::{VideoData, VideoSession};

//! Lanes room client.
//!
//! The live view of a chat room, kept in step with the server:
//! - a fast feed of posts, grouped by author and capped at 100
//! - a pinned board with vote tallies
//! - presence of room members
//! - a composer with edit mode, replies and mention autocomplete
//!
//! State transitions are pure; I/O lives in `http` and `transport`.

pub mod banner;
pub mod composer;
pub mod error;
pub mod feed;
pub mod http;
pub mod input;
pub mod intent;
pub mod member;
pub mod notify;
pub mod pinned;
pub mod presence;
mod reconciler;
pub mod reply;
pub mod room;
pub mod transport;

// Re-export key types for convenience.
pub use error::ClientError;
pub use feed::{Feed, MAX_VISIBLE, Message};
pub use http::HttpApi;
pub use input::{Key, KeyOutcome};
pub use intent::{Completion, Intent};
pub use notify::{Notifier, NullNotifier, TracingNotifier, Volume};
pub use pinned::{PinnedBoard, PinnedEntry, Vote};
pub use room::{Room, Session};

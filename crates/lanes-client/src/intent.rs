//! Outbound requests and their outcomes.
//!
//! The room never performs I/O itself. User actions produce an [`Intent`];
//! the host executes it (see `http::HttpApi`) and feeds the resulting
//! [`Completion`] back into the room.

use lanes_types::models::UserHit;
use lanes_types::{PostId, UserId};

use crate::notify::Volume;
use crate::pinned::Vote;

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Post { message: String },
    Edit { id: PostId, message: String },
    Vote { id: PostId, vote: Vote },
    Pin { id: PostId, pincode: String },
    Unpin { id: PostId, pincode: String },
    Flag { id: PostId },
    SetVolume(Volume),
    AddMember { username: String },
    SearchUsers { org: String, query: String },
}

impl Intent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Post { .. } => "post",
            Self::Edit { .. } => "edit",
            Self::Vote { .. } => "vote",
            Self::Pin { .. } => "pin",
            Self::Unpin { .. } => "unpin",
            Self::Flag { .. } => "flag",
            Self::SetVolume(_) => "volume",
            Self::AddMember { .. } => "add_member",
            Self::SearchUsers { .. } => "search_users",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The server accepted the request.
    Done(Intent),
    /// The request failed. `message` is the server's explanation when it
    /// gave one.
    Failed { intent: Intent, message: String },
    MemberAdded { user_id: UserId, username: String },
    SearchResults(Vec<UserHit>),
}

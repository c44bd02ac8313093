use serde::{Deserialize, Serialize};

use crate::{PostId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub img: String,
}

/// A post as delivered by the history snapshot and by `msg` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: PostId,
    pub author: Author,
    /// Display text. May start with a `:<id>` reply token.
    pub content: String,
    /// Raw source text, loaded into the composer when editing.
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub edited: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub flagged: bool,
}

/// A pinned post from the initial snapshot, with its tally and the
/// viewer's own vote (-1, 0 or 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedRecord {
    #[serde(flatten)]
    pub post: PostRecord,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub vote: i8,
}

/// One row of a user search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHit {
    pub id: UserId,
    pub username: String,
}

/// Bootstrap snapshot injected by the hosting page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub post_history: Vec<PostRecord>,
    #[serde(default)]
    pub pinned: Vec<PinnedRecord>,
}

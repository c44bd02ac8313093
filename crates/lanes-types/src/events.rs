use serde::{Deserialize, Serialize};

use crate::models::PostRecord;
use crate::{PostId, UserId};

/// Envelopes pushed by the server over the room channel.
///
/// Internally tagged on `type`; every other field sits next to the tag.
/// Anything that fails to decode (bad JSON, unknown `type`) is an error
/// the caller is expected to drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RoomEvent {
    /// A new post
    Msg(PostRecord),

    /// Tally change on a pinned post
    Vote {
        id: PostId,
        #[serde(alias = "content")]
        score: i64,
    },

    /// A post was promoted to the pinned board
    Pin {
        id: PostId,
        #[serde(default)]
        score: i64,
        /// Nonce echoed back from the pin request, if any.
        #[serde(default)]
        pincode: Option<String>,
        /// Author of the pinned post.
        #[serde(default)]
        author_id: Option<UserId>,
    },

    Unpin { id: PostId },

    Edit {
        id: PostId,
        content: String,
        #[serde(default)]
        raw: String,
    },

    Delete { id: PostId },

    Flag { id: PostId },

    /// Presence upsert carrying the user's status code
    Status {
        id: UserId,
        #[serde(default)]
        username: String,
        #[serde(default)]
        img: String,
        status: u8,
    },

    Join {
        id: UserId,
        #[serde(default)]
        username: String,
        #[serde(default)]
        img: String,
    },

    Leave { id: UserId },

    /// Periodic ranking of the pinned board
    Hotness { posts: Vec<HotnessEntry> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotnessEntry {
    pub id: PostId,
    #[serde(default)]
    pub score: i64,
    pub hotness: f64,
}

impl RoomEvent {
    pub fn decode(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }

    /// Short name of the variant, matching the wire tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Msg(_) => "msg",
            Self::Vote { .. } => "vote",
            Self::Pin { .. } => "pin",
            Self::Unpin { .. } => "unpin",
            Self::Edit { .. } => "edit",
            Self::Delete { .. } => "delete",
            Self::Flag { .. } => "flag",
            Self::Status { .. } => "status",
            Self::Join { .. } => "join",
            Self::Leave { .. } => "leave",
            Self::Hotness { .. } => "hotness",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_msg_with_defaults() {
        let ev = RoomEvent::decode(
            r#"{"type":"msg","id":7,"author":{"id":2,"name":"alice","img":"a.png"},"content":"hi"}"#,
        )
        .unwrap();
        match ev {
            RoomEvent::Msg(post) => {
                assert_eq!(post.id, 7);
                assert_eq!(post.author.name, "alice");
                assert!(!post.edited);
                assert_eq!(post.raw, "");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn vote_accepts_content_as_score() {
        let ev = RoomEvent::decode(r#"{"type":"vote","id":3,"content":5}"#).unwrap();
        assert_eq!(ev, RoomEvent::Vote { id: 3, score: 5 });
    }

    #[test]
    fn pin_without_nonce() {
        let ev = RoomEvent::decode(r#"{"type":"pin","id":3,"score":1}"#).unwrap();
        assert_eq!(
            ev,
            RoomEvent::Pin { id: 3, score: 1, pincode: None, author_id: None }
        );
        assert_eq!(ev.kind(), "pin");
    }

    #[test]
    fn unknown_type_is_an_error() {
        assert!(RoomEvent::decode(r#"{"type":"typing","id":1}"#).is_err());
        assert!(RoomEvent::decode("not json").is_err());
        assert!(RoomEvent::decode(r#"{"id":1}"#).is_err());
    }

    #[test]
    fn decodes_hotness() {
        let ev = RoomEvent::decode(
            r#"{"type":"hotness","posts":[{"id":1,"score":4,"hotness":2.5},{"id":2,"hotness":0.1}]}"#,
        )
        .unwrap();
        match ev {
            RoomEvent::Hotness { posts } => {
                assert_eq!(posts.len(), 2);
                assert_eq!(posts[1].score, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

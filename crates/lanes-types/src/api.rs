use serde::{Deserialize, Serialize};

use crate::PostId;
use crate::models::UserHit;

// -- Posts --

#[derive(Debug, Clone, Serialize)]
pub struct PostRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditRequest {
    pub id: PostId,
    pub message: String,
}

/// `value` is 1 for an up-vote, -1 for a down-vote.
#[derive(Debug, Clone, Serialize)]
pub struct VoteRequest {
    pub id: PostId,
    pub value: i8,
}

#[derive(Debug, Clone, Serialize)]
pub struct PinRequest {
    pub id: PostId,
    pub pin: bool,
    pub pincode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlagRequest {
    pub id: PostId,
}

// -- Room --

#[derive(Debug, Clone, Serialize)]
pub struct PrefsRequest {
    pub volume: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddMemberRequest {
    pub username: String,
}

// -- User search --

#[derive(Debug, Clone, Serialize)]
pub struct UserSearchQuery {
    pub org: String,
    pub s: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSearchResponse {
    #[serde(default)]
    pub results: Vec<UserHit>,
}

/// Body of a failed request, when the server sends one.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

//! Wire types shared between the room client and its front ends.

pub mod api;
pub mod events;
pub mod models;

/// Server-assigned post id.
pub type PostId = u64;

/// Server-assigned user id.
pub type UserId = u64;

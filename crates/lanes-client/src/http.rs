//! Executes intents against the room's HTTP endpoints.
//!
//! Every call is fire-and-forget from the room's point of view: the caller
//! spawns [`HttpApi::execute`] and hands the [`Completion`] back to the room
//! whenever it arrives.

use serde::Serialize;
use tracing::debug;

use lanes_types::UserId;
use lanes_types::api::{
    AddMemberRequest, EditRequest, ErrorResponse, FlagRequest, PinRequest, PostRequest,
    PrefsRequest, UserSearchQuery, UserSearchResponse, VoteRequest,
};

use crate::error::ClientError;
use crate::intent::{Completion, Intent};

#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    room_id: u64,
    session_cookie: Option<String>,
}

impl HttpApi {
    pub fn new(
        base_url: impl Into<String>,
        room_id: u64,
        session_cookie: Option<String>,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            room_id,
            session_cookie,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_session(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => req.header(reqwest::header::COOKIE, format!("sessionid={}", cookie)),
            None => req,
        }
    }

    /// POST a form and return the response body.
    async fn post_form<T: Serialize + ?Sized>(&self, path: &str, form: &T) -> Result<String, ClientError> {
        let req = self.with_session(self.client.post(self.url(path)).form(form));
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or_default();
            return Err(ClientError::Server { status: status.as_u16(), message });
        }
        Ok(body)
    }

    async fn search_users(&self, query: &UserSearchQuery) -> Result<UserSearchResponse, ClientError> {
        let req = self.with_session(self.client.get(self.url("/ajax/users/c/")).query(query));
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Server { status: status.as_u16(), message: String::new() });
        }
        Ok(resp.json().await?)
    }

    async fn send(&self, intent: &Intent) -> Result<Completion, ClientError> {
        let room = self.room_id;
        match intent {
            Intent::Post { message } => {
                self.post_form(&format!("/room/{}/post/", room), &PostRequest { message: message.clone() })
                    .await?;
            }
            Intent::Edit { id, message } => {
                let body = EditRequest { id: *id, message: message.clone() };
                self.post_form(&format!("/post/{}/edit/", id), &body).await?;
            }
            Intent::Vote { id, vote } => {
                let body = VoteRequest { id: *id, value: vote.value() };
                self.post_form(&format!("/post/{}/vote/", id), &body).await?;
            }
            Intent::Pin { id, pincode } | Intent::Unpin { id, pincode } => {
                let body = PinRequest {
                    id: *id,
                    pin: matches!(intent, Intent::Pin { .. }),
                    pincode: pincode.clone(),
                };
                self.post_form(&format!("/room/{}/pin/", room), &body).await?;
            }
            Intent::Flag { id } => {
                self.post_form(&format!("/post/{}/flag/", id), &FlagRequest { id: *id }).await?;
            }
            Intent::SetVolume(volume) => {
                let body = PrefsRequest { volume: volume.as_u8() };
                self.post_form(&format!("/room/{}/prefs/", room), &body).await?;
            }
            Intent::AddMember { username } => {
                let body = AddMemberRequest { username: username.clone() };
                let resp = self.post_form(&format!("/room/{}/add_member/", room), &body).await?;
                let user_id: UserId = serde_json::from_str(resp.trim())?;
                return Ok(Completion::MemberAdded { user_id, username: username.clone() });
            }
            Intent::SearchUsers { org, query } => {
                let q = UserSearchQuery { org: org.clone(), s: query.clone() };
                let found = self.search_users(&q).await?;
                return Ok(Completion::SearchResults(found.results));
            }
        }
        Ok(Completion::Done(intent.clone()))
    }

    /// Run one intent to completion. Failures become [`Completion::Failed`].
    pub async fn execute(&self, intent: Intent) -> Completion {
        debug!(kind = intent.kind(), "sending request");
        match self.send(&intent).await {
            Ok(done) => done,
            Err(e) => Completion::Failed { message: e.user_message(), intent },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalised() {
        let api = HttpApi::new("http://localhost:8000/", 3, None).unwrap();
        assert_eq!(api.url("/room/3/post/"), "http://localhost:8000/room/3/post/");
    }

    #[test]
    fn server_message_wins_for_banners() {
        let e = ClientError::Server { status: 403, message: "Slow down".into() };
        assert_eq!(e.user_message(), "Slow down");
        let e = ClientError::Server { status: 500, message: String::new() };
        assert_eq!(e.user_message(), "server returned 500: ");
    }
}

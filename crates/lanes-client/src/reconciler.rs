//! Applies pushed room events to the view model.
//!
//! Every event is applied at most once and never fails: events about posts
//! or users this client has not seen degrade to no-ops (or create the user),
//! and frames that do not decode are logged and dropped.

use tracing::{debug, warn};

use lanes_types::{PostId, UserId};
use lanes_types::events::RoomEvent;
use lanes_types::models::PostRecord;

use crate::feed::{DELETED_PLACEHOLDER, Message};
use crate::notify::{self, Volume, should_notify};
use crate::pinned::{PinnedEntry, Vote};
use crate::reply::{Content, parse_reply};
use crate::room::Room;

impl Room {
    /// Decode and apply one transport frame. Returns whether it was applied.
    pub fn receive_frame(&mut self, frame: &str) -> bool {
        match RoomEvent::decode(frame) {
            Ok(event) => {
                self.apply(event);
                true
            }
            Err(e) => {
                let raw: String = frame.chars().take(200).collect();
                warn!("dropping bad frame: {} -- raw: {}", e, raw);
                false
            }
        }
    }

    pub fn apply(&mut self, event: RoomEvent) {
        debug!(kind = event.kind(), "room event");
        match event {
            RoomEvent::Msg(post) => self.append_post(post),
            RoomEvent::Vote { id, score } => {
                if !self.pinned.set_score(id, score) {
                    debug!(id, "vote for a post that is not pinned here");
                }
            }
            RoomEvent::Pin { id, score, pincode, author_id } => {
                self.apply_pin(id, score, pincode.as_deref(), author_id)
            }
            RoomEvent::Unpin { id } => {
                self.pinned.remove(id);
            }
            RoomEvent::Edit { id, content, raw } => self.apply_edit(id, &content, raw),
            RoomEvent::Delete { id } => {
                if let Some(m) = self.feed.get_mut(id) {
                    let target = m.reply_to();
                    m.deleted = true;
                    m.content = Content::plain(DELETED_PLACEHOLDER);
                    self.feed.relink(id, target, None);
                }
                self.pinned.remove(id);
            }
            RoomEvent::Flag { id } => {
                if let Some(m) = self.feed.get_mut(id) {
                    m.flagged = true;
                }
                if let Some(e) = self.pinned.get_mut(id) {
                    e.message.flagged = true;
                }
            }
            RoomEvent::Status { id, username, img, status } => {
                self.roster.upsert_status(id, &username, &img, status)
            }
            RoomEvent::Join { id, username, img } => self.roster.join(id, &username, &img),
            RoomEvent::Leave { id } => {
                self.roster.leave(id);
            }
            RoomEvent::Hotness { posts } => self.pinned.apply_hotness(&posts),
        }
    }

    /// Render a new post into the feed unless it is already there.
    pub(crate) fn append_post(&mut self, post: PostRecord) {
        if self.feed.contains(post.id) {
            return;
        }

        let content = parse_reply(&post.content, |t| self.feed.author_name(t));
        let own = self.is_me(post.author.id);
        let mentioned = content.text.contains(&format!("@{}", self.session.my_name));
        let replied = !content.to().is_empty() && content.to() == self.session.my_name;

        if !self.loading {
            if should_notify(self.volume, own, mentioned || replied) {
                let text = format!("{}: {}", post.author.name, content.text);
                notify::notify(self.notifier.as_ref(), &text, &post.author.img);
            }
            self.roster.mark_active(post.author.id);
        }

        let id = post.id;
        if let Some(evicted) = self.feed.insert(Message::from_record(post, content)) {
            if !evicted.is_empty() {
                debug!(id, evicted = ?evicted, "feed trimmed");
            }
        }
    }

    fn apply_pin(
        &mut self,
        id: PostId,
        score: i64,
        pincode: Option<&str>,
        author_id: Option<UserId>,
    ) {
        if !self.pinned.contains(id) {
            match self.feed.get_mut(id) {
                Some(m) => {
                    m.pinned = true;
                    let own = m.author.id == self.session.my_id;
                    let mut copy = m.clone();
                    copy.pinned = false;
                    copy.replied_by.clear();
                    self.pinned.insert(PinnedEntry::new(copy, own));
                }
                None => debug!(id, "pin for a post not in the feed"),
            }
        }

        let ours = pincode.is_some_and(|code| self.composer.take_pincode(code));
        let author_is_me = author_id == Some(self.session.my_id);

        if let Some(entry) = self.pinned.get_mut(id) {
            entry.score = score;
            entry.message.edited = false;
            if author_is_me {
                entry.voting_disabled = true;
            }
            // Pinning someone else's post counts as our up-vote.
            if ours && !author_is_me {
                entry.my_vote = Vote::Up;
            }
        }
    }

    fn apply_edit(&mut self, id: PostId, content: &str, raw: String) {
        let raw = if raw.is_empty() { content.to_string() } else { raw };
        let parsed = parse_reply(content, |t| self.feed.author_name(t));

        let mut author = None;
        if let Some(m) = self.feed.get_mut(id) {
            let old_target = m.reply_to();
            m.content = parsed.clone();
            m.raw = raw.clone();
            m.edited = true;
            author = Some(m.author.clone());
            self.feed.relink(id, old_target, parsed.reply_to());
        }
        if let Some(e) = self.pinned.get_mut(id) {
            e.message.content = parsed.clone();
            e.message.raw = raw;
            e.message.edited = true;
            author.get_or_insert_with(|| e.message.author.clone());
        }

        let Some(author) = author else {
            debug!(id, "edit for an unknown post");
            return;
        };
        let mentioned = parsed.text.contains(&format!("@{}", self.session.my_name));
        if !self.loading && mentioned && self.volume > Volume::Quiet && !self.is_me(author.id) {
            let text = format!("{}: {}", author.name, parsed.text);
            notify::notify(self.notifier.as_ref(), &text, &author.img);
        }
    }
}

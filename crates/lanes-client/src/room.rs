//! The room controller: owns the view model, the composer and the
//! viewer's session, and turns user actions into intents.

use std::time::Instant;

use tracing::{debug, warn};

use lanes_types::models::{PageData, PinnedRecord};
use lanes_types::{PostId, UserId};

use crate::banner::Banners;
use crate::composer::{Composer, KeyContext, pincode};
use crate::feed::{Feed, Message};
use crate::input::{Key, KeyOutcome};
use crate::intent::{Completion, Intent};
use crate::member::MemberPicker;
use crate::notify::{Notifier, Volume};
use crate::pinned::{PinnedBoard, PinnedEntry, Vote};
use crate::presence::Roster;
use crate::reply::parse_reply;

/// Who is looking at the room, as injected by the hosting page.
#[derive(Debug, Clone)]
pub struct Session {
    pub my_id: UserId,
    pub my_name: String,
    pub is_admin: bool,
    pub can_participate: bool,
    pub room_id: u64,
    pub org: String,
}

pub struct Room {
    pub(crate) session: Session,
    pub(crate) feed: Feed,
    pub(crate) pinned: PinnedBoard,
    pub(crate) roster: Roster,
    pub(crate) composer: Composer,
    pub(crate) member: MemberPicker,
    pub(crate) banners: Banners,
    pub(crate) volume: Volume,
    /// Set while hydrating from the page snapshot; gates notifications.
    pub(crate) loading: bool,
    pub(crate) notifier: Box<dyn Notifier>,
}

impl Room {
    pub fn new(session: Session, volume: Volume, notifier: Box<dyn Notifier>) -> Self {
        let composer = Composer::new(session.can_participate);
        Self {
            session,
            feed: Feed::default(),
            pinned: PinnedBoard::default(),
            roster: Roster::default(),
            composer,
            member: MemberPicker::default(),
            banners: Banners::default(),
            volume,
            loading: false,
            notifier,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn pinned(&self) -> &PinnedBoard {
        &self.pinned
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn member(&self) -> &MemberPicker {
        &self.member
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub(crate) fn is_me(&self, user: UserId) -> bool {
        user == self.session.my_id
    }

    /// Hydrate from the page snapshot: history first, then the pinned board.
    pub fn bootstrap(&mut self, page: PageData) {
        self.loading = true;
        for post in page.post_history {
            self.append_post(post);
        }
        for record in page.pinned {
            self.insert_pinned_record(record);
        }
        self.loading = false;
        debug!(
            posts = self.feed.len(),
            pinned = self.pinned.len(),
            "room hydrated"
        );
    }

    fn insert_pinned_record(&mut self, record: PinnedRecord) {
        let content = parse_reply(&record.post.content, |t| self.feed.author_name(t));
        let message = Message::from_record(record.post, content);
        let id = message.id;
        let own = self.is_me(message.author.id);

        let mut entry = PinnedEntry::new(message, own);
        entry.score = record.score;
        entry.my_vote = Vote::from_value(record.vote);
        if self.pinned.insert(entry) {
            if let Some(m) = self.feed.get_mut(id) {
                m.pinned = true;
            }
        }
    }

    // -- Composer --

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.composer.set_draft(text);
    }

    /// Route a keystroke from the main input.
    pub fn on_key(&mut self, key: Key) -> KeyOutcome {
        let me = self.session.my_id;
        let own = self.feed.posts_by(me);
        let ctx = KeyContext {
            own_posts: own
                .iter()
                .filter_map(|&id| self.feed.get(id).map(|m| (id, m.raw.as_str())))
                .collect(),
            people: self
                .roster
                .iter()
                .filter(|u| u.id != me && !u.name.is_empty())
                .map(|u| u.name.as_str())
                .collect(),
        };
        self.composer.on_key(key, &ctx)
    }

    /// Edit is offered on the viewer's own posts, and on every post to admins.
    pub fn can_edit(&self, id: PostId) -> bool {
        self.feed
            .get(id)
            .is_some_and(|m| self.session.is_admin || self.is_me(m.author.id))
    }

    /// The edit control on a post.
    pub fn edit(&mut self, id: PostId) -> bool {
        if !self.composer.is_enabled() || !self.can_edit(id) {
            return false;
        }
        match self.feed.get(id) {
            Some(m) => {
                self.composer.start_edit(id, &m.raw);
                true
            }
            None => false,
        }
    }

    /// The reply control; offered on other people's posts only.
    pub fn reply(&mut self, id: PostId) -> bool {
        match self.feed.get(id) {
            Some(m) if !self.is_me(m.author.id) && self.composer.is_enabled() => {
                self.composer.reply(id);
                true
            }
            _ => false,
        }
    }

    // -- Post controls --

    /// The pin control, offered on every post in the feed. The nonce lets
    /// the echo be recognised as ours.
    pub fn pin(&mut self, id: PostId) -> Option<Intent> {
        if !self.feed.contains(id) {
            return None;
        }
        let pincode = self.composer.new_pincode();
        Some(Intent::Pin { id, pincode })
    }

    /// Admin unpin. The `unpin` echo carries no nonce, so none is kept.
    pub fn unpin(&mut self, id: PostId) -> Option<Intent> {
        if !self.session.is_admin || !self.pinned.contains(id) {
            return None;
        }
        Some(Intent::Unpin { id, pincode: pincode() })
    }

    /// Cast a vote. The vote is shown right away; no second vote is offered.
    pub fn vote(&mut self, id: PostId, vote: Vote) -> Option<Intent> {
        if vote == Vote::None {
            return None;
        }
        let entry = self.pinned.get_mut(id)?;
        if !entry.can_vote() {
            return None;
        }
        entry.my_vote = vote;
        Some(Intent::Vote { id, vote })
    }

    /// The flag control disappears as soon as it is used.
    pub fn flag(&mut self, id: PostId) -> Option<Intent> {
        let own = self.session.my_id;
        let message = self.feed.get_mut(id)?;
        if message.flag_sent || message.author.id == own {
            return None;
        }
        message.flag_sent = true;
        Some(Intent::Flag { id })
    }

    /// Pick a volume level. Local state changes only once the server agrees.
    pub fn select_volume(&self, volume: Volume) -> Option<Intent> {
        (volume != self.volume).then_some(Intent::SetVolume(volume))
    }

    pub fn on_member_key(&mut self, key: Key) -> KeyOutcome {
        self.member.on_key(key, &self.session.org)
    }

    // -- Views --

    /// Posts to highlight along with `id`.
    pub fn related(&self, id: PostId) -> Vec<PostId> {
        self.feed.get(id).map(Message::related).unwrap_or_default()
    }

    pub fn history_url(&self, id: PostId) -> Option<String> {
        self.can_edit(id).then(|| format!("/post/{}/history/", id))
    }

    // -- Request outcomes --

    pub fn on_completion(&mut self, completion: Completion, now: Instant) {
        match completion {
            Completion::Done(Intent::SetVolume(volume)) => {
                debug!(%volume, "volume saved");
                self.volume = volume;
            }
            Completion::Done(intent) => debug!(kind = intent.kind(), "request done"),
            Completion::Failed { intent: Intent::Post { .. }, message } => {
                self.banners.push(message, now);
            }
            Completion::Failed { intent: Intent::AddMember { username }, message } => {
                warn!(%username, %message, "could not add member");
                self.member.failed();
            }
            Completion::Failed { intent, message } => {
                warn!(kind = intent.kind(), %message, "request failed");
            }
            Completion::MemberAdded { user_id, username } => {
                self.roster.add_member(user_id, &username);
                self.member.added();
            }
            Completion::SearchResults(hits) => self.member.show_results(hits),
        }
    }

    /// Advance timers.
    pub fn tick(&mut self, now: Instant) {
        self.banners.tick(now);
    }
}

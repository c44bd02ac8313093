//! The fast feed: the chronological stream of posts, grouped by author
//! and capped at [`MAX_VISIBLE`] posts.

use std::collections::{HashMap, VecDeque};

use lanes_types::models::{Author, PostRecord};
use lanes_types::{PostId, UserId};

use crate::reply::Content;

/// Posts kept in the feed before the oldest are evicted.
pub const MAX_VISIBLE: usize = 100;

/// Placeholder shown in place of a deleted post.
pub const DELETED_PLACEHOLDER: &str = "(deleted)";

/// A rendered post. The same record shape is used by the pinned board,
/// which keeps its own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: PostId,
    pub author: Author,
    pub raw: String,
    pub content: Content,
    pub edited: bool,
    pub deleted: bool,
    pub flagged: bool,
    /// Set once the post has been promoted to the pinned board.
    pub pinned: bool,
    /// Set once this client has flagged the post; the flag control is gone.
    pub flag_sent: bool,
    /// Posts currently in the feed that reply to this one.
    pub replied_by: Vec<PostId>,
}

impl Message {
    pub fn from_record(post: PostRecord, content: Content) -> Self {
        let mut message = Self {
            id: post.id,
            author: post.author,
            raw: post.raw,
            content,
            edited: post.edited,
            deleted: post.deleted,
            flagged: post.flagged,
            pinned: false,
            flag_sent: false,
            replied_by: Vec::new(),
        };
        if message.deleted {
            message.content = Content::plain(DELETED_PLACEHOLDER);
        }
        message
    }

    pub fn reply_to(&self) -> Option<PostId> {
        self.content.reply_to()
    }

    /// Ids to highlight together with this post: its reply target and
    /// every post replying to it.
    pub fn related(&self) -> Vec<PostId> {
        self.reply_to()
            .into_iter()
            .chain(self.replied_by.iter().copied())
            .collect()
    }
}

/// Consecutive posts by one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorGroup {
    pub author: Author,
    pub posts: VecDeque<PostId>,
}

#[derive(Debug, Default)]
pub struct Feed {
    messages: HashMap<PostId, Message>,
    groups: VecDeque<AuthorGroup>,
}

impl Feed {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, id: PostId) -> bool {
        self.messages.contains_key(&id)
    }

    pub fn get(&self, id: PostId) -> Option<&Message> {
        self.messages.get(&id)
    }

    pub fn get_mut(&mut self, id: PostId) -> Option<&mut Message> {
        self.messages.get_mut(&id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &AuthorGroup> {
        self.groups.iter()
    }

    /// Posts oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.groups
            .iter()
            .flat_map(|g| g.posts.iter())
            .filter_map(|id| self.messages.get(id))
    }

    pub fn author_name(&self, id: PostId) -> Option<String> {
        self.messages.get(&id).map(|m| m.author.name.clone())
    }

    /// Ids of posts written by `user`, oldest first.
    pub fn posts_by(&self, user: UserId) -> Vec<PostId> {
        self.groups
            .iter()
            .filter(|g| g.author.id == user)
            .flat_map(|g| g.posts.iter().copied())
            .collect()
    }

    /// Append a post, joining the last group when it has the same author.
    ///
    /// Returns the ids evicted to stay within [`MAX_VISIBLE`], or `None`
    /// when the post was already present.
    pub fn insert(&mut self, message: Message) -> Option<Vec<PostId>> {
        if self.messages.contains_key(&message.id) {
            return None;
        }

        let id = message.id;
        if let Some(target) = message.reply_to() {
            self.link(target, id);
        }

        match self.groups.back_mut() {
            Some(last) if last.author.id == message.author.id => last.posts.push_back(id),
            _ => self.groups.push_back(AuthorGroup {
                author: message.author.clone(),
                posts: VecDeque::from([id]),
            }),
        }
        self.messages.insert(id, message);

        let mut evicted = Vec::new();
        while self.messages.len() > MAX_VISIBLE {
            match self.evict_oldest() {
                Some(old) => evicted.push(old),
                None => break,
            }
        }
        Some(evicted)
    }

    /// Drop the oldest post, and its group when that leaves it empty.
    fn evict_oldest(&mut self) -> Option<PostId> {
        let group = self.groups.front_mut()?;
        let id = group.posts.pop_front();
        if group.posts.is_empty() {
            self.groups.pop_front();
        }
        let id = id?;

        if let Some(message) = self.messages.remove(&id) {
            if let Some(target) = message.reply_to() {
                self.unlink(target, id);
            }
        }
        Some(id)
    }

    /// Move the reply link of `id` from `old` to `new`.
    pub fn relink(&mut self, id: PostId, old: Option<PostId>, new: Option<PostId>) {
        if old == new {
            return;
        }
        if let Some(target) = old {
            self.unlink(target, id);
        }
        if let Some(target) = new {
            self.link(target, id);
        }
    }

    fn link(&mut self, target: PostId, reply: PostId) {
        if let Some(t) = self.messages.get_mut(&target) {
            if !t.replied_by.contains(&reply) {
                t.replied_by.push(reply);
            }
        }
    }

    fn unlink(&mut self, target: PostId, reply: PostId) {
        if let Some(t) = self.messages.get_mut(&target) {
            t.replied_by.retain(|&r| r != reply);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::parse_reply;

    fn author(id: UserId) -> Author {
        Author { id, name: format!("user{}", id), img: String::new() }
    }

    fn message(feed: &Feed, id: PostId, by: UserId, content: &str) -> Message {
        let content = parse_reply(content, |t| feed.author_name(t));
        let post = PostRecord {
            id,
            author: author(by),
            content: content.text.clone(),
            raw: String::new(),
            edited: false,
            deleted: false,
            flagged: false,
        };
        Message::from_record(post, content)
    }

    fn push(feed: &mut Feed, id: PostId, by: UserId, content: &str) -> Option<Vec<PostId>> {
        let m = message(feed, id, by, content);
        feed.insert(m)
    }

    #[test]
    fn groups_consecutive_authors() {
        let mut feed = Feed::default();
        push(&mut feed, 1, 1, "a");
        push(&mut feed, 2, 1, "b");
        push(&mut feed, 3, 2, "c");
        push(&mut feed, 4, 1, "d");

        let groups: Vec<Vec<PostId>> = feed.groups().map(|g| g.posts.iter().copied().collect()).collect();
        assert_eq!(groups, vec![vec![1, 2], vec![3], vec![4]]);
        assert_eq!(feed.posts_by(1), vec![1, 2, 4]);
    }

    #[test]
    fn duplicate_is_ignored() {
        let mut feed = Feed::default();
        assert_eq!(push(&mut feed, 1, 1, "a"), Some(vec![]));
        assert_eq!(push(&mut feed, 1, 1, "a"), None);
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut feed = Feed::default();
        for id in 1..=MAX_VISIBLE as PostId {
            // Alternate authors in pairs so groups empty out as we go.
            assert_eq!(push(&mut feed, id, (id + 1) / 2, "x"), Some(vec![]));
        }
        assert_eq!(feed.len(), MAX_VISIBLE);

        assert_eq!(push(&mut feed, 101, 999, "x"), Some(vec![1]));
        assert_eq!(push(&mut feed, 102, 999, "x"), Some(vec![2]));
        assert_eq!(feed.len(), MAX_VISIBLE);
        assert!(!feed.contains(1));
        assert_eq!(feed.iter().next().map(|m| m.id), Some(3));
        // Group of posts 1 and 2 is gone with them.
        assert_eq!(feed.groups().next().map(|g| g.author.id), Some(2));
    }

    #[test]
    fn reply_links_are_symmetric() {
        let mut feed = Feed::default();
        push(&mut feed, 1, 1, "question");
        push(&mut feed, 2, 2, ":1 answer");
        assert_eq!(feed.get(2).unwrap().content.to(), "user1");
        assert_eq!(feed.get(1).unwrap().replied_by, vec![2]);
        assert_eq!(feed.get(1).unwrap().related(), vec![2]);
        assert_eq!(feed.get(2).unwrap().related(), vec![1]);

        feed.relink(2, Some(1), None);
        assert!(feed.get(1).unwrap().replied_by.is_empty());
    }

    #[test]
    fn eviction_unlinks_reply() {
        let mut feed = Feed::default();
        push(&mut feed, 1, 1, "root");
        push(&mut feed, 2, 2, ":1 first");
        for id in 3..=101 {
            push(&mut feed, id, 3, "filler");
        }
        assert!(!feed.contains(1));
        assert!(feed.contains(2));
        push(&mut feed, 102, 3, "filler");
        assert!(!feed.contains(2));
    }

    #[test]
    fn deleted_record_renders_placeholder() {
        let post = PostRecord {
            id: 9,
            author: author(1),
            content: "secret".into(),
            raw: "secret".into(),
            edited: false,
            deleted: true,
            flagged: false,
        };
        let m = Message::from_record(post, Content::plain("secret"));
        assert_eq!(m.content.text, DELETED_PLACEHOLDER);
    }
}

//! The pinned board: promoted posts with a vote tally, newest pin on top
//! until a hotness ranking reorders them.

use std::collections::HashMap;

use lanes_types::PostId;
use lanes_types::events::HotnessEntry;

use crate::feed::Message;

/// The viewer's own vote on a pinned post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Vote {
    #[default]
    None,
    Up,
    Down,
}

impl Vote {
    /// Wire value: 1, -1, or 0 for no vote.
    pub fn value(self) -> i8 {
        match self {
            Self::None => 0,
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    pub fn from_value(value: i8) -> Self {
        match value {
            1 => Self::Up,
            -1 => Self::Down,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PinnedEntry {
    pub message: Message,
    pub score: i64,
    pub my_vote: Vote,
    /// Voting is off for the viewer's own posts.
    pub voting_disabled: bool,
    pub hotness: Option<f64>,
}

impl PinnedEntry {
    pub fn new(message: Message, voting_disabled: bool) -> Self {
        Self {
            message,
            score: 0,
            my_vote: Vote::None,
            voting_disabled,
            hotness: None,
        }
    }

    pub fn id(&self) -> PostId {
        self.message.id
    }

    /// One vote per viewer; the controls go inert once it is cast.
    pub fn can_vote(&self) -> bool {
        !self.voting_disabled && self.my_vote == Vote::None
    }
}

#[derive(Debug, Default)]
pub struct PinnedBoard {
    entries: Vec<PinnedEntry>,
}

impl PinnedBoard {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PinnedEntry] {
        &self.entries
    }

    pub fn contains(&self, id: PostId) -> bool {
        self.entries.iter().any(|e| e.id() == id)
    }

    pub fn get(&self, id: PostId) -> Option<&PinnedEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: PostId) -> Option<&mut PinnedEntry> {
        self.entries.iter_mut().find(|e| e.id() == id)
    }

    /// Put an entry on top of the board. An entry already present is kept.
    pub fn insert(&mut self, entry: PinnedEntry) -> bool {
        if self.contains(entry.id()) {
            return false;
        }
        self.entries.insert(0, entry);
        true
    }

    pub fn remove(&mut self, id: PostId) -> Option<PinnedEntry> {
        let idx = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(idx))
    }

    pub fn set_score(&mut self, id: PostId, score: i64) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.score = score;
                true
            }
            None => false,
        }
    }

    /// Apply a hotness ranking: listed entries take the new scores and move
    /// to the top, hottest first; the rest keep their order below them.
    pub fn apply_hotness(&mut self, ranking: &[HotnessEntry]) {
        let ranked: HashMap<PostId, &HotnessEntry> = ranking.iter().map(|h| (h.id, h)).collect();

        for entry in &mut self.entries {
            if let Some(h) = ranked.get(&entry.id()) {
                entry.score = h.score;
                entry.hotness = Some(h.hotness);
            }
        }

        self.entries.sort_by(|a, b| {
            let ha = ranked.get(&a.id()).map(|h| h.hotness);
            let hb = ranked.get(&b.id()).map(|h| h.hotness);
            match (ha, hb) {
                (Some(x), Some(y)) => y.total_cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
    }
}

//! The add-member field: search-as-you-type with keyboard selection.

use lanes_types::models::UserHit;

use crate::input::{Key, KeyOutcome};
use crate::intent::Intent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldState {
    #[default]
    Idle,
    Success,
    Error,
}

#[derive(Debug, Default)]
pub struct MemberPicker {
    input: String,
    results: Vec<UserHit>,
    selected: Option<usize>,
    /// Disabled while an add request is in flight.
    busy: bool,
    state: FieldState,
}

impl MemberPicker {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn results(&self) -> &[UserHit] {
        &self.results
    }

    pub fn selected(&self) -> Option<&UserHit> {
        self.selected.and_then(|i| self.results.get(i))
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn on_key(&mut self, key: Key, org: &str) -> KeyOutcome {
        if self.busy {
            return KeyOutcome::Ignored;
        }

        match key {
            Key::Down => {
                let next = self.selected.map_or(0, |i| i + 1);
                if next < self.results.len() {
                    self.select(next);
                }
                KeyOutcome::Consumed
            }
            Key::Up => {
                match self.selected {
                    Some(i) if i > 0 => self.select(i - 1),
                    _ => self.selected = None,
                }
                KeyOutcome::Consumed
            }
            Key::Escape => {
                self.clear_results();
                KeyOutcome::Consumed
            }
            Key::Enter { .. } => {
                let username = self.input.trim().to_string();
                if username.is_empty() {
                    return KeyOutcome::Consumed;
                }
                self.busy = true;
                self.clear_results();
                KeyOutcome::Send(Intent::AddMember { username })
            }
            Key::Char(c) => {
                self.input.push(c);
                self.search(org)
            }
            Key::Backspace => {
                self.input.pop();
                self.search(org)
            }
            Key::Tab { .. } | Key::Other => KeyOutcome::Ignored,
        }
    }

    /// Replace the candidate list. A late response to an older search simply
    /// overwrites whatever is shown.
    pub fn show_results(&mut self, hits: Vec<UserHit>) {
        self.results = hits;
        self.selected = None;
    }

    pub fn added(&mut self) {
        self.input.clear();
        self.busy = false;
        self.state = FieldState::Success;
    }

    pub fn failed(&mut self) {
        self.busy = false;
        self.state = FieldState::Error;
    }

    fn select(&mut self, idx: usize) {
        self.selected = Some(idx);
        self.input = self.results[idx].username.clone();
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.selected = None;
    }

    fn search(&mut self, org: &str) -> KeyOutcome {
        self.state = FieldState::Idle;
        if self.input.is_empty() {
            self.clear_results();
            return KeyOutcome::Consumed;
        }
        KeyOutcome::Send(Intent::SearchUsers { org: org.to_string(), query: self.input.clone() })
    }
}

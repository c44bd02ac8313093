//! The composer: draft text, edit mode, mention autocomplete, and the
//! nonces of pin requests still waiting for their echo.

use rand::distr::{Alphanumeric, SampleString};

use lanes_types::PostId;

use crate::input::{Key, KeyOutcome};
use crate::intent::Intent;
use crate::reply::with_reply_token;

const PINCODE_LEN: usize = 12;

/// A random nonce for a pin request.
pub fn pincode() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), PINCODE_LEN)
}

/// An open `@mention` completion session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autocomplete {
    pub candidates: Vec<String>,
    /// `None` until the first Tab.
    pub index: Option<usize>,
    /// Byte offset in the draft where the `@token` starts.
    token_start: usize,
}

impl Autocomplete {
    pub fn selected(&self) -> Option<&str> {
        self.index.map(|i| self.candidates[i].as_str())
    }

    fn step(&mut self, forward: bool) {
        let n = self.candidates.len();
        self.index = Some(match (self.index, forward) {
            (None, true) => 0,
            (None, false) => n - 1,
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
        });
    }
}

/// Everything the composer needs to know about the room for one keystroke.
#[derive(Debug, Default)]
pub struct KeyContext<'a> {
    /// The viewer's own posts in the feed, oldest first, with raw text.
    pub own_posts: Vec<(PostId, &'a str)>,
    /// Names offered for autocomplete (the viewer excluded).
    pub people: Vec<&'a str>,
}

#[derive(Debug)]
pub struct Composer {
    draft: String,
    editing: Option<PostId>,
    autocomplete: Option<Autocomplete>,
    pincodes: Vec<String>,
    enabled: bool,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Composer {
    pub fn new(enabled: bool) -> Self {
        Self {
            draft: String::new(),
            editing: None,
            autocomplete: None,
            pincodes: Vec::new(),
            enabled,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn editing(&self) -> Option<PostId> {
        self.editing
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn autocomplete(&self) -> Option<&Autocomplete> {
        self.autocomplete.as_ref()
    }

    pub fn pending_pincodes(&self) -> &[String] {
        &self.pincodes
    }

    /// Load a post into the draft for editing. Only one post is ever in
    /// edit mode.
    pub fn start_edit(&mut self, id: PostId, raw: &str) {
        self.stop_edit();
        self.editing = Some(id);
        self.draft = raw.to_string();
    }

    /// Leave edit mode with an empty draft.
    pub fn stop_edit(&mut self) {
        self.draft.clear();
        self.editing = None;
    }

    pub fn reply(&mut self, target: PostId) {
        self.draft = with_reply_token(&self.draft, target);
    }

    /// Fresh nonce for a pin request, remembered until its echo arrives.
    pub fn new_pincode(&mut self) -> String {
        let code = pincode();
        self.pincodes.push(code.clone());
        code
    }

    /// Consume a pending nonce. Returns whether it was ours.
    pub fn take_pincode(&mut self, code: &str) -> bool {
        match self.pincodes.iter().position(|c| c == code) {
            Some(idx) => {
                self.pincodes.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn on_key(&mut self, key: Key, ctx: &KeyContext<'_>) -> KeyOutcome {
        if !self.enabled {
            return KeyOutcome::Ignored;
        }

        if let Some(ac) = self.autocomplete.as_mut() {
            match key {
                Key::Tab { shift } => {
                    ac.step(!shift);
                    let token_start = ac.token_start;
                    let name = ac.selected().unwrap_or_default().to_string();
                    self.draft.truncate(token_start);
                    self.draft.push('@');
                    self.draft.push_str(&name);
                    return KeyOutcome::Consumed;
                }
                Key::Enter { shift: false } => {
                    self.autocomplete = None;
                    return KeyOutcome::Consumed;
                }
                _ => self.autocomplete = None,
            }
        }

        match key {
            Key::Enter { shift: false } => self.submit(),
            Key::Enter { shift: true } => {
                self.draft.push('\n');
                KeyOutcome::Consumed
            }
            Key::Escape => {
                self.stop_edit();
                KeyOutcome::Consumed
            }
            Key::Up => {
                if self.editing.is_some() {
                    self.step_edit(-1, ctx);
                    KeyOutcome::Consumed
                } else if self.draft.is_empty() {
                    if let Some(&(id, raw)) = ctx.own_posts.last() {
                        self.start_edit(id, raw);
                    }
                    KeyOutcome::Consumed
                } else {
                    KeyOutcome::Ignored
                }
            }
            Key::Down => {
                if self.editing.is_some() {
                    self.step_edit(1, ctx);
                    KeyOutcome::Consumed
                } else {
                    KeyOutcome::Ignored
                }
            }
            Key::Char(c) => {
                self.draft.push(c);
                self.open_autocomplete(ctx);
                KeyOutcome::Consumed
            }
            Key::Backspace => {
                self.draft.pop();
                KeyOutcome::Consumed
            }
            Key::Tab { .. } | Key::Other => KeyOutcome::Ignored,
        }
    }

    fn submit(&mut self) -> KeyOutcome {
        if self.draft.trim().is_empty() {
            return KeyOutcome::Consumed;
        }
        let message = std::mem::take(&mut self.draft);
        let intent = match self.editing.take() {
            Some(id) => Intent::Edit { id, message },
            None => Intent::Post { message },
        };
        KeyOutcome::Send(intent)
    }

    /// Move to the neighbouring own post; walking off either end (or losing
    /// track of the edited post) leaves edit mode.
    fn step_edit(&mut self, delta: isize, ctx: &KeyContext<'_>) {
        let current = self
            .editing
            .and_then(|id| ctx.own_posts.iter().position(|&(p, _)| p == id));
        let next = current
            .and_then(|i| i.checked_add_signed(delta))
            .and_then(|j| ctx.own_posts.get(j));
        match next {
            Some(&(id, raw)) => self.start_edit(id, raw),
            None => self.stop_edit(),
        }
    }

    fn open_autocomplete(&mut self, ctx: &KeyContext<'_>) {
        let token_start = self
            .draft
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        let token = &self.draft[token_start..];
        let Some(query) = token.strip_prefix('@') else {
            return;
        };
        if query.is_empty() {
            return;
        }

        let query = query.to_lowercase();
        let mut candidates: Vec<String> = Vec::new();
        for name in &ctx.people {
            if name.to_lowercase().contains(&query) && !candidates.iter().any(|c| c == name) {
                candidates.push(name.to_string());
            }
        }
        if !candidates.is_empty() {
            self.autocomplete = Some(Autocomplete { candidates, index: None, token_start });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(own: &[(PostId, &'a str)], people: &[&'a str]) -> KeyContext<'a> {
        KeyContext { own_posts: own.to_vec(), people: people.to_vec() }
    }

    fn type_str(c: &mut Composer, text: &str, ctx: &KeyContext<'_>) {
        for ch in text.chars() {
            c.on_key(Key::Char(ch), ctx);
        }
    }

    #[test]
    fn enter_posts_and_clears() {
        let mut c = Composer::default();
        let cx = ctx(&[], &[]);
        type_str(&mut c, "hello", &cx);
        let out = c.on_key(Key::Enter { shift: false }, &cx);
        assert_eq!(out, KeyOutcome::Send(Intent::Post { message: "hello".into() }));
        assert_eq!(c.draft(), "");
    }

    #[test]
    fn blank_draft_is_not_sent() {
        let mut c = Composer::default();
        let cx = ctx(&[], &[]);
        type_str(&mut c, "   ", &cx);
        assert_eq!(c.on_key(Key::Enter { shift: false }, &cx), KeyOutcome::Consumed);
        assert_eq!(c.draft(), "   ");
    }

    #[test]
    fn shift_enter_adds_newline() {
        let mut c = Composer::default();
        let cx = ctx(&[], &[]);
        type_str(&mut c, "a", &cx);
        c.on_key(Key::Enter { shift: true }, &cx);
        type_str(&mut c, "b", &cx);
        assert_eq!(c.draft(), "a\nb");
    }

    #[test]
    fn up_selects_latest_own_and_cycles() {
        let mut c = Composer::default();
        let cx = ctx(&[(1, "one"), (5, "five"), (9, "nine")], &[]);

        c.on_key(Key::Up, &cx);
        assert_eq!(c.editing(), Some(9));
        assert_eq!(c.draft(), "nine");

        c.on_key(Key::Up, &cx);
        c.on_key(Key::Up, &cx);
        assert_eq!(c.editing(), Some(1));

        // Past the oldest leaves edit mode.
        c.on_key(Key::Up, &cx);
        assert_eq!(c.editing(), None);
        assert_eq!(c.draft(), "");

        c.on_key(Key::Up, &cx);
        c.on_key(Key::Down, &cx);
        assert_eq!(c.editing(), None);
    }

    #[test]
    fn edit_submission() {
        let mut c = Composer::default();
        let cx = ctx(&[(4, "old")], &[]);
        c.on_key(Key::Up, &cx);
        type_str(&mut c, "er", &cx);
        let out = c.on_key(Key::Enter { shift: false }, &cx);
        assert_eq!(out, KeyOutcome::Send(Intent::Edit { id: 4, message: "older".into() }));
        assert!(!c.is_editing());
    }

    #[test]
    fn up_while_composing_is_ignored() {
        let mut c = Composer::default();
        let cx = ctx(&[(1, "one")], &[]);
        type_str(&mut c, "draft", &cx);
        assert_eq!(c.on_key(Key::Up, &cx), KeyOutcome::Ignored);
        assert_eq!(c.draft(), "draft");
        assert_eq!(c.on_key(Key::Down, &cx), KeyOutcome::Ignored);
    }

    #[test]
    fn escape_always_resets() {
        let mut c = Composer::default();
        let cx = ctx(&[(1, "one")], &[]);
        c.on_key(Key::Up, &cx);
        c.on_key(Key::Escape, &cx);
        assert!(!c.is_editing());
        assert_eq!(c.draft(), "");

        type_str(&mut c, "text", &cx);
        c.on_key(Key::Escape, &cx);
        assert_eq!(c.draft(), "");
    }

    #[test]
    fn edited_post_gone_leaves_edit_mode() {
        let mut c = Composer::default();
        c.start_edit(3, "three");
        let cx = ctx(&[(7, "seven")], &[]);
        c.on_key(Key::Down, &cx);
        assert!(!c.is_editing());
    }

    #[test]
    fn autocomplete_filters_and_wraps() {
        let mut c = Composer::default();
        let cx = ctx(&[], &["alice", "albert", "bob"]);
        type_str(&mut c, "hi @al", &cx);

        let ac = c.autocomplete().unwrap();
        assert_eq!(ac.candidates, vec!["alice", "albert"]);
        assert_eq!(ac.selected(), None);

        c.on_key(Key::Tab { shift: false }, &cx);
        assert_eq!(c.draft(), "hi @alice");
        c.on_key(Key::Tab { shift: false }, &cx);
        assert_eq!(c.draft(), "hi @albert");
        c.on_key(Key::Tab { shift: false }, &cx);
        assert_eq!(c.draft(), "hi @alice");
        c.on_key(Key::Tab { shift: true }, &cx);
        assert_eq!(c.draft(), "hi @albert");

        // Enter closes the session instead of sending.
        assert_eq!(c.on_key(Key::Enter { shift: false }, &cx), KeyOutcome::Consumed);
        assert!(c.autocomplete().is_none());
        assert_eq!(c.draft(), "hi @albert");
    }

    #[test]
    fn autocomplete_needs_more_than_at() {
        let mut c = Composer::default();
        let cx = ctx(&[], &["alice"]);
        type_str(&mut c, "@", &cx);
        assert!(c.autocomplete().is_none());
        type_str(&mut c, "zz", &cx);
        assert!(c.autocomplete().is_none());
    }

    #[test]
    fn escape_closes_autocomplete() {
        let mut c = Composer::default();
        let cx = ctx(&[], &["alice"]);
        type_str(&mut c, "@a", &cx);
        assert!(c.autocomplete().is_some());
        c.on_key(Key::Escape, &cx);
        assert!(c.autocomplete().is_none());
    }

    #[test]
    fn reply_prefixes_draft() {
        let mut c = Composer::default();
        c.set_draft(":3 see above");
        c.reply(8);
        assert_eq!(c.draft(), ":8 see above");
    }

    #[test]
    fn pincodes_are_consumed_once() {
        let mut c = Composer::default();
        let code = c.new_pincode();
        assert_eq!(code.len(), PINCODE_LEN);
        assert!(c.take_pincode(&code));
        assert!(!c.take_pincode(&code));
        assert!(c.pending_pincodes().is_empty());
    }

    #[test]
    fn disabled_composer_ignores_keys() {
        let mut c = Composer::new(false);
        let cx = ctx(&[(1, "x")], &[]);
        assert_eq!(c.on_key(Key::Char('a'), &cx), KeyOutcome::Ignored);
        assert_eq!(c.on_key(Key::Up, &cx), KeyOutcome::Ignored);
        assert_eq!(c.draft(), "");
    }
}

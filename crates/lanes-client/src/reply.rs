//! Reply tokens.
//!
//! A post that answers another starts with `:<id>` followed by a space,
//! e.g. `":42 sounds good"`. The token is replaced at render time by an
//! `@name` decoration naming the author of post 42.

use std::fmt;

use lanes_types::PostId;

/// Parse the leading token of `content` as `:<digits>`.
fn reply_token(content: &str) -> Option<PostId> {
    let first = content.split(' ').next()?;
    let digits = first.strip_prefix(':')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Text with the reply token (and the single space after it) removed.
pub fn strip_reply_token(content: &str) -> &str {
    if reply_token(content).is_none() {
        return content;
    }
    match content.split_once(' ') {
        Some((_, rest)) => rest,
        None => "",
    }
}

/// Prefix `draft` with a reply token for `target`, replacing any token
/// already there.
pub fn with_reply_token(draft: &str, target: PostId) -> String {
    format!(":{} {}", target, strip_reply_token(draft))
}

/// Rendered content of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub reply: Option<ReplyDecoration>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyDecoration {
    pub target: PostId,
    /// Author name of the target post. Empty when the target is not
    /// known to this client.
    pub to: String,
}

impl Content {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { reply: None, text: text.into() }
    }

    pub fn reply_to(&self) -> Option<PostId> {
        self.reply.as_ref().map(|r| r.target)
    }

    /// Name the post is addressed to, or "" when it is not a reply.
    pub fn to(&self) -> &str {
        self.reply.as_ref().map_or("", |r| r.to.as_str())
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reply {
            Some(reply) => write!(f, "↪ @{} {}", reply.to, self.text),
            None => f.write_str(&self.text),
        }
    }
}

/// Parse `content`, resolving a reply token through `author_of`.
pub fn parse_reply<F>(content: &str, author_of: F) -> Content
where
    F: FnOnce(PostId) -> Option<String>,
{
    match reply_token(content) {
        Some(target) => Content {
            reply: Some(ReplyDecoration {
                target,
                to: author_of(target).unwrap_or_default(),
            }),
            text: strip_reply_token(content).to_string(),
        },
        None => Content::plain(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_target() {
        let c = parse_reply(":42 hello", |id| (id == 42).then(|| "alice".to_string()));
        assert_eq!(c.reply_to(), Some(42));
        assert_eq!(c.text, "hello");
        assert_eq!(c.to(), "alice");
        assert_eq!(c.to_string(), "↪ @alice hello");
    }

    #[test]
    fn unknown_target_has_empty_to() {
        let c = parse_reply(":42 hello there", |_| None);
        assert_eq!(c.reply_to(), Some(42));
        assert_eq!(c.to(), "");
        assert_eq!(c.text, "hello there");
    }

    #[test]
    fn non_tokens_stay_plain() {
        for s in [":abc hi", "hi :42", ": hi", ":4a2 x", "", "42 hi"] {
            let c = parse_reply(s, |_| Some("x".into()));
            assert_eq!(c.reply, None, "{:?}", s);
            assert_eq!(c.text, s);
        }
    }

    #[test]
    fn bare_token_has_empty_text() {
        let c = parse_reply(":7", |_| None);
        assert_eq!(c.reply_to(), Some(7));
        assert_eq!(c.text, "");
    }

    #[test]
    fn reply_token_replaces_existing_prefix() {
        assert_eq!(with_reply_token("", 5), ":5 ");
        assert_eq!(with_reply_token("hey", 5), ":5 hey");
        assert_eq!(with_reply_token(":3 hey there", 5), ":5 hey there");
        assert_eq!(strip_reply_token(":3"), "");
    }
}

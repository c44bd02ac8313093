//! Plain-text views of the room for the terminal.

use std::fmt::Write;

use lanes_client::feed::DELETED_PLACEHOLDER;
use lanes_client::{Message, PinnedEntry, Room, Vote};

fn markers(message: &Message) -> String {
    let mut out = String::new();
    if message.edited {
        out.push_str(" (edited)");
    }
    if message.pinned {
        out.push_str(" [pinned]");
    }
    if message.flagged {
        out.push_str(" [flagged]");
    }
    if !message.replied_by.is_empty() {
        let _ = write!(out, " <- {:?}", message.replied_by);
    }
    out
}

pub fn message_line(message: &Message) -> String {
    if message.deleted {
        return format!("#{} {}: {}", message.id, message.author.name, DELETED_PLACEHOLDER);
    }
    format!("#{} {}: {}{}", message.id, message.author.name, message.content, markers(message))
}

pub fn pinned_line(entry: &PinnedEntry) -> String {
    let vote = match entry.my_vote {
        Vote::Up => " (you +1)",
        Vote::Down => " (you -1)",
        Vote::None => "",
    };
    let hot = entry.hotness.map(|h| format!(" hot {:.2}", h)).unwrap_or_default();
    format!("{:+} {}{}{}", entry.score, message_line(&entry.message), vote, hot)
}

pub fn feed(room: &Room) -> String {
    let mut out = String::new();
    for group in room.feed().groups() {
        let _ = writeln!(out, "-- {}", group.author.name);
        for id in &group.posts {
            if let Some(message) = room.feed().get(*id) {
                let _ = writeln!(out, "  {}", message_line(message));
            }
        }
    }
    out
}

pub fn pinned(room: &Room) -> String {
    room.pinned().entries().iter().map(|e| pinned_line(e) + "\n").collect()
}

pub fn users(room: &Room) -> String {
    room.roster()
        .iter()
        .map(|u| format!("{} {}\n", if u.online { "*" } else { " " }, u.name))
        .collect()
}

/// One status line: draft, edit target and anything waiting on the user.
pub fn status(room: &Room) -> String {
    let mut out = String::new();
    if room.is_loading() {
        out.push_str("[loading] ");
    }
    if let Some(id) = room.composer().editing() {
        let _ = write!(out, "[editing #{}] ", id);
    }
    if let Some(ac) = room.composer().autocomplete() {
        let _ = write!(out, "[@ {}] ", ac.candidates.join(" "));
    }
    if !room.member().results().is_empty() {
        let names: Vec<_> = room.member().results().iter().map(|h| h.username.as_str()).collect();
        let _ = write!(out, "[users: {}] ", names.join(", "));
    }
    for banner in room.banners().iter() {
        let _ = write!(out, "!! {} ", banner.message);
    }
    let _ = write!(out, "volume {} > {}", room.volume(), room.composer().draft());
    out
}

//! Line-oriented controls for the terminal front end.
//!
//! Plain lines are typed into the composer and submitted. Lines starting
//! with `/` drive the other controls.

use lanes_client::{Intent, Key, KeyOutcome, Room, Volume, Vote};
use lanes_types::PostId;

pub const HELP: &str = "\
  <text>              post (or finish the current edit / reply)
  /up /down /esc      walk through your own posts for editing
  /edit <id>          edit a post
  /reply <id>         reply to a post
  /pin <id>           pin a post          /unpin <id>  (admins)
  /vote <id> up|down  vote on a pinned post
  /flag <id>          flag a post
  /volume quiet|normal|loud
  /search <name>      look up users       /add <name>  add a member
  /feed /pinned /users /help";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Say(String),
    Up,
    Down,
    Escape,
    Edit(PostId),
    Reply(PostId),
    Pin(PostId),
    Unpin(PostId),
    Vote(PostId, Vote),
    Flag(PostId),
    Volume(Volume),
    Search(String),
    Add(String),
    Feed,
    Pinned,
    Users,
    Help,
}

fn post_id(arg: Option<&str>) -> Result<PostId, String> {
    let arg = arg.ok_or("missing post id")?;
    arg.parse().map_err(|_| format!("bad post id '{}'", arg))
}

fn rest(arg: &str) -> Result<String, String> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err("missing argument".into());
    }
    Ok(arg.to_string())
}

pub fn parse(line: &str) -> Result<Command, String> {
    let Some(cmd) = line.strip_prefix('/') else {
        return Ok(Command::Say(line.to_string()));
    };
    let (name, tail) = cmd.split_once(' ').unwrap_or((cmd, ""));
    let mut args = tail.split_whitespace();

    match name {
        "up" => Ok(Command::Up),
        "down" => Ok(Command::Down),
        "esc" => Ok(Command::Escape),
        "edit" => post_id(args.next()).map(Command::Edit),
        "reply" => post_id(args.next()).map(Command::Reply),
        "pin" => post_id(args.next()).map(Command::Pin),
        "unpin" => post_id(args.next()).map(Command::Unpin),
        "flag" => post_id(args.next()).map(Command::Flag),
        "vote" => {
            let id = post_id(args.next())?;
            let vote = match args.next() {
                Some("up" | "+" | "1") => Vote::Up,
                Some("down" | "-" | "-1") => Vote::Down,
                other => return Err(format!("bad vote {:?}", other)),
            };
            Ok(Command::Vote(id, vote))
        }
        "volume" => args
            .next()
            .ok_or_else(|| "missing volume".to_string())?
            .parse()
            .map(Command::Volume),
        "search" => rest(tail).map(Command::Search),
        "add" => rest(tail).map(Command::Add),
        "feed" => Ok(Command::Feed),
        "pinned" => Ok(Command::Pinned),
        "users" => Ok(Command::Users),
        "help" => Ok(Command::Help),
        other => Err(format!("unknown command /{}", other)),
    }
}

/// What a command asks of the front end.
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub intents: Vec<Intent>,
    pub show: Option<View>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Feed,
    Pinned,
    Users,
    Help,
}

impl Outcome {
    fn send(intent: Option<Intent>) -> Self {
        Self { intents: intent.into_iter().collect(), show: None }
    }

    fn show(view: View) -> Self {
        Self { intents: Vec::new(), show: Some(view) }
    }
}

fn type_into_member_field(room: &mut Room, text: &str) -> Option<Intent> {
    let mut last = None;
    for c in text.chars() {
        if let KeyOutcome::Send(intent) = room.on_member_key(Key::Char(c)) {
            last = Some(intent);
        }
    }
    last
}

pub fn run(room: &mut Room, command: Command) -> Outcome {
    match command {
        Command::Say(text) => {
            let draft = if room.composer().is_editing() {
                text
            } else {
                format!("{}{}", room.composer().draft(), text)
            };
            room.set_draft(draft);
            Outcome::send(room.on_key(Key::Enter { shift: false }).intent())
        }
        Command::Up => Outcome::send(room.on_key(Key::Up).intent()),
        Command::Down => Outcome::send(room.on_key(Key::Down).intent()),
        Command::Escape => Outcome::send(room.on_key(Key::Escape).intent()),
        Command::Edit(id) => {
            room.edit(id);
            Outcome::default()
        }
        Command::Reply(id) => {
            room.reply(id);
            Outcome::default()
        }
        Command::Pin(id) => Outcome::send(room.pin(id)),
        Command::Unpin(id) => Outcome::send(room.unpin(id)),
        Command::Vote(id, vote) => Outcome::send(room.vote(id, vote)),
        Command::Flag(id) => Outcome::send(room.flag(id)),
        Command::Volume(volume) => Outcome::send(room.select_volume(volume)),
        Command::Search(name) => Outcome::send(type_into_member_field(room, &name)),
        Command::Add(name) => {
            type_into_member_field(room, &name);
            Outcome::send(room.on_member_key(Key::Enter { shift: false }).intent())
        }
        Command::Feed => Outcome::show(View::Feed),
        Command::Pinned => Outcome::show(View::Pinned),
        Command::Users => Outcome::show(View::Users),
        Command::Help => Outcome::show(View::Help),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanes_client::{NullNotifier, Session};

    fn room() -> Room {
        let session = Session {
            my_id: 1,
            my_name: "me".into(),
            is_admin: false,
            can_participate: true,
            room_id: 1,
            org: "acme".into(),
        };
        Room::new(session, Volume::Normal, Box::new(NullNotifier))
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse("hello /there"), Ok(Command::Say("hello /there".into())));
        assert_eq!(parse("/vote 4 down"), Ok(Command::Vote(4, Vote::Down)));
        assert_eq!(parse("/volume loud"), Ok(Command::Volume(Volume::Loud)));
        assert_eq!(parse("/add  carol "), Ok(Command::Add("carol".into())));
        assert!(parse("/pin x").is_err());
        assert!(parse("/vote 4 sideways").is_err());
        assert!(parse("/dance").is_err());
    }

    #[test]
    fn reply_then_say() {
        let mut room = room();
        room.receive_frame(
            r#"{"type":"msg","id":5,"author":{"id":2,"name":"bob","img":""},"content":"hey"}"#,
        );
        run(&mut room, Command::Reply(5));
        let out = run(&mut room, Command::Say("hi bob".into()));
        assert_eq!(out.intents, vec![Intent::Post { message: ":5 hi bob".into() }]);
    }

    #[test]
    fn add_sends_one_request() {
        let mut room = room();
        let out = run(&mut room, Command::Add("carol".into()));
        assert_eq!(out.intents, vec![Intent::AddMember { username: "carol".into() }]);
        assert!(room.member().is_busy());
    }

    #[test]
    fn search_sends_latest_query() {
        let mut room = room();
        let out = run(&mut room, Command::Search("car".into()));
        assert_eq!(
            out.intents,
            vec![Intent::SearchUsers { org: "acme".into(), query: "car".into() }]
        );
    }
}

//! Who is in the room and whether they are around.

use lanes_types::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub img: String,
    pub online: bool,
    /// Last status code reported by the server, if any.
    pub status: Option<u8>,
}

impl User {
    fn new(id: UserId, name: String, img: String) -> Self {
        Self { id, name, img, online: false, status: None }
    }
}

/// Room members in the order they were first seen.
#[derive(Debug, Default)]
pub struct Roster {
    users: Vec<User>,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Find or create a user. Non-empty `name` and `img` overwrite what was
    /// known, so a bare frame never blanks a name.
    fn entry(&mut self, id: UserId, name: &str, img: &str) -> &mut User {
        match self.users.iter().position(|u| u.id == id) {
            Some(idx) => {
                let user = &mut self.users[idx];
                if !name.is_empty() {
                    user.name = name.to_string();
                }
                if !img.is_empty() {
                    user.img = img.to_string();
                }
                user
            }
            None => {
                self.users.push(User::new(id, name.to_string(), img.to_string()));
                let last = self.users.len() - 1;
                &mut self.users[last]
            }
        }
    }

    /// Record a status code. The code replaces the marker outright: zero
    /// reads as offline, anything else as online.
    pub fn upsert_status(&mut self, id: UserId, name: &str, img: &str, status: u8) {
        let user = self.entry(id, name, img);
        user.status = Some(status);
        user.online = status > 0;
    }

    pub fn join(&mut self, id: UserId, name: &str, img: &str) {
        self.entry(id, name, img).online = true;
    }

    pub fn leave(&mut self, id: UserId) {
        self.entry(id, "", "").online = false;
    }

    /// A user who just posted is online.
    pub fn mark_active(&mut self, id: UserId) {
        if let Some(user) = self.users.iter_mut().find(|u| u.id == id) {
            user.online = true;
        }
    }

    /// Add a freshly invited member, offline until seen.
    pub fn add_member(&mut self, id: UserId, name: &str) {
        self.entry(id, name, "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_creates_unknown_users() {
        let mut roster = Roster::default();
        roster.upsert_status(4, "dora", "d.png", 1);
        let dora = roster.get(4).unwrap();
        assert!(dora.online);
        assert_eq!(dora.status, Some(1));

        roster.upsert_status(4, "", "", 0);
        let dora = roster.get(4).unwrap();
        assert!(!dora.online);
        assert_eq!(dora.name, "dora");
        assert_eq!(dora.img, "d.png");
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn later_frames_fill_in_missing_names() {
        let mut roster = Roster::default();
        roster.join(9, "", "");
        assert_eq!(roster.get(9).unwrap().name, "");

        roster.upsert_status(9, "nina", "n.png", 1);
        let nina = roster.get(9).unwrap();
        assert_eq!(nina.name, "nina");
        assert_eq!(nina.img, "n.png");
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn join_and_leave() {
        let mut roster = Roster::default();
        roster.join(1, "ann", "");
        assert!(roster.get(1).unwrap().online);
        roster.leave(1);
        assert!(!roster.get(1).unwrap().online);

        roster.leave(10);
        let unknown = roster.get(10).unwrap();
        assert!(!unknown.online);
        assert_eq!(roster.len(), 2);
    }
}

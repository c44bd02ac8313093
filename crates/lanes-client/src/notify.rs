//! Desktop notifications for incoming posts.
//!
//! Whether a post notifies is decided by the viewer's [`Volume`]; how the
//! notification is shown is up to a [`Notifier`] implementation.

use std::fmt;
use std::str::FromStr;

/// Title of every notification.
pub const NOTIFICATION_TITLE: &str = "Lanes";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Volume {
    /// Never notify
    Quiet = 0,
    /// Notify on mentions and direct replies
    #[default]
    Normal = 1,
    /// Notify on every post from someone else
    Loud = 2,
}

impl Volume {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Volume {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0 => Ok(Self::Quiet),
            1 => Ok(Self::Normal),
            2 => Ok(Self::Loud),
            other => Err(other),
        }
    }
}

impl FromStr for Volume {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "quiet" => Ok(Self::Quiet),
            "1" | "normal" => Ok(Self::Normal),
            "2" | "loud" => Ok(Self::Loud),
            other => Err(format!("unknown volume '{}'", other)),
        }
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Loud => "loud",
        })
    }
}

/// Whether a post should notify. `addressed` means the post mentions the
/// viewer or replies to one of their posts.
pub fn should_notify(volume: Volume, own: bool, addressed: bool) -> bool {
    if own {
        return false;
    }
    volume == Volume::Loud || (addressed && volume > Volume::Quiet)
}

/// Replace `&#N;` references (one to three digits) with the character.
pub fn unescape_numeric_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("&#") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        let digits = tail.bytes().take_while(|b| b.is_ascii_digit()).count();
        let decoded = if (1..=3).contains(&digits) && tail[digits..].starts_with(';') {
            tail[..digits].parse::<u32>().ok().and_then(char::from_u32)
        } else {
            None
        };

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[digits + 1..];
            }
            None => {
                out.push_str("&#");
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Request a larger avatar for the notification icon.
pub fn upgrade_avatar(img: &str) -> String {
    img.replacen("s=32", "s=128", 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// Not asked yet
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
}

impl Notification {
    pub fn new(text: &str, image: &str) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: unescape_numeric_entities(text),
            icon: upgrade_avatar(image),
        }
    }
}

/// Sink for notifications. Implementations may show them on the desktop,
/// write them to tracing, or drop them.
pub trait Notifier: Send + Sync {
    fn permission(&self) -> Permission;

    /// Ask for permission; returns the resulting state.
    fn request_permission(&self) -> Permission;

    fn show(&self, notification: Notification);
}

/// Show a notification, asking for permission first when nobody has yet.
pub fn notify(notifier: &dyn Notifier, text: &str, image: &str) {
    let allowed = match notifier.permission() {
        Permission::Granted => true,
        Permission::Denied => false,
        Permission::Default => notifier.request_permission() == Permission::Granted,
    };
    if allowed {
        notifier.show(Notification::new(text, image));
    }
}

/// Notifier that writes to `tracing`.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn show(&self, notification: Notification) {
        tracing::info!(
            title = %notification.title,
            icon = %notification.icon,
            "{}",
            notification.body,
        );
    }
}

/// Notifier that discards everything.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn permission(&self) -> Permission {
        Permission::Denied
    }

    fn request_permission(&self) -> Permission {
        Permission::Denied
    }

    fn show(&self, _notification: Notification) {}
}

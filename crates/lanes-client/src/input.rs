//! Keystrokes as seen by the composer and the add-member field.

use crate::intent::Intent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter { shift: bool },
    Tab { shift: bool },
    Up,
    Down,
    Escape,
    Backspace,
    Char(char),
    /// Anything else (arrows left/right, modifiers, ...)
    Other,
}

/// What became of a keystroke.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Not handled here; the host applies its default behaviour.
    Ignored,
    /// Handled; the host must not apply its default behaviour.
    Consumed,
    /// Handled, and a request has to go out.
    Send(Intent),
}

impl KeyOutcome {
    pub fn intent(self) -> Option<Intent> {
        match self {
            Self::Send(intent) => Some(intent),
            _ => None,
        }
    }
}

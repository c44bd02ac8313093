//! Transient error banners: fade in, stay for a while, fade out, go away.

use std::time::{Duration, Instant};

/// Length of each fade.
pub const FADE: Duration = Duration::from_millis(600);

/// Time from appearing until the fade-out starts.
pub const DISPLAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FadingIn,
    Visible,
    FadingOut,
    Gone,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    shown_at: Instant,
}

impl Banner {
    pub fn phase(&self, now: Instant) -> Phase {
        let age = now.saturating_duration_since(self.shown_at);
        if age < FADE {
            Phase::FadingIn
        } else if age < DISPLAY {
            Phase::Visible
        } else if age < DISPLAY + FADE {
            Phase::FadingOut
        } else {
            Phase::Gone
        }
    }
}

#[derive(Debug, Default)]
pub struct Banners {
    items: Vec<Banner>,
}

impl Banners {
    pub fn push(&mut self, message: impl Into<String>, now: Instant) {
        self.items.push(Banner { message: message.into(), shown_at: now });
    }

    /// Drop banners that have finished fading out.
    pub fn tick(&mut self, now: Instant) {
        self.items.retain(|b| b.phase(now) != Phase::Gone);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Banner> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle() {
        let t0 = Instant::now();
        let mut banners = Banners::default();
        banners.push("Rate limited", t0);
        let b = banners.iter().next().unwrap().clone();

        assert_eq!(b.phase(t0), Phase::FadingIn);
        assert_eq!(b.phase(t0 + Duration::from_millis(700)), Phase::Visible);
        assert_eq!(b.phase(t0 + Duration::from_millis(2100)), Phase::FadingOut);
        assert_eq!(b.phase(t0 + Duration::from_millis(2600)), Phase::Gone);

        banners.tick(t0 + Duration::from_millis(1000));
        assert_eq!(banners.len(), 1);
        banners.tick(t0 + Duration::from_secs(3));
        assert!(banners.is_empty());
    }
}

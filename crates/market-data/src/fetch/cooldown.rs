//! Per-source cooldown after rate limiting.
//!
//! Once triggered, the source issues no requests until the window elapses.
//! The state is in-memory and resets on restart.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{info, warn};

/// Timed suspension of one upstream source.
#[derive(Debug)]
pub struct Cooldown {
    source_id: &'static str,
    duration: Duration,
    active_until: Mutex<Option<Instant>>,
}

impl Cooldown {
    pub fn new(source_id: &'static str, duration: Duration) -> Self {
        Self {
            source_id,
            duration,
            active_until: Mutex::new(None),
        }
    }

    /// Lock the state mutex, recovering from poison if necessary.
    fn lock_state(&self) -> MutexGuard<'_, Option<Instant>> {
        self.active_until.lock().unwrap_or_else(|poisoned| {
            warn!("Cooldown mutex for {} was poisoned, recovering", self.source_id);
            poisoned.into_inner()
        })
    }

    /// True while the cooldown window is open.
    pub fn is_active(&self) -> bool {
        self.remaining().is_some()
    }

    /// Time left in the window, if any. An elapsed window is cleared.
    pub fn remaining(&self) -> Option<Duration> {
        let mut state = self.lock_state();
        match *state {
            Some(until) => {
                let now = Instant::now();
                if now < until {
                    Some(until - now)
                } else {
                    *state = None;
                    info!("{} cooldown elapsed", self.source_id);
                    None
                }
            }
            None => None,
        }
    }

    /// Opens (or extends) the window from now.
    pub fn trigger(&self) {
        let mut state = self.lock_state();
        *state = Some(Instant::now() + self.duration);
        warn!(
            "{} is throttling, cooling down for {}s",
            self.source_id,
            self.duration.as_secs()
        );
    }

    /// Closes the window early, e.g. after a successful response.
    pub fn clear(&self) {
        *self.lock_state() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_by_default() {
        let cooldown = Cooldown::new("FOREXFACTORY", Duration::from_secs(900));
        assert!(!cooldown.is_active());
        assert!(cooldown.remaining().is_none());
    }

    #[test]
    fn test_trigger_opens_window() {
        let cooldown = Cooldown::new("FOREXFACTORY", Duration::from_secs(900));
        cooldown.trigger();
        assert!(cooldown.is_active());
        let remaining = cooldown.remaining().unwrap();
        assert!(remaining <= Duration::from_secs(900));
        assert!(remaining > Duration::from_secs(890));
    }

    #[test]
    fn test_window_elapses() {
        let cooldown = Cooldown::new("TEST", Duration::from_millis(20));
        cooldown.trigger();
        std::thread::sleep(Duration::from_millis(40));
        assert!(!cooldown.is_active());
    }

    #[test]
    fn test_clear() {
        let cooldown = Cooldown::new("TEST", Duration::from_secs(60));
        cooldown.trigger();
        cooldown.clear();
        assert!(!cooldown.is_active());
    }
}

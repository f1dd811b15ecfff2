use std::time::{Duration, Instant};

/// Collapses bursts of requests into a single firing.
///
/// `request` marks work as pending and restarts the idle window; `poll`
/// fires once the window has elapsed since the most recent request. Time is
/// passed in by the caller so tests can drive a virtual clock.
#[derive(Debug)]
pub struct Debouncer {
    idle: Duration,
    queued_at: Option<Instant>,
}

impl Debouncer {
    pub fn new(idle: Duration) -> Self {
        Self {
            idle,
            queued_at: None,
        }
    }

    /// Queue a firing. Repeated requests restart the idle window.
    pub fn request(&mut self, now: Instant) {
        self.queued_at = Some(now);
    }

    pub fn pending(&self) -> bool {
        self.queued_at.is_some()
    }

    /// True exactly once per burst, after the idle window has elapsed since
    /// the last request.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.queued_at {
            Some(queued) if now.duration_since(queued) >= self.idle => {
                self.queued_at = None;
                true
            }
            _ => false,
        }
    }

    /// Fire immediately if anything is pending. Used at shutdown so a
    /// still-queued request is not lost.
    pub fn flush(&mut self) -> bool {
        self.queued_at.take().is_some()
    }
}

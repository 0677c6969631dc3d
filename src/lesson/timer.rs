use std::time::{Duration, Instant};

/// One-shot deadlines owned by a single lesson screen.
///
/// Dropping the set (or calling [`Timers::clear`]) cancels everything still
/// pending, so a timer can never fire into a screen that was left.
#[derive(Debug)]
pub struct Timers<K> {
    pending: Vec<(K, Instant)>,
}

impl<K: Copy + PartialEq> Timers<K> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, kind: K, after: Duration, now: Instant) {
        self.pending.push((kind, now + after));
    }

    /// Remove and return every timer whose deadline has passed, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(K, Instant)> = Vec::new();
        self.pending.retain(|&(kind, deadline)| {
            if deadline <= now {
                due.push((kind, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(_, deadline)| deadline);
        due.into_iter().map(|(kind, _)| kind).collect()
    }

    pub fn is_pending(&self, kind: K) -> bool {
        self.pending.iter().any(|&(k, _)| k == kind)
    }

    pub fn remaining(&self, kind: K, now: Instant) -> Option<Duration> {
        self.pending
            .iter()
            .filter(|&&(k, _)| k == kind)
            .map(|&(_, deadline)| deadline.saturating_duration_since(now))
            .min()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<K: Copy + PartialEq> Default for Timers<K> {
    fn default() -> Self {
        Self::new()
    }
}

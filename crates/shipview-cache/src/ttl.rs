//! TTL tracking for cached categories.

use std::time::{Duration, Instant};

/// Tracks when a value was last refreshed and whether it is due again.
#[derive(Debug, Clone)]
pub struct TtlTracker {
    /// Time of the last successful refresh (None before the first one or
    /// after invalidation).
    refreshed_at: Option<Instant>,

    /// Maximum age before a refresh is due. Zero means always due.
    ttl: Duration,
}

impl TtlTracker {
    /// Create a tracker with no refresh recorded.
    pub fn new(ttl: Duration) -> Self {
        Self {
            refreshed_at: None,
            ttl,
        }
    }

    /// Record a successful refresh at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.refreshed_at = Some(now);
    }

    /// Whether a refresh is due at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.refreshed_at {
            None => true,
            Some(_) if self.ttl.is_zero() => true,
            Some(at) => now.saturating_duration_since(at) >= self.ttl,
        }
    }

    /// Age of the current value at `now`.
    pub fn age(&self, now: Instant) -> Option<Duration> {
        self.refreshed_at.map(|at| now.saturating_duration_since(at))
    }

    /// Forget the last refresh; the next check is due.
    pub fn clear(&mut self) {
        self.refreshed_at = None;
    }

    pub fn refreshed_at(&self) -> Option<Instant> {
        self.refreshed_at
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Update the TTL. Applies from the next `is_due` check.
    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_before_first_touch() {
        let tracker = TtlTracker::new(Duration::from_secs(60));
        assert!(tracker.is_due(Instant::now()));
        assert_eq!(tracker.age(Instant::now()), None);
    }

    #[test]
    fn test_zero_ttl_is_always_due() {
        let mut tracker = TtlTracker::new(Duration::ZERO);
        let now = Instant::now();
        tracker.touch(now);
        assert!(tracker.is_due(now));
    }

    #[test]
    fn test_expires_at_ttl_boundary() {
        let mut tracker = TtlTracker::new(Duration::from_millis(100));
        let start = Instant::now();
        tracker.touch(start);

        assert!(!tracker.is_due(start + Duration::from_millis(99)));
        assert!(tracker.is_due(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_set_ttl_applies_to_existing_refresh() {
        let mut tracker = TtlTracker::new(Duration::from_secs(10));
        let start = Instant::now();
        tracker.touch(start);
        assert!(!tracker.is_due(start + Duration::from_secs(2)));

        tracker.set_ttl(Duration::from_secs(1));
        assert!(tracker.is_due(start + Duration::from_secs(2)));
        assert_eq!(tracker.refreshed_at(), Some(start));
    }

    #[test]
    fn test_clear() {
        let mut tracker = TtlTracker::new(Duration::from_secs(10));
        let now = Instant::now();
        tracker.touch(now);
        tracker.clear();
        assert!(tracker.is_due(now));
    }
}

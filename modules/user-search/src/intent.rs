//! Monotonic intent tickets.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out increasing tickets; only the newest one is current.
///
/// Every user action that changes what should be on screen advances the
/// clock. A response carrying an older ticket is stale.
#[derive(Debug, Default)]
pub struct IntentClock {
    latest: AtomicU64,
}

impl IntentClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding every earlier one.
    pub fn advance(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::Acquire) == ticket
    }

    #[must_use]
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn tickets_increase_and_supersede() {
        let clock = IntentClock::new();
        assert_eq!(clock.latest(), 0);

        let first = clock.advance();
        assert!(clock.is_current(first));

        let second = clock.advance();
        assert!(second > first);
        assert!(!clock.is_current(first));
        assert!(clock.is_current(second));
    }
}

//! Self-observability counters for the reporting pipeline.
//!
//! The reporting pipeline keeps a handful of counters about its own work
//! (records translated per kind, translation errors). They live in an
//! explicit [`SdkMetricsRegistry`] owned by the enclosing reporter, created
//! when the reporter starts and dropped when it stops. Nothing here is
//! process-global.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// A monotonically increasing counter registered in a [`SdkMetricsRegistry`].
///
/// Counters are cheap cloneable handles onto shared state; all clones
/// obtained for the same name observe the same count. Increments are atomic,
/// so counters remain correct if flush cycles ever overlap.
#[derive(Clone, Debug, Default)]
pub struct SdkCounter {
    value: Arc<AtomicU64>,
}

impl SdkCounter {
    /// Increments the counter by one.
    pub fn inc(&self) {
        self.inc_by(1);
    }

    /// Increments the counter by the given amount.
    pub fn inc_by(&self, amount: u64) {
        self.value.fetch_add(amount, Ordering::Relaxed);
    }

    /// Returns the current count.
    pub fn count(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// A registry of named self-observability counters.
///
/// The enclosing reporter owns the registry and decides whether and how to
/// forward its contents (typically as ordinary points under a reserved
/// prefix, on the reporter's own flush schedule).
#[derive(Debug, Default)]
pub struct SdkMetricsRegistry {
    counters: RwLock<BTreeMap<String, SdkCounter>>,
}

impl SdkMetricsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counter registered under `name`, creating it at zero on
    /// first use.
    pub fn counter(&self, name: &str) -> SdkCounter {
        if let Some(counter) = self.counters.read().get(name) {
            return counter.clone();
        }

        self.counters
            .write()
            .entry(name.to_owned())
            .or_default()
            .clone()
    }

    /// Returns the current value of every registered counter.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counters
            .read()
            .iter()
            .map(|(name, counter)| (name.clone(), counter.count()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn test_counter_handles_share_state() {
        let registry = SdkMetricsRegistry::new();
        let first = registry.counter("gauges.reported");
        let second = registry.counter("gauges.reported");

        first.inc();
        second.inc_by(2);

        assert_eq!(first.count(), 3);
        assert_eq!(second.count(), 3);
    }

    #[test]
    fn test_snapshot() {
        let registry = SdkMetricsRegistry::new();
        registry.counter("writer.errors");
        registry.counter("counters.reported").inc_by(5);

        assert_eq!(
            registry.snapshot(),
            BTreeMap::from([
                ("counters.reported".to_owned(), 5),
                ("writer.errors".to_owned(), 0),
            ])
        );
    }
}

//! Ambient push/pop counters, independent of any particular queue instance.
//!
//! Not part of the queue's correctness surface — purely observability, a
//! plain atomic-counters struct kept alongside the hot path rather than
//! threading results through return values.

use std::sync::atomic::{ AtomicU64, Ordering };

#[derive(Default)]
pub struct Metrics {
    pushed: AtomicU64,
    popped: AtomicU64,
    pop_misses: AtomicU64,
    growths: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_push(&self) {
        self.pushed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_pop(&self) {
        self.popped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_pop_miss(&self) {
        self.pop_misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_ring_growth(&self) {
        self.growths.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pushed: self.pushed.load(Ordering::Relaxed),
            popped: self.popped.load(Ordering::Relaxed),
            pop_misses: self.pop_misses.load(Ordering::Relaxed),
            growths: self.growths.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub pushed: u64,
    pub popped: u64,
    pub pop_misses: u64,
    pub growths: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let m = Metrics::new();
        m.record_push();
        m.record_push();
        m.record_pop();
        m.record_pop_miss();
        m.record_ring_growth();

        let snap = m.snapshot();
        assert_eq!(snap.pushed, 2);
        assert_eq!(snap.popped, 1);
        assert_eq!(snap.pop_misses, 1);
        assert_eq!(snap.growths, 1);
    }
}

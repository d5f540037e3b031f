//! Adaptive spin-then-yield backoff for contended waits.
//!
//! Ported from the `atomic_backoff` used throughout the original lock-free
//! queue: pause a doubling number of times, then fall back to a scheduler
//! yield once pausing that long is no cheaper than a context switch.

const LOOPS_BEFORE_YIELD: u32 = 16;

pub struct Backoff {
    count: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

impl Backoff {
    #[inline]
    pub fn new() -> Self {
        Self { count: 1 }
    }

    #[inline]
    fn pause_n(times: u32) {
        for _ in 0..times {
            std::hint::spin_loop();
        }
    }

    /// Pause for a while, doubling the spin count each call until it crosses
    /// [`LOOPS_BEFORE_YIELD`], after which this yields the thread instead.
    #[inline]
    pub fn spin(&mut self) {
        if self.count <= LOOPS_BEFORE_YIELD {
            Self::pause_n(self.count);
            self.count *= 2;
        } else {
            std::thread::yield_now();
        }
    }

    /// Same spin schedule as [`Backoff::spin`], but returns `false` once the
    /// threshold is crossed instead of yielding, so the caller can take a
    /// slower path (e.g. draining a different ring) rather than spin forever.
    #[inline]
    pub fn spin_bounded(&mut self) -> bool {
        Self::pause_n(self.count);
        if self.count < LOOPS_BEFORE_YIELD {
            self.count *= 2;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.count = 1;
    }
}

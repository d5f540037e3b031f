//! The striped MPMC queue: `N` independent micro-queues fronted by shared
//! sequence counters.
//!
//! `push` issues a global sequence number and routes by `seq mod N` into the
//! owning micro-queue; the two supplied `pop` variants differ only in how
//! they reserve a committed read sequence, never in how they touch payload
//! storage.

use std::sync::atomic::{ AtomicU32, Ordering };

use crate::config::QueueConfig;
use crate::micro_queue::MicroQueue;

/// Unbounded, lock-free, multi-producer/multi-consumer FIFO queue.
///
/// `T` must be `Copy` (the queue moves values by bitwise copy into and out
/// of ring slots, never running a destructor on drain) and `Default` (ring
/// cells need an initial value before anything has been pushed into them).
pub struct StripedQueue<T> {
    micro_queues: Box<[MicroQueue<T>]>,
    stripe_count: u32,
    pre_write: AtomicU32,
    pre_read: AtomicU32,
    read: AtomicU32,
}

impl<T: Default> StripedQueue<T> {
    pub fn new(config: QueueConfig) -> Self {
        let stripe_count = config.stripe_count();
        let micro_queues = (0..stripe_count)
            .map(|i| MicroQueue::new(i, stripe_count, config.initial_ring_size(), config.max_ring_chain_length as usize))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            micro_queues,
            stripe_count,
            pre_write: AtomicU32::new(config.start_index),
            pre_read: AtomicU32::new(config.start_index),
            read: AtomicU32::new(config.start_index),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(QueueConfig::default())
    }
}

impl<T> StripedQueue<T> {
    #[inline]
    fn stripe_of(&self, s: u32) -> usize {
        (s % self.stripe_count) as usize
    }

    /// Always succeeds; the unbounded queue never rejects a push.
    pub fn push(&self, value: T)
    where
        T: Copy,
    {
        let s = self.pre_write.fetch_add(1, Ordering::AcqRel);
        self.micro_queues[self.stripe_of(s)].push(value, s);
        crate::insights::record_push(s);
    }

    /// Fast-pop variant: reserves a tentative read slot via
    /// `pre_read`, and only commits (via `read`) once `pre_write` proves a
    /// producer has already claimed that sequence. This is the default pop
    /// — no CAS loop on the hot path, only on the rare reservation-undo.
    pub fn pop(&self, out: &mut T) -> bool
    where
        T: Copy,
    {
        let reserved = self.pre_read.fetch_add(1, Ordering::AcqRel);
        let pre_write = self.pre_write.load(Ordering::Acquire);

        if (pre_write.wrapping_sub(reserved) as i32) > 0 {
            let s = self.read.fetch_add(1, Ordering::AcqRel);
            let found = self.micro_queues[self.stripe_of(s)].pop(out, s);
            crate::insights::record_pop(s);
            found
        } else {
            self.pre_read.fetch_sub(1, Ordering::AcqRel);
            false
        }
    }

    /// CAS-based pop variant: a standard
    /// load-compare-then-CAS loop on `read`, offered alongside the
    /// fast-pop default as a documented open-question resolution (see
    /// DESIGN.md) rather than a rival preprocessor branch.
    pub fn pop_cas(&self, out: &mut T) -> bool
    where
        T: Copy,
    {
        loop {
            let read = self.read.load(Ordering::Acquire);
            let pre_write = self.pre_write.load(Ordering::Acquire);
            if read == pre_write {
                return false;
            }
            if self
                .read
                .compare_exchange(read, read.wrapping_add(1), Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return self.micro_queues[self.stripe_of(read)].pop(out, read);
            }
        }
    }

    /// Approximate, unsigned, monotone-per-stripe size: a raw difference of
    /// two independently-loaded counters that may transiently overshoot
    /// actual occupancy.
    pub fn len(&self) -> u32 {
        self.pre_write.load(Ordering::Acquire).wrapping_sub(self.read.load(Ordering::Acquire))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stripe_count(&self) -> u32 {
        self.stripe_count
    }

    /// Total rings ever allocated across every stripe's chain, including
    /// each stripe's initial ring. Exposed for tests/diagnostics exercising
    /// ring-growth behaviour; not part of the queue's correctness surface.
    pub fn ring_allocation_count(&self) -> usize {
        self.micro_queues.iter().map(|mq| mq.rings_allocated()).sum()
    }

    /// Total rings whose cell storage has been reclaimed (released back to
    /// the allocator) across every stripe. Always strictly less than
    /// [`StripedQueue::ring_allocation_count`] for any stripe that still has
    /// a live write cursor, since the currently active ring is never
    /// reclaimed while elements may still land in it.
    pub fn ring_reclamation_count(&self) -> usize {
        self.micro_queues.iter().map(|mq| mq.rings_reclaimed()).sum()
    }
}

unsafe impl<T: Send> Send for StripedQueue<T> {}
unsafe impl<T: Send> Sync for StripedQueue<T> {}

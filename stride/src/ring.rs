//! A single ring ("Circle"): a power-of-two array of [`Cell`]s serving a
//! contiguous, periodically-reused range of sequence numbers within one
//! stripe.
//!
//! The array is logically split into two halves. A half becomes eligible for
//! reuse once every cell in it has been both written and read — `begin_index`
//! tracks the oldest half still outstanding. Reclamation is attempted lazily,
//! exactly when a producer's sequence number first reaches the far edge of
//! the current window (`dis == capacity`); most of the time the half is
//! already fully drained and the window simply slides forward. When it
//! isn't, the ring is abandoned in favour of a freshly grown one
//! ([`crate::micro_queue::MicroQueue`] owns that handoff).

use std::cell::UnsafeCell;
use std::sync::atomic::{ AtomicBool, AtomicU32, Ordering };

use crate::backoff::Backoff;
use crate::cell::{ Cell, Tag };

/// Outcome of a single push/pop attempt against one ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingOutcome {
    /// The value was placed (push) or taken (pop).
    Done,
    /// This ring is exhausted; the caller must move to (or create) the next
    /// ring in the chain.
    Exhausted,
    /// `s` is not in this ring's range; the caller must chase the next ring.
    Chase,
    /// The ring is empty from this cell's point of view and no writer has
    /// stalled; the caller should retry against the same ring (pop only).
    RetryEmpty,
}

pub struct Ring<T> {
    /// `None` once [`Ring::release_cells`] has run. Freed independently of
    /// the ring header so the header can keep living in the micro-queue's
    /// ring table (retired only when the whole chain is dropped) while the
    /// — much larger — cell array is reclaimed as soon as the consumer
    /// advancing past this ring confirms nothing touches it anymore.
    cells: UnsafeCell<Option<Box<[Cell<T>]>>>,
    /// Immutable logical sequence number of slot 0 in this ring.
    base_index: u32,
    /// Sequence number of the first still-unreclaimed half.
    begin_index: AtomicU32,
    /// Number of stripes (the distance, in sequence-number units, between
    /// this ring's successive slots).
    stride: u32,
    /// `cells.len()` as a u32, cached.
    len: u32,
    half_len: u32,
    capacity: u32,
    half_capacity: u32,
    /// Set by a producer that gave up reclaiming and decided to grow,
    /// signalling the consumer side to perform a full-ring drain wait
    /// instead of retrying indefinitely.
    stalled_writer: AtomicBool,
}

impl<T: Default> Ring<T> {
    /// `len` is the number of cells (power of two, `>= 2`). `base_index` is
    /// this ring's fixed logical offset. `stride` is the owning striped
    /// queue's stripe count (N).
    pub fn new(len: u32, base_index: u32, stride: u32) -> Self {
        debug_assert!(len.is_power_of_two() && len >= 2);
        debug_assert!(stride.is_power_of_two() && stride >= 1);

        let mut cells = Vec::with_capacity(len as usize);
        cells.resize_with(len as usize, Cell::default);

        let half_len = len / 2;
        Self {
            cells: UnsafeCell::new(Some(cells.into_boxed_slice())),
            base_index,
            begin_index: AtomicU32::new(base_index),
            stride,
            len,
            half_len,
            capacity: len * stride,
            half_capacity: half_len * stride,
            stalled_writer: AtomicBool::new(false),
        }
    }
}

impl<T> Ring<T> {
    pub fn base_index(&self) -> u32 {
        self.base_index
    }

    pub fn total_capacity_in_sequence_units(&self) -> u32 {
        self.capacity
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    /// Borrow the cell array. Panics if [`Ring::release_cells`] has already
    /// run — by that point the owning micro-queue guarantees no producer or
    /// consumer calls back into this ring.
    #[inline]
    fn cells(&self) -> &[Cell<T>] {
        // SAFETY: `release_cells` is only ever called by the single consumer
        // that has just confirmed (via the write/read cursor handshake in
        // `micro_queue.rs`) that this ring is fully drained and retired; no
        // other producer or consumer reference to this ring's cells can
        // still be live at that point, so this shared borrow never aliases
        // a mutation.
        unsafe { (*self.cells.get()).as_deref().expect("ring cells accessed after release") }
    }

    /// Free this ring's backing cell storage, keeping the header (and its
    /// `base_index`/`begin_index` bookkeeping) alive. Called by the consumer
    /// that advances past this ring once the owning micro-queue has
    /// confirmed a successor ring was published, mirroring
    /// `original_source/cclockfreequeue.h`'s `Circle::ReleasePool` (frees
    /// `m_pPool`, leaves the header in `m_pCircle` for destruction time).
    ///
    /// # Safety
    /// Caller must guarantee no producer or consumer will touch this ring's
    /// cells again — i.e. this ring has been fully drained and a successor
    /// ring is already published and reachable.
    pub unsafe fn release_cells(&self) {
        unsafe {
            (*self.cells.get()).take();
        }
    }

    /// True once a producer has stalled on reclamation and is growing the
    /// chain; the consumer reads this to decide whether it must drain-wait
    /// rather than retry.
    pub fn stalled_writer(&self) -> bool {
        self.stalled_writer.load(Ordering::Acquire)
    }

    /// Which half-step (an ever-increasing count, not reduced mod anything
    /// but the caller's own generation math) sequence `s` falls into,
    /// relative to this ring's fixed base.
    #[inline]
    fn half_index(&self, s: u32) -> u32 {
        (s.wrapping_sub(self.base_index) / self.stride) / self.half_len
    }

    #[inline]
    fn slot_index(&self, s: u32) -> usize {
        ((s.wrapping_sub(self.base_index) / self.stride) % self.len) as usize
    }

    /// Generation tag for half-step `h`: cycles 1 -> 2 -> 3 -> 4 -> 1.
    #[inline]
    fn generation_of_half(h: u32) -> u8 {
        (h % 4) as u8 + 1
    }

    /// The tag a cell must show before it can be overwritten with
    /// generation `g`: since a physical slot is revisited every two
    /// half-steps, that's the read-tag of `g`'s predecessor-by-two, or
    /// pristine if the slot has never been visited before.
    #[inline]
    fn expected_prior_tag(h: u32) -> u8 {
        if h < 2 {
            Tag::PRISTINE
        } else {
            Tag::read(Self::generation_of_half(h - 2))
        }
    }

    #[inline]
    fn physical_half_slice_for(&self, h: u32) -> std::ops::Range<usize> {
        if h % 2 == 0 {
            0..(self.half_len as usize)
        } else {
            (self.half_len as usize)..(self.len as usize)
        }
    }

    /// Attempt to reclaim the oldest half so the write window can slide
    /// forward. Returns `true` if it did (and advanced `begin_index`),
    /// `false` if a reader is still behind, in which case `stalled_writer`
    /// is set and this busy-waits until the *whole* ring has been written
    /// at least once before returning control to the caller.
    fn try_reclaim_or_stall(&self, begin_index: u32) -> bool {
        let retiring_half = self.half_index(begin_index);
        let expected = Tag::read(Self::generation_of_half(retiring_half));
        let slice = self.physical_half_slice_for(retiring_half);

        let all_reclaimed = self.cells()[slice.clone()]
            .iter()
            .all(|cell| cell.load_tag(Ordering::Acquire) == expected);

        if all_reclaimed {
            self.begin_index.store(begin_index.wrapping_add(self.half_capacity), Ordering::Release);
            return true;
        }

        self.stalled_writer.store(true, Ordering::Release);
        let mut backoff = Backoff::new();
        for cell in self.cells().iter() {
            while cell.load_tag(Ordering::Relaxed) == Tag::PRISTINE {
                backoff.spin();
            }
        }
        false
    }

    pub fn push_position(&self, value: T, s: u32) -> RingOutcome {
        let begin_index = self.begin_index.load(Ordering::Acquire);
        let dis = s.wrapping_sub(begin_index);

        if dis > self.capacity {
            return RingOutcome::Chase;
        }
        if dis == self.capacity {
            if !self.try_reclaim_or_stall(begin_index) {
                return RingOutcome::Exhausted;
            }
        }

        let h = self.half_index(s);
        let expected_prior = Self::expected_prior_tag(h);
        let cell = &self.cells()[self.slot_index(s)];

        let mut backoff = Backoff::new();
        while cell.load_tag(Ordering::Acquire) != expected_prior {
            backoff.spin();
        }

        // SAFETY: the tag wait above established exclusive producer access
        // to this slot for this generation.
        unsafe {
            cell.write(value);
        }
        cell.store_tag(Tag::written(Self::generation_of_half(h)), Ordering::Release);
        RingOutcome::Done
    }

    pub fn pop_position(&self, out: &mut T, s: u32) -> RingOutcome
    where
        T: Copy,
    {
        let begin_index = self.begin_index.load(Ordering::Acquire);
        let dis = s.wrapping_sub(begin_index);

        if dis > self.capacity {
            return RingOutcome::Chase;
        }
        if dis == self.capacity {
            if self.stalled_writer() {
                let mut backoff = Backoff::new();
                for h in 0..2 {
                    let half_step = self.half_index(begin_index).wrapping_add(h);
                    let expected = Tag::read(Self::generation_of_half(half_step));
                    let slice = self.physical_half_slice_for(half_step);
                    for cell in &self.cells()[slice] {
                        while cell.load_tag(Ordering::Acquire) != expected {
                            backoff.spin();
                        }
                    }
                }
                return RingOutcome::Exhausted;
            }
            return RingOutcome::RetryEmpty;
        }

        let h = self.half_index(s);
        let expected = Tag::written(Self::generation_of_half(h));
        let cell = &self.cells()[self.slot_index(s)];

        let mut backoff = Backoff::new();
        while cell.load_tag(Ordering::Acquire) != expected {
            backoff.spin();
        }

        // SAFETY: the tag wait above confirmed the producer's write is
        // visible and exclusively ours to consume.
        *out = unsafe { cell.read() };
        cell.store_tag(Tag::read(Self::generation_of_half(h)), Ordering::Release);
        RingOutcome::Done
    }
}

unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

//! Fixed-capacity single-ring MPMC queue — an independent
//! variant of the striped queue that shares its reservation/publish
//! discipline but trades unbounded growth for a flat array and a simpler
//! pair of space/readable counters.

use std::cell::UnsafeCell;
use std::sync::atomic::{ AtomicBool, AtomicI64, AtomicU32, Ordering };

use crate::backoff::Backoff;
use crate::error::{ Result, StrideError };

struct BoundedCell<T> {
    value: UnsafeCell<T>,
    written: AtomicBool,
}

impl<T: Default> Default for BoundedCell<T> {
    fn default() -> Self {
        Self {
            value: UnsafeCell::new(T::default()),
            written: AtomicBool::new(false),
        }
    }
}

unsafe impl<T: Send> Sync for BoundedCell<T> {}

/// A power-of-two-capacity MPMC ring. Push decrements `space_remaining`
/// before claiming a slot and undoes the decrement on failure; pop is the
/// mirror image over `readable_count`. The per-slot `written` flag is the
/// actual synchronisation point — the counters only serialise which slot a
/// given producer/consumer is entitled to.
pub struct BoundedQueue<T> {
    cells: Box<[BoundedCell<T>]>,
    mask: u32,
    space_remaining: AtomicI64,
    readable_count: AtomicI64,
    pre_write: AtomicU32,
    read: AtomicU32,
}

impl<T: Default> BoundedQueue<T> {
    pub fn new(capacity: u32) -> Result<Self> {
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(StrideError::config("bounded queue capacity must be a non-zero power of 2"));
        }

        let mut cells = Vec::with_capacity(capacity as usize);
        cells.resize_with(capacity as usize, BoundedCell::default);

        Ok(Self {
            cells: cells.into_boxed_slice(),
            mask: capacity - 1,
            space_remaining: AtomicI64::new(capacity as i64),
            readable_count: AtomicI64::new(0),
            pre_write: AtomicU32::new(0),
            read: AtomicU32::new(0),
        })
    }
}

impl<T> BoundedQueue<T> {
    pub fn capacity(&self) -> u32 {
        self.mask + 1
    }

    /// Approximate occupancy; never negative, never exceeds `2 * capacity - 1`.
    pub fn len(&self) -> u32 {
        self.readable_count.load(Ordering::Acquire).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `false` without blocking when the queue is saturated.
    pub fn push(&self, value: T) -> bool
    where
        T: Copy,
    {
        if self.space_remaining.fetch_sub(1, Ordering::AcqRel) - 1 < 0 {
            self.space_remaining.fetch_add(1, Ordering::AcqRel);
            return false;
        }

        let slot = self.pre_write.fetch_add(1, Ordering::AcqRel) & self.mask;
        let cell = &self.cells[slot as usize];

        let mut backoff = Backoff::new();
        while cell.written.load(Ordering::Acquire) {
            backoff.spin();
        }

        unsafe {
            std::ptr::write(cell.value.get(), value);
        }
        cell.written.store(true, Ordering::Release);
        self.readable_count.fetch_add(1, Ordering::AcqRel);
        true
    }

    /// Returns `false` without blocking when the queue is empty.
    pub fn pop(&self, out: &mut T) -> bool
    where
        T: Copy,
    {
        if self.readable_count.fetch_sub(1, Ordering::AcqRel) - 1 < 0 {
            self.readable_count.fetch_add(1, Ordering::AcqRel);
            return false;
        }

        let slot = self.read.fetch_add(1, Ordering::AcqRel) & self.mask;
        let cell = &self.cells[slot as usize];

        let mut backoff = Backoff::new();
        while !cell.written.load(Ordering::Acquire) {
            backoff.spin();
        }

        *out = unsafe { std::ptr::read(cell.value.get()) };
        cell.written.store(false, Ordering::Release);
        self.space_remaining.fetch_add(1, Ordering::AcqRel);
        true
    }
}

unsafe impl<T: Send> Send for BoundedQueue<T> {}
unsafe impl<T: Send> Sync for BoundedQueue<T> {}

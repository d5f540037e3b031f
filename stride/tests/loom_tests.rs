//! Loom-based exploration of the cell generation-tag protocol: why a
//! boolean can't replace the 4-phase generation scheme.
//!
//! Run with: `RUSTFLAGS="--cfg loom" cargo test --test loom_tests --release`
//!
//! `Ring<T>` itself is built on `std::sync::atomic` types and can't be fed
//! through loom directly; this exercises a single-cell model of the same
//! write-wait/release, read-wait/release handshake in isolation, the way
//! the closest reference crate in this space narrows its own loom coverage
//! to a simplified ring rather than the full production type.

#![cfg(loom)]

use loom::sync::atomic::{ AtomicU8, Ordering };
use loom::sync::Arc;
use loom::thread;

const PRISTINE: u8 = 0;

fn written(generation: u8) -> u8 {
    (generation << 4) | 0x01
}

fn read(generation: u8) -> u8 {
    generation << 4
}

/// One producer writes generation 1 into a cell, one consumer waits for it
/// and flips the tag to the read state. No value storage is modeled here —
/// only the tag state machine, which is what the generation scheme exists
/// to get right.
#[test]
fn loom_single_cell_write_then_read_handshake() {
    loom::model(|| {
        let tag = Arc::new(AtomicU8::new(PRISTINE));

        let producer_tag = tag.clone();
        let producer = thread::spawn(move || {
            producer_tag.store(written(1), Ordering::Release);
        });

        let consumer_tag = tag.clone();
        let consumer = thread::spawn(move || {
            loop {
                if consumer_tag.load(Ordering::Acquire) == written(1) {
                    consumer_tag.store(read(1), Ordering::Release);
                    break;
                }
                loom::thread::yield_now();
            }
        });

        producer.join().unwrap();
        consumer.join().unwrap();

        assert_eq!(tag.load(Ordering::SeqCst), read(1));
    });
}

/// A second producer waiting to reuse the slot must never observe the tag
/// flip to `written(2)` before the first consumer has flipped it to
/// `read(1)` — i.e. generation 2's write-wait condition (`tag == read(1)`)
/// really does serialise against the first consumer's release.
#[test]
fn loom_generation_rotation_serialises_producer_behind_consumer() {
    loom::model(|| {
        let tag = Arc::new(AtomicU8::new(written(1)));

        let consumer_tag = tag.clone();
        let consumer = thread::spawn(move || {
            // Simulates pop_position: wait for written(1), release read(1).
            loop {
                if consumer_tag.load(Ordering::Acquire) == written(1) {
                    consumer_tag.store(read(1), Ordering::Release);
                    break;
                }
                loom::thread::yield_now();
            }
        });

        let producer_tag = tag.clone();
        let producer = thread::spawn(move || {
            // Simulates push_position for generation 2: wait for read(1).
            loop {
                if producer_tag.load(Ordering::Acquire) == read(1) {
                    producer_tag.store(written(2), Ordering::Release);
                    break;
                }
                loom::thread::yield_now();
            }
        });

        consumer.join().unwrap();
        producer.join().unwrap();

        assert_eq!(tag.load(Ordering::SeqCst), written(2));
    });
}

//! Property-based tests for the conservation and FIFO invariants,
//! run against randomized single-threaded interleavings of
//! push/pop (the multithreaded scenarios live in
//! `stride-test-support`'s integration tests, where the checker can
//! attribute each message back to its producer).

use proptest::prelude::*;

use stride::bounded::BoundedQueue;
use stride::config::QueueConfig;
use stride::queue::StripedQueue;

proptest! {
    /// Conservation: pushing `n` values then popping interleaved with more
    /// pushes never yields more pops than pushes, and every value popped
    /// from a single-stripe queue comes out in the order it went in.
    #[test]
    fn prop_conservation_and_order_single_stripe(
        ops in prop::collection::vec(prop::bool::ANY, 1..500),
    ) {
        let cfg = QueueConfig::new().with_stripe_count(1).unwrap();
        let queue: StripedQueue<u32> = StripedQueue::new(cfg);
        let mut next_push = 0u32;
        let mut next_expected_pop = 0u32;
        let mut popped = 0u32;

        for push_op in ops {
            if push_op {
                queue.push(next_push);
                next_push += 1;
            } else {
                let mut out = 0u32;
                if queue.pop(&mut out) {
                    prop_assert_eq!(out, next_expected_pop);
                    next_expected_pop += 1;
                    popped += 1;
                }
            }
        }

        prop_assert!(popped <= next_push);
        prop_assert_eq!(queue.len(), next_push - popped);
    }

    /// Wrap-safety: the same conservation property holds when the sequence
    /// counters start within a few hundred ticks of wrapping.
    #[test]
    fn prop_conservation_near_wraparound(
        push_count in 1usize..2000,
        start_offset in 0u32..300,
    ) {
        let cfg = QueueConfig::new().with_start_index(u32::MAX - start_offset);
        let queue: StripedQueue<u32> = StripedQueue::new(cfg);

        for i in 0..push_count as u32 {
            queue.push(i);
        }
        let mut out = 0u32;
        for i in 0..push_count as u32 {
            prop_assert!(queue.pop(&mut out));
            prop_assert_eq!(out, i);
        }
        prop_assert!(!queue.pop(&mut out));
    }
}

proptest! {
    /// Bounded-queue cap: size never exceeds `2 * capacity - 1` and push
    /// reliably fails once the queue is saturated.
    #[test]
    fn prop_bounded_queue_never_exceeds_cap(
        pushes in 1usize..200,
    ) {
        const CAPACITY: u32 = 16;
        let queue: BoundedQueue<u32> = BoundedQueue::new(CAPACITY).unwrap();
        let mut accepted = 0u32;

        for i in 0..pushes as u32 {
            if queue.push(i) {
                accepted += 1;
            }
            prop_assert!(queue.len() <= 2 * CAPACITY - 1);
        }

        let mut out = 0u32;
        let mut drained = 0u32;
        while queue.pop(&mut out) {
            drained += 1;
        }
        prop_assert_eq!(drained, accepted);
    }
}

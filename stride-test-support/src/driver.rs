//! Producer/consumer thread driver: spawns the threads, measures
//! throughput, and (in the heavy variant) flow-controls producers against a
//! shared status flag the way the original timed benchmark harness does
//! does.

use std::sync::atomic::{ AtomicU64, AtomicU8, Ordering };
use std::thread;
use std::time::{ Duration, Instant };

use stride::backoff::Backoff;
use stride::queue::StripedQueue;

use crate::checker::{ Checker, TaggedMessage };

#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    pub producers: usize,
    pub consumers: usize,
    pub messages_per_producer: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct ThroughputReport {
    pub push_messages_per_ms: f64,
    pub pop_messages_per_ms: f64,
    pub push_elapsed: Duration,
    pub pop_elapsed: Duration,
}

/// Each producer pushes exactly `messages_per_producer` tagged messages,
/// timed separately from the drain phase where consumers pop until every
/// message sent has been accounted for.
pub fn run_bounded(queue: &StripedQueue<TaggedMessage>, checker: &Checker, config: &DriverConfig) -> ThroughputReport {
    let push_start = Instant::now();
    thread::scope(|scope| {
        for p in 0..config.producers {
            scope.spawn(move || {
                for slot in 0..config.messages_per_producer {
                    let msg = TaggedMessage {
                        producer_id: p as u32,
                        slot_id: slot as u32,
                        payload: slot,
                    };
                    checker.record_send(msg);
                    queue.push(msg);
                }
            });
        }
    });
    let push_elapsed = push_start.elapsed();

    let total_expected = config.producers as u64 * config.messages_per_producer;
    let popped = AtomicU64::new(0);

    let pop_start = Instant::now();
    thread::scope(|scope| {
        for _ in 0..config.consumers {
            scope.spawn(|| {
                let mut out = TaggedMessage::default();
                let mut backoff = Backoff::new();
                loop {
                    if popped.load(Ordering::Relaxed) >= total_expected {
                        break;
                    }
                    if queue.pop(&mut out) {
                        checker.record_receive(out);
                        popped.fetch_add(1, Ordering::Relaxed);
                        backoff.reset();
                    } else {
                        backoff.spin();
                    }
                }
            });
        }
    });
    let pop_elapsed = pop_start.elapsed();

    ThroughputReport {
        push_messages_per_ms: rate_per_ms(total_expected, push_elapsed),
        pop_messages_per_ms: rate_per_ms(total_expected, pop_elapsed),
        push_elapsed,
        pop_elapsed,
    }
}

fn rate_per_ms(count: u64, elapsed: Duration) -> f64 {
    let ms = elapsed.as_secs_f64() * 1000.0;
    if ms <= 0.0 { 0.0 } else { count as f64 / ms }
}

/// Status a timed heavy run shares between its driver thread and its
/// producers. Producers sleep briefly while `Wait`, push freely while
/// `Ready`, and exit once `Finish` is observed.
pub struct SharedStatus(AtomicU8);

const READY: u8 = 0;
const WAIT: u8 = 1;
const FINISH: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ready,
    Wait,
    Finish,
}

impl Default for SharedStatus {
    fn default() -> Self {
        Self(AtomicU8::new(READY))
    }
}

impl SharedStatus {
    pub fn get(&self) -> RunStatus {
        match self.0.load(Ordering::Acquire) {
            READY => RunStatus::Ready,
            WAIT => RunStatus::Wait,
            _ => RunStatus::Finish,
        }
    }

    pub fn set_ready(&self) {
        self.0.store(READY, Ordering::Release);
    }

    pub fn set_wait(&self) {
        self.0.store(WAIT, Ordering::Release);
    }

    pub fn set_finish(&self) {
        self.0.store(FINISH, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HeavyConfig {
    pub producers: usize,
    pub consumers: usize,
    pub duration: Duration,
    /// Producers pause once the queue's approximate size crosses this
    /// (`10 * 2^20` by default).
    pub flow_control_threshold: u32,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct HeavySummary {
    pub elapsed: Duration,
    pub pushed: u64,
    pub popped: u64,
}

/// Producers push forever; when the driver observes the queue growing past
/// `flow_control_threshold` it toggles the shared status to `Wait`, and
/// producers sleep briefly until it drops back to `Ready`. All threads exit
/// once the driver sets `Finish`; consumers keep draining until empty.
pub fn run_heavy(queue: &StripedQueue<TaggedMessage>, config: &HeavyConfig) -> HeavySummary {
    let status = SharedStatus::default();
    let pushed = AtomicU64::new(0);
    let popped = AtomicU64::new(0);
    let start = Instant::now();

    thread::scope(|scope| {
        for p in 0..config.producers {
            let status = &status;
            let pushed = &pushed;
            scope.spawn(move || {
                let mut slot: u64 = 0;
                loop {
                    match status.get() {
                        RunStatus::Finish => break,
                        RunStatus::Wait => {
                            thread::sleep(Duration::from_millis(1));
                            continue;
                        }
                        RunStatus::Ready => {}
                    }
                    let msg = TaggedMessage {
                        producer_id: p as u32,
                        slot_id: (slot % u32::MAX as u64) as u32,
                        payload: slot,
                    };
                    queue.push(msg);
                    pushed.fetch_add(1, Ordering::Relaxed);
                    slot += 1;
                }
            });
        }

        for _ in 0..config.consumers {
            let status = &status;
            let popped = &popped;
            scope.spawn(move || {
                let mut out = TaggedMessage::default();
                let mut backoff = Backoff::new();
                loop {
                    if queue.pop(&mut out) {
                        popped.fetch_add(1, Ordering::Relaxed);
                        backoff.reset();
                    } else if status.get() == RunStatus::Finish {
                        break;
                    } else {
                        backoff.spin();
                    }
                }
            });
        }

        loop {
            if start.elapsed() >= config.duration {
                status.set_finish();
                break;
            }
            if queue.len() > config.flow_control_threshold {
                status.set_wait();
            } else {
                status.set_ready();
            }
            thread::sleep(config.poll_interval);
        }
    });

    HeavySummary {
        elapsed: start.elapsed(),
        pushed: pushed.load(Ordering::Relaxed),
        popped: popped.load(Ordering::Relaxed),
    }
}

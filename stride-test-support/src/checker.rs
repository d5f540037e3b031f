//! Per-slot send/receive tally, verifying exact-once delivery across a
//! run, via a trait-and-struct pairing rather than an inheritance chain.

use std::sync::atomic::{ AtomicU32, Ordering };

/// One producer's private pool of message slots. A producer writes
/// `send_count` on `Send`; a consumer, once it has located the owning
/// slot by `(producer_id, slot_id)`, writes `receive_count` on `Received`.
#[derive(Debug, Default)]
pub struct MessageSlot {
    send_count: AtomicU32,
    receive_count: AtomicU32,
}

impl MessageSlot {
    pub fn record_send(&self) {
        self.send_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_receive(&self) {
        self.receive_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn is_consistent(&self) -> bool {
        let sent = self.send_count.load(Ordering::Relaxed);
        let received = self.receive_count.load(Ordering::Relaxed);
        sent == received && sent > 0
    }

    pub fn send_count(&self) -> u32 {
        self.send_count.load(Ordering::Relaxed)
    }

    pub fn receive_count(&self) -> u32 {
        self.receive_count.load(Ordering::Relaxed)
    }
}

/// A message as it travels through the queue: enough to find its way back
/// to the owning producer's slot table, plus a payload the queue actually
/// moves around.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggedMessage {
    pub producer_id: u32,
    pub slot_id: u32,
    pub payload: u64,
}

/// Owns every producer's slot table and answers the "did every message
/// arrive exactly once" question after a run completes.
pub struct Checker {
    producers: Vec<Vec<MessageSlot>>,
}

impl Checker {
    pub fn new(producer_count: usize, slots_per_producer: usize) -> Self {
        let producers = (0..producer_count)
            .map(|_| (0..slots_per_producer).map(|_| MessageSlot::default()).collect())
            .collect();
        Self { producers }
    }

    pub fn init_slot(&self, producer_id: usize, slot_id: usize) -> &MessageSlot {
        &self.producers[producer_id][slot_id]
    }

    pub fn record_send(&self, msg: TaggedMessage) {
        self.producers[msg.producer_id as usize][msg.slot_id as usize].record_send();
    }

    pub fn record_receive(&self, msg: TaggedMessage) {
        self.producers[msg.producer_id as usize][msg.slot_id as usize].record_receive();
    }

    /// Asserts `send_count == receive_count > 0` for every slot of every
    /// producer. Returns the first inconsistency found, if any.
    pub fn is_consistent(&self) -> Result<(), ChecksFailed> {
        for (producer_id, slots) in self.producers.iter().enumerate() {
            for (slot_id, slot) in slots.iter().enumerate() {
                if !slot.is_consistent() {
                    return Err(ChecksFailed {
                        producer_id,
                        slot_id,
                        sent: slot.send_count(),
                        received: slot.receive_count(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn total_sent(&self) -> u64 {
        self.producers
            .iter()
            .flat_map(|slots| slots.iter())
            .map(|slot| slot.send_count() as u64)
            .sum()
    }

    pub fn total_received(&self) -> u64 {
        self.producers
            .iter()
            .flat_map(|slots| slots.iter())
            .map(|slot| slot.receive_count() as u64)
            .sum()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChecksFailed {
    pub producer_id: usize,
    pub slot_id: usize,
    pub sent: u32,
    pub received: u32,
}

impl std::fmt::Display for ChecksFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "producer {} slot {}: sent {} times, received {} times",
            self.producer_id, self.slot_id, self.sent, self.received
        )
    }
}

impl std::error::Error for ChecksFailed {}
